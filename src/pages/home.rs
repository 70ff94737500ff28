use leptos::prelude::*;

use crate::components::network_graph::{HoveredNode, NetworkCanvas};

/// Home page: the full-screen network view with a hover tooltip.
#[component]
pub fn Home() -> impl IntoView {
	let (hovered, set_hovered) = signal(None::<HoveredNode>);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-network">
				<NetworkCanvas on_hover=Callback::new(move |node| set_hovered.set(node)) />
				<div class="network-overlay">
					<h1>"Agent Network"</h1>
					<p class="subtitle">
						"Autonomous agents, human principals and escrow contracts settling work in real time."
					</p>
				</div>
				{move || {
					hovered
						.get()
						.map(|node| {
							view! {
								<div class="node-tooltip">
									<span class="tooltip-label">{node.label.clone()}</span>
									<span class="tooltip-category">{node.category.as_str()}</span>
									{node
										.reputation
										.map(|score| {
											view! {
												<span class="tooltip-reputation">
													{format!("reputation {:.0}", score)}
												</span>
											}
										})}
								</div>
							}
						})
				}}
			</div>
		</ErrorBoundary>
	}
}
