use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::__reexports::send_wrapper::SendWrapper;
use leptos::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::generate::DEFAULT_NODE_COUNT;
use super::render::{self, CanvasSurface};
use super::state::NetworkState;
use super::types::HoveredNode;

/// Owns the scheduled animation frame and its callback, so stopping the
/// loop guarantees no further tick runs after teardown.
struct FrameLoop {
	raf_id: Cell<Option<i32>>,
	tick: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl FrameLoop {
	fn new() -> Rc<Self> {
		Rc::new(Self {
			raf_id: Cell::new(None),
			tick: RefCell::new(None),
		})
	}

	fn start(self: &Rc<Self>, mut frame: impl FnMut() + 'static) {
		self.stop();
		let inner = Rc::clone(self);
		*self.tick.borrow_mut() = Some(Closure::new(move || {
			inner.raf_id.set(None);
			frame();
			inner.schedule();
		}));
		self.schedule();
	}

	fn schedule(&self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(ref cb) = *self.tick.borrow() {
			if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				self.raf_id.set(Some(id));
			}
		}
	}

	fn stop(&self) {
		if let Some(id) = self.raf_id.take() {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(id);
			}
		}
		self.tick.borrow_mut().take();
	}
}

fn container_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.unwrap_or((800.0, 600.0))
}

// Backing store scales with devicePixelRatio; simulation coordinates stay
// in CSS pixels. Resetting the canvas size clears the context transform,
// so the scale is re-applied after every refit.
fn fit_backing_store(canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	let dpr = web_sys::window()
		.map(|w| w.device_pixel_ratio())
		.unwrap_or(1.0);
	canvas.set_width((width * dpr) as u32);
	canvas.set_height((height * dpr) as u32);
	let _ = ctx.scale(dpr, dpr);
}

fn pointer_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Continuously animated network canvas.
///
/// Generates its graph once on mount, then drives one simulate+render pass
/// per animation frame until unmounted. The hovered node is reported through
/// `on_hover` whenever it changes; the tooltip itself is the caller's job.
#[component]
pub fn NetworkCanvas(
	/// How many nodes to generate on mount.
	#[prop(default = DEFAULT_NODE_COUNT)]
	node_count: usize,
	/// Fires with the node under the pointer, or `None` when it leaves one.
	#[prop(optional, into)]
	on_hover: Option<Callback<Option<HoveredNode>>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<NetworkState>>> = Rc::new(RefCell::new(None));
	let frame_loop = FrameLoop::new();
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, loop_init, resize_cb_init) =
		(state.clone(), frame_loop.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = container_size(&canvas);
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();
		fit_backing_store(&canvas, &ctx, w, h);

		let rng = SmallRng::seed_from_u64(js_sys::Date::now() as u64);
		*state_init.borrow_mut() = Some(NetworkState::new(node_count, w, h, rng));

		let (state_resize, canvas_resize, ctx_resize) =
			(state_init.clone(), canvas.clone(), ctx.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = container_size(&canvas_resize);
			fit_backing_store(&canvas_resize, &ctx_resize, nw, nh);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let state_anim = state_init.clone();
		let mut surface = CanvasSurface::new(ctx);
		loop_init.start(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick();
				render::render(s, &mut surface);
			}
		});
	});

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = pointer_position(&canvas, &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			let hit = s.node_at_position(x, y).map(|node| node.id);
			if s.set_hover(hit) {
				if let Some(cb) = on_hover {
					cb.run(s.hovered());
				}
			}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			if s.set_hover(None) {
				if let Some(cb) = on_hover {
					cb.run(None);
				}
			}
		}
	};

	let cleanup = SendWrapper::new((frame_loop.clone(), resize_cb.clone()));
	on_cleanup(move || {
		let (loop_cleanup, resize_cleanup) = &*cleanup;
		loop_cleanup.stop();
		if let Some(cb) = resize_cleanup.borrow_mut().take() {
			if let Some(window) = web_sys::window() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="network-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			style="display: block; width: 100%; height: 100%;"
		/>
	}
}
