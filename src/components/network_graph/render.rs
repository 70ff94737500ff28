use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::NetworkState;
use super::types::NodeCategory;

const HALO_SCALE: f64 = 2.5;
const PULSE_DOT_RADIUS: f64 = 2.5;
const ACTIVE_EDGE_COLOR: &str = "rgba(56, 189, 248, 0.55)";
const IDLE_EDGE_COLOR: &str = "rgba(148, 163, 184, 0.12)";
const PULSE_COLOR: &str = "rgba(186, 230, 253, 0.9)";
const ACTIVE_EDGE_WIDTH: f64 = 1.2;
const IDLE_EDGE_WIDTH: f64 = 0.8;

fn category_rgb(category: NodeCategory) -> (u8, u8, u8) {
	match category {
		NodeCategory::Agent => (34, 211, 238),
		NodeCategory::Human => (167, 139, 250),
		NodeCategory::Contract => (245, 158, 11),
	}
}

fn category_rgba(category: NodeCategory, alpha: f64) -> String {
	let (r, g, b) = category_rgb(category);
	format!("rgba({}, {}, {}, {})", r, g, b, alpha)
}

/// Drawing primitives the render pass needs from a backend.
///
/// The simulation core only ever talks to this trait; the canvas 2D adapter
/// below is one implementation, tests use a recording one.
pub trait Surface {
	/// Wipe the whole surface ahead of a full redraw.
	fn clear(&mut self, width: f64, height: f64);
	/// Straight stroked segment.
	fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64);
	/// Filled disc.
	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str);
	/// Outlined disc.
	fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, width: f64);
	/// Disc filled with a radial gradient running `from` at the centre to
	/// `to` at `radius`.
	fn radial_gradient(&mut self, x: f64, y: f64, radius: f64, from: &str, to: &str);
}

/// Full clear-then-draw pass over the current entity state.
pub fn render(state: &NetworkState, surface: &mut impl Surface) {
	if state.width <= 0.0 || state.height <= 0.0 {
		return;
	}
	surface.clear(state.width, state.height);
	draw_edges(state, surface);
	draw_nodes(state, surface);
}

fn draw_edges(state: &NetworkState, surface: &mut impl Surface) {
	for edge in &state.edges {
		let (Some(a), Some(b)) = (state.nodes.get(edge.source), state.nodes.get(edge.target))
		else {
			continue;
		};
		if edge.active {
			surface.line(a.x, a.y, b.x, b.y, ACTIVE_EDGE_COLOR, ACTIVE_EDGE_WIDTH);
			// Traveling dot, lerped along the edge by pulse progress.
			let px = a.x + (b.x - a.x) * edge.pulse;
			let py = a.y + (b.y - a.y) * edge.pulse;
			surface.fill_circle(px, py, PULSE_DOT_RADIUS, PULSE_COLOR);
		} else {
			surface.line(a.x, a.y, b.x, b.y, IDLE_EDGE_COLOR, IDLE_EDGE_WIDTH);
		}
	}
}

fn draw_nodes(state: &NetworkState, surface: &mut impl Surface) {
	for node in &state.nodes {
		surface.radial_gradient(
			node.x,
			node.y,
			node.radius * HALO_SCALE,
			&category_rgba(node.category, 0.25),
			&category_rgba(node.category, 0.0),
		);
		surface.fill_circle(node.x, node.y, node.radius, &category_rgba(node.category, 0.85));
		surface.stroke_circle(node.x, node.y, node.radius, &category_rgba(node.category, 0.4), 1.0);
	}
}

/// [`Surface`] backed by an HTML canvas 2D context.
pub struct CanvasSurface {
	ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
	/// Wrap an already-configured 2D context.
	pub fn new(ctx: CanvasRenderingContext2d) -> Self {
		Self { ctx }
	}
}

impl Surface for CanvasSurface {
	fn clear(&mut self, width: f64, height: f64) {
		self.ctx.clear_rect(0.0, 0.0, width, height);
	}

	fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64) {
		self.ctx.set_stroke_style_str(color);
		self.ctx.set_line_width(width);
		self.ctx.begin_path();
		self.ctx.move_to(x1, y1);
		self.ctx.line_to(x2, y2);
		self.ctx.stroke();
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str) {
		self.ctx.set_fill_style_str(color);
		self.ctx.begin_path();
		let _ = self.ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		self.ctx.fill();
	}

	fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, width: f64) {
		self.ctx.set_stroke_style_str(color);
		self.ctx.set_line_width(width);
		self.ctx.begin_path();
		let _ = self.ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		self.ctx.stroke();
	}

	fn radial_gradient(&mut self, x: f64, y: f64, radius: f64, from: &str, to: &str) {
		let Ok(gradient) = self
			.ctx
			.create_radial_gradient(x, y, radius * 0.2, x, y, radius)
		else {
			return;
		};
		let _ = gradient.add_color_stop(0.0, from);
		let _ = gradient.add_color_stop(1.0, to);
		self.ctx.begin_path();
		let _ = self.ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		self.ctx.set_fill_style(&gradient);
		self.ctx.fill();
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::super::types::{NetworkEdge, NetworkNode};
	use super::*;

	#[derive(Debug, PartialEq)]
	enum Op {
		Clear,
		Line { active: bool },
		FillCircle { x: f64, y: f64, radius: f64 },
		StrokeCircle,
		Gradient { radius: f64 },
	}

	#[derive(Default)]
	struct RecordingSurface {
		ops: Vec<Op>,
	}

	impl Surface for RecordingSurface {
		fn clear(&mut self, _width: f64, _height: f64) {
			self.ops.push(Op::Clear);
		}

		fn line(&mut self, _x1: f64, _y1: f64, _x2: f64, _y2: f64, color: &str, _width: f64) {
			self.ops.push(Op::Line {
				active: color == ACTIVE_EDGE_COLOR,
			});
		}

		fn fill_circle(&mut self, x: f64, y: f64, radius: f64, _color: &str) {
			self.ops.push(Op::FillCircle { x, y, radius });
		}

		fn stroke_circle(&mut self, _x: f64, _y: f64, _radius: f64, _color: &str, _width: f64) {
			self.ops.push(Op::StrokeCircle);
		}

		fn radial_gradient(&mut self, _x: f64, _y: f64, radius: f64, _from: &str, _to: &str) {
			self.ops.push(Op::Gradient { radius });
		}
	}

	fn two_node_state(active: bool, pulse: f64) -> NetworkState {
		let mut state = NetworkState::new(0, 600.0, 300.0, SmallRng::seed_from_u64(1));
		for (id, x) in [(0, 100.0), (1, 300.0)] {
			state.nodes.push(NetworkNode {
				id,
				x,
				y: 150.0,
				vx: 0.0,
				vy: 0.0,
				category: NodeCategory::Agent,
				label: format!("node-{}", id),
				reputation: Some(50.0),
				radius: 8.0,
			});
		}
		state.edges.push(NetworkEdge {
			source: 0,
			target: 1,
			weight: 0.5,
			active,
			pulse,
		});
		state
	}

	#[test]
	fn zero_surface_skips_the_draw() {
		let mut state = two_node_state(true, 0.5);
		state.resize(0.0, 0.0);
		let mut surface = RecordingSurface::default();
		render(&state, &mut surface);
		assert!(surface.ops.is_empty());
	}

	#[test]
	fn clear_precedes_all_drawing() {
		let state = two_node_state(false, 0.0);
		let mut surface = RecordingSurface::default();
		render(&state, &mut surface);
		assert_eq!(surface.ops[0], Op::Clear);
		assert_eq!(surface.ops.iter().filter(|op| **op == Op::Clear).count(), 1);
	}

	#[test]
	fn active_edge_draws_pulse_dot_at_lerped_position() {
		let state = two_node_state(true, 0.25);
		let mut surface = RecordingSurface::default();
		render(&state, &mut surface);

		assert!(surface.ops.contains(&Op::Line { active: true }));
		// 100 + (300 - 100) * 0.25
		assert!(surface.ops.contains(&Op::FillCircle {
			x: 150.0,
			y: 150.0,
			radius: PULSE_DOT_RADIUS,
		}));
	}

	#[test]
	fn inactive_edge_has_no_pulse_dot() {
		let state = two_node_state(false, 0.0);
		let mut surface = RecordingSurface::default();
		render(&state, &mut surface);

		assert!(surface.ops.contains(&Op::Line { active: false }));
		// Only the two node bodies are filled.
		let fills = surface
			.ops
			.iter()
			.filter(|op| matches!(op, Op::FillCircle { .. }))
			.count();
		assert_eq!(fills, 2);
	}

	#[test]
	fn every_node_gets_halo_body_and_border() {
		let state = two_node_state(false, 0.0);
		let mut surface = RecordingSurface::default();
		render(&state, &mut surface);

		let count = |f: fn(&Op) -> bool| surface.ops.iter().filter(|op| f(op)).count();
		assert_eq!(count(|op| matches!(op, Op::Gradient { .. })), 2);
		assert_eq!(count(|op| matches!(op, Op::StrokeCircle)), 2);
		assert!(surface.ops.contains(&Op::Gradient { radius: 8.0 * HALO_SCALE }));
	}
}
