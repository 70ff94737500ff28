use rand::Rng;
use rand::rngs::SmallRng;

use super::generate;
use super::types::{HoveredNode, NetworkEdge, NetworkNode};

/// Nodes are confined to this inset from every surface edge.
pub const BOUNDS_MARGIN: f64 = 20.0;
/// Extra slack around a node's radius accepted by the hit-test.
pub const HIT_MARGIN: f64 = 5.0;

const JITTER: f64 = 0.02;
const DAMPING: f64 = 0.99;
const REPULSION_DISTANCE: f64 = 80.0;
const REPULSION_STRENGTH: f64 = 0.002;
// Floor applied before dividing, so coincident nodes still separate.
const MIN_DISTANCE: f64 = 1.0;
const EDGE_ACTIVATION_PROBABILITY: f64 = 0.004;
const PULSE_STEP_MIN: f64 = 0.004;
const PULSE_STEP_MAX: f64 = 0.014;
const EDGE_DEACTIVATION_PROBABILITY: f64 = 0.3;

/// Owns the entity sets, the current surface bounds and the simulation RNG.
///
/// All mutation happens through [`NetworkState::tick`], one discrete step
/// per call; the renderer and hit-test only read.
pub struct NetworkState {
	pub nodes: Vec<NetworkNode>,
	pub edges: Vec<NetworkEdge>,
	pub width: f64,
	pub height: f64,
	hover: Option<usize>,
	rng: SmallRng,
}

impl NetworkState {
	/// Generate a fresh graph for a surface of `width` x `height`.
	///
	/// The RNG is supplied by the caller so tests can seed it; the component
	/// seeds from the wall clock.
	pub fn new(node_count: usize, width: f64, height: f64, mut rng: SmallRng) -> Self {
		let nodes = generate::generate_nodes(node_count, width, height, &mut rng);
		let edges = generate::generate_edges(&nodes, generate::EDGE_DENSITY, &mut rng);
		Self {
			nodes,
			edges,
			width,
			height,
			hover: None,
			rng,
		}
	}

	/// Advance every mutable node and edge field by one step.
	pub fn tick(&mut self) {
		// Not laid out yet (or too small for the margin inset to be a real
		// range): skip the whole step and retry next frame.
		if self.width <= 2.0 * BOUNDS_MARGIN || self.height <= 2.0 * BOUNDS_MARGIN {
			return;
		}
		self.step_nodes();
		self.apply_repulsion();
		self.step_edges();
	}

	fn step_nodes(&mut self) {
		let (max_x, max_y) = (self.width - BOUNDS_MARGIN, self.height - BOUNDS_MARGIN);
		for node in &mut self.nodes {
			node.x += node.vx;
			node.y += node.vy;

			if node.x < BOUNDS_MARGIN || node.x > max_x {
				node.vx = -node.vx;
			}
			if node.y < BOUNDS_MARGIN || node.y > max_y {
				node.vy = -node.vy;
			}
			// The bounce only flips velocity; clamp catches any overshoot
			// (including positions stranded outside by a shrinking resize).
			node.x = node.x.clamp(BOUNDS_MARGIN, max_x);
			node.y = node.y.clamp(BOUNDS_MARGIN, max_y);

			node.vx = (node.vx + self.rng.random_range(-JITTER..JITTER)) * DAMPING;
			node.vy = (node.vy + self.rng.random_range(-JITTER..JITTER)) * DAMPING;
		}
	}

	// All-pairs, fine at tens of nodes.
	fn apply_repulsion(&mut self) {
		for i in 0..self.nodes.len() {
			for j in (i + 1)..self.nodes.len() {
				let dx = self.nodes[j].x - self.nodes[i].x;
				let dy = self.nodes[j].y - self.nodes[i].y;
				let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
				if dist >= REPULSION_DISTANCE {
					continue;
				}
				let force = (REPULSION_DISTANCE - dist) * REPULSION_STRENGTH;
				let (fx, fy) = (dx / dist * force, dy / dist * force);
				self.nodes[i].vx -= fx;
				self.nodes[i].vy -= fy;
				self.nodes[j].vx += fx;
				self.nodes[j].vy += fy;
			}
		}
	}

	fn step_edges(&mut self) {
		for edge in &mut self.edges {
			if edge.active {
				edge.pulse += self.rng.random_range(PULSE_STEP_MIN..PULSE_STEP_MAX);
				if edge.pulse >= 1.0 {
					edge.pulse = 0.0;
					if self.rng.random_bool(EDGE_DEACTIVATION_PROBABILITY) {
						edge.active = false;
					}
				}
			} else if self.rng.random_bool(EDGE_ACTIVATION_PROBABILITY) {
				edge.active = true;
				edge.pulse = 0.0;
			}
		}
	}

	/// First node in iteration order whose disc (radius plus [`HIT_MARGIN`])
	/// contains the surface-local pointer position.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<&NetworkNode> {
		self.nodes.iter().find(|node| {
			let (dx, dy) = (node.x - x, node.y - y);
			(dx * dx + dy * dy).sqrt() <= node.radius + HIT_MARGIN
		})
	}

	/// Record the hovered node id; returns true when the value changed.
	/// Purely derived state, never touches simulation fields.
	pub fn set_hover(&mut self, id: Option<usize>) -> bool {
		if self.hover == id {
			return false;
		}
		self.hover = id;
		true
	}

	/// Tooltip projection of the currently hovered node, if any.
	pub fn hovered(&self) -> Option<HoveredNode> {
		let node = self.nodes.get(self.hover?)?;
		Some(HoveredNode {
			id: node.id,
			category: node.category,
			label: node.label.clone(),
			reputation: node.reputation,
		})
	}

	/// Adopt new surface bounds. Positions are left alone; anything outside
	/// the new bounds is pulled back by the next tick's clamp.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
