use rand::Rng;

use super::types::{NetworkEdge, NetworkNode, NodeCategory};

/// Node count used when the caller does not request one.
pub const DEFAULT_NODE_COUNT: usize = 18;
/// Edge draw attempts per node; the sampler is best-effort below this.
pub const EDGE_DENSITY: f64 = 1.5;

const EDGE_ACTIVE_PROBABILITY: f64 = 0.6;
const INITIAL_SPEED: f64 = 0.15;
const CONTRACT_RADIUS: f64 = 6.0;
const RADIUS_BASE: f64 = 4.0;
const RADIUS_SCALE: f64 = 6.0;

const AGENT_LABELS: &[&str] = &[
	"Scout-7", "Oracle-3", "Courier-9", "Analyst-2", "Broker-5", "Auditor-1", "Indexer-4",
	"Curator-8", "Sentinel-6",
];
const HUMAN_LABELS: &[&str] = &[
	"alice.eth", "bob.eth", "carol.eth", "dave.eth", "erin.eth", "frank.eth",
];
const CONTRACT_LABELS: &[&str] = &["Escrow", "Arbiter", "Registry", "Staking", "Treasury"];

// 50/30/20 split, assigned in index order so the counts round the same way
// for every run: floor(n/2) agents, floor(3n/10) humans, remainder contracts.
fn category_for_index(index: usize, count: usize) -> NodeCategory {
	let agents = count / 2;
	let humans = count * 3 / 10;
	if index < agents {
		NodeCategory::Agent
	} else if index < agents + humans {
		NodeCategory::Human
	} else {
		NodeCategory::Contract
	}
}

fn label_for_index(index: usize, count: usize, category: NodeCategory) -> String {
	let agents = count / 2;
	let humans = count * 3 / 10;
	let (pool, ordinal) = match category {
		NodeCategory::Agent => (AGENT_LABELS, index),
		NodeCategory::Human => (HUMAN_LABELS, index - agents),
		NodeCategory::Contract => (CONTRACT_LABELS, index - agents - humans),
	};
	pool[ordinal % pool.len()].to_string()
}

/// Build the full node set for a surface of `width` x `height` CSS pixels.
pub fn generate_nodes<R: Rng>(count: usize, width: f64, height: f64, rng: &mut R) -> Vec<NetworkNode> {
	// A not-yet-laid-out surface reports 0x0; sample a degenerate span
	// rather than panicking and let the first real tick spread things out.
	let (span_x, span_y) = (width.max(1.0), height.max(1.0));
	(0..count)
		.map(|index| {
			let category = category_for_index(index, count);
			let reputation = match category {
				NodeCategory::Contract => None,
				_ => Some(rng.random_range(30.0..100.0)),
			};
			let radius = match reputation {
				Some(score) => RADIUS_BASE + RADIUS_SCALE * score / 100.0,
				None => CONTRACT_RADIUS,
			};
			NetworkNode {
				id: index,
				x: rng.random_range(0.0..span_x),
				y: rng.random_range(0.0..span_y),
				vx: rng.random_range(-INITIAL_SPEED..INITIAL_SPEED),
				vy: rng.random_range(-INITIAL_SPEED..INITIAL_SPEED),
				category,
				label: label_for_index(index, count, category),
				reputation,
				radius,
			}
		})
		.collect()
}

/// Sample edges between distinct nodes. Performs `floor(n * density)` draws;
/// self-loops and repeated ordered pairs are rejected, so the result may be
/// shorter than the attempt count.
pub fn generate_edges<R: Rng>(nodes: &[NetworkNode], density: f64, rng: &mut R) -> Vec<NetworkEdge> {
	let attempts = (nodes.len() as f64 * density).floor() as usize;
	let mut edges: Vec<NetworkEdge> = Vec::with_capacity(attempts);
	if nodes.len() < 2 {
		return edges;
	}
	for _ in 0..attempts {
		let source = rng.random_range(0..nodes.len());
		let target = rng.random_range(0..nodes.len());
		if source == target {
			continue;
		}
		if edges.iter().any(|e| e.source == source && e.target == target) {
			continue;
		}
		edges.push(NetworkEdge {
			source,
			target,
			weight: rng.random_range(0.0..1.0),
			active: rng.random_bool(EDGE_ACTIVE_PROBABILITY),
			pulse: 0.0,
		});
	}
	edges
}
