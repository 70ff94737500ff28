mod component;
mod generate;
mod render;
mod state;
mod types;

pub use component::NetworkCanvas;
pub use types::{HoveredNode, NetworkEdge, NetworkNode, NodeCategory};
