pub mod graph;
pub mod node;

pub use graph::SceneGraph;
pub use node::{MorphChannel, Node, NodeKind, ReleasableResource, Transform};
