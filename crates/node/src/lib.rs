//! Node types for the mind-map canvas.
//!
//! A mind map is a single-parent tree. Every node carries its parent
//! reference; edges mirror those references for renderers that consume
//! connectors directly.

pub mod coords;
mod direction;
mod edge;
mod id_gen;
mod node;
mod node_id;

pub use coords::{CanvasDelta, CanvasPoint, ScreenDelta, ScreenPoint};
pub use direction::Direction;
pub use edge::{Edge, EdgeId};
pub use id_gen::{IdGenerator, SequentialIds, UuidGenerator};
pub use node::{Node, NodePatch};
pub use node_id::{ContainerId, NodeId, TodoListId};
