//! Mind-map canvas state.
//!
//! Owns the in-memory node/edge mirror, the pan/zoom transform and the
//! minimap projection. Persistence lives elsewhere; everything here is
//! synchronous and local.

mod canvas;
mod minimap;
mod scene;
mod store;
mod transform;
mod viewport;

pub use canvas::{Canvas, CanvasEvent};
pub use minimap::{Minimap, MinimapConfig, MinimapScene, Rect};
pub use scene::{Connector, NodeShape, NodeStyle, Scene};
pub use store::CanvasStore;
pub use transform::{Transform, MAX_ZOOM, MIN_ZOOM};
pub use viewport::{PointerId, PointerTarget, Viewport};
// Re-export coordinate types from node for convenience
pub use node::{CanvasDelta, CanvasPoint, ScreenDelta, ScreenPoint};
