//! Radial placement for new mind-map nodes.
//!
//! Children ring their parent on a circle whose radius grows with depth.
//! Roots use the full circle; deeper nodes use a narrower arc aimed away
//! from their own parent so subtrees fan outward.
//! Pure computation: nothing here touches the store.

mod config;
mod context;
mod radial;

pub use config::LayoutConfig;
pub use context::{depth_of, ParentContext};
pub use radial::{place_child, slot_angles, Placement, Ring};
