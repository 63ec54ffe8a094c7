//! Overlay draw stream.
//!
//! The control surface records flat 2D shapes here each frame (handle,
//! affordance icons, reset button, labels). The shape and text renderers
//! consume the list; the 3D scenes do not go through it.
//!
//! Ordering is by `ZIndex`, then insertion order.

mod cmd;
mod list;

pub use cmd::{Border, DrawCmd, TriangleDir};
pub use list::{DrawItem, DrawList, ZIndex};
