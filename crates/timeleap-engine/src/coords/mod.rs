//! Geometry shared by the runtime, the renderers and the comparison view.
//!
//! All CPU-side coordinates are logical pixels, origin top-left, +Y down.
//! Conversion to physical pixels happens at the renderer boundary.

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
