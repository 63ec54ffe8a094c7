//! Colour model shared by the overlay renderers.
//!
//! Overlay colours are linear premultiplied RGBA. Mesh materials carry
//! their own straight colours (see `mesh`).

pub mod color;

pub use color::Color;
