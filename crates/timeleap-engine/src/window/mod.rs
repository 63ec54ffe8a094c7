//! Window + runtime loop.
//!
//! Owns the winit event loop and the viewer window, and wires the window to
//! its GPU state and input tracking.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
pub use winit::window::CursorIcon;
