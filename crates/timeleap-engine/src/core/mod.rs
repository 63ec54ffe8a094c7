//! Contract between the runtime loop and the application.
//!
//! The runtime owns windows, GPU state and input; the application sees one
//! [`FrameCtx`] per redraw and never touches winit's loop directly.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
