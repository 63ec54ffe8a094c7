//! GPU device and surface management.
//!
//! Owns the wgpu instance/adapter/device/queue for a window, configures the
//! swapchain, and hands out one encoder + view per frame. Failure to create
//! any of these is reported to the runtime, which keeps the window alive
//! with nothing drawn.

mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
