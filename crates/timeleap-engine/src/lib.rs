//! TimeLeap engine crate.
//!
//! Platform loop, GPU device, input translation and the renderers the
//! comparison viewer draws with. Nothing in here knows about monuments or
//! wipe boundaries; that lives in `timeleap-compare`.

pub mod core;
pub mod device;
pub mod input;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod mesh;
pub mod paint;
pub mod render;
pub mod scene;
pub mod text;
