//! Frame timing.
//!
//! The runtime owns one `FrameClock` per window and ticks it once per redraw.
//! Every per-frame update downstream (scene rotation, camera easing) is
//! driven from the resulting `FrameTime`, never from wall-clock reads of its own.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
