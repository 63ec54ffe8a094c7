//! GPU renderers.
//!
//! Each renderer owns its pipelines and buffers and creates them lazily on
//! first use, keyed by the surface format.
//!
//! Conventions:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Clip regions become physical scissor rects through [`scissor_for`],
//!   which rounds edges rather than widths so neighbouring regions never
//!   gap or overlap.

mod common;
mod ctx;
pub mod mesh;
pub mod shapes;
pub mod text;

pub use common::{scissor_for, ScissorRect};
pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::{MeshDraw, MeshId, MeshRenderer, ScenePass};
pub use shapes::ShapeRenderer;
pub use text::TextRenderer;
