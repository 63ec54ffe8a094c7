//! TimeLeap comparison core.
//!
//! Two scenes of the same structure, one pristine and one weathered, drawn
//! side by side behind a draggable wipe. The crate is GPU-free: scenes
//! produce draw requests and the overlay records into an engine
//! [`DrawList`](timeleap_engine::scene::DrawList); the viewer binary does
//! the actual rendering.

pub mod boundary;
pub mod camera;
pub mod compositor;
pub mod config;
pub mod control;
pub mod coordinator;
pub mod listeners;
pub mod scene;
pub mod site;
pub mod structure;
pub mod variant;
pub mod view;

pub use boundary::BoundaryPosition;
pub use compositor::{clip_regions, ClipRegions};
pub use config::{CameraConfig, HandleStyle, ViewConfig};
pub use control::{ControlHit, ControlSurface};
pub use coordinator::Coordinator;
pub use scene::{PartDraw, RenderStatus, SceneFrame, SceneRenderer};
pub use site::{SiteCatalog, SiteContext, SiteError, SiteRecord};
pub use structure::{Pavilion, StructureModel};
pub use variant::SceneVariant;
pub use view::{ComparisonView, EventResult, ScenePlacement};
