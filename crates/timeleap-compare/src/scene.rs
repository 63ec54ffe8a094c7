//! Per-scene state: variant, accumulated spin, camera scope.
//!
//! A scene never touches the GPU. Each frame it turns its state into a
//! [`SceneFrame`], a plain description of what to draw, and the viewer
//! hands that to the mesh renderer.

use std::fmt;

use glam::{Mat4, Vec3};
use timeleap_engine::coords::Rect;
use timeleap_engine::mesh::Material;
use timeleap_engine::paint::Color;

use crate::camera::CameraScope;
use crate::config::ViewConfig;
use crate::structure::StructureModel;
use crate::variant::SceneVariant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderStatus {
    Active,
    /// The surface could not be created; the region stays blank.
    Degraded(String),
}

impl fmt::Display for RenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStatus::Active => f.write_str("active"),
            RenderStatus::Degraded(reason) => write!(f, "degraded ({reason})"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct PartInstance {
    material: Material,
}

/// One part to draw. `slot` is the part's index in the structure, which
/// is also the order its mesh was uploaded in.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PartDraw {
    pub slot: usize,
    pub model: Mat4,
    pub material: Material,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    pub variant: SceneVariant,
    pub view_proj: Mat4,
    pub eye: Vec3,
    pub light_dir: Vec3,
    pub sky: Color,
    pub parts: Vec<PartDraw>,
}

/// Late-afternoon sun from the upper left, travelling down and away.
fn sun_direction() -> Vec3 {
    Vec3::new(0.45, -0.8, -0.4).normalize()
}

#[derive(Debug)]
pub struct SceneRenderer {
    variant: SceneVariant,
    parts: Vec<PartInstance>,
    angle: f32,
    speed: f32,
    camera: CameraScope,
    status: RenderStatus,
}

impl SceneRenderer {
    pub fn new(variant: SceneVariant, model: &dyn StructureModel, config: &ViewConfig) -> Self {
        let parts = model
            .parts()
            .iter()
            .map(|p| PartInstance { material: variant.material(p.finish) })
            .collect();
        Self {
            variant,
            parts,
            angle: 0.0,
            speed: config.auto_rotate_speed,
            camera: CameraScope::new(&config.camera),
            status: RenderStatus::Active,
        }
    }

    pub fn variant(&self) -> SceneVariant {
        self.variant
    }

    /// Accumulated structure rotation in radians.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn camera(&self) -> &CameraScope {
        &self.camera
    }

    pub fn status(&self) -> &RenderStatus {
        &self.status
    }

    pub fn is_auto_rotating(&self) -> bool {
        self.camera.auto_rotate()
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Frame step. Spins the structure by `speed * dt` while auto-rotate
    /// is on; negative or non-finite `dt` is ignored.
    pub fn update(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 || !self.camera.auto_rotate() {
            return;
        }
        self.angle = (self.angle + self.speed * dt).rem_euclid(std::f32::consts::TAU);
    }

    /// Direct interaction with this scene. Stops auto-rotate for good.
    pub fn interact(&mut self) {
        if self.camera.disable_auto_rotate() {
            log::debug!("{} scene: auto-rotate disabled", self.variant);
        }
    }

    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.interact();
        self.camera.orbit(dx, dy);
    }

    pub fn zoom(&mut self, lines: f32) {
        self.interact();
        self.camera.zoom(lines);
    }

    pub fn mark_degraded(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        log::warn!("{} scene degraded, region left blank: {reason}", self.variant);
        self.status = RenderStatus::Degraded(reason);
    }

    /// What to draw into `region` this frame. `None` when degraded or the
    /// region has no area.
    pub fn frame(&self, region: Rect) -> Option<SceneFrame> {
        if self.status != RenderStatus::Active || region.is_empty() {
            return None;
        }
        let aspect = region.size.x / region.size.y;
        let model = Mat4::from_rotation_y(self.angle);
        Some(SceneFrame {
            variant: self.variant,
            view_proj: self.camera.view_proj(aspect),
            eye: self.camera.eye(),
            light_dir: sun_direction(),
            sky: self.variant.sky(),
            parts: self
                .parts
                .iter()
                .enumerate()
                .map(|(slot, p)| PartDraw { slot, model, material: p.material })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::Pavilion;

    fn pair() -> (SceneRenderer, SceneRenderer) {
        let cfg = ViewConfig::default();
        let model = Pavilion::default();
        (
            SceneRenderer::new(SceneVariant::Historical, &model, &cfg),
            SceneRenderer::new(SceneVariant::Current, &model, &cfg),
        )
    }

    fn region() -> Rect {
        Rect::new(0.0, 0.0, 800.0, 480.0)
    }

    #[test]
    fn update_advances_while_auto_rotating() {
        let (mut h, _) = pair();
        h.update(1.0);
        assert!((h.angle() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn invalid_dt_is_ignored() {
        let (mut h, _) = pair();
        h.update(-1.0);
        h.update(f32::NAN);
        h.update(0.0);
        assert_eq!(h.angle(), 0.0);
    }

    #[test]
    fn first_click_stops_only_that_scene() {
        let (mut h, mut c) = pair();
        h.update(0.5);
        c.update(0.5);

        h.interact();
        let h_before = h.angle();
        let c_before = c.angle();
        h.update(0.5);
        c.update(0.5);

        assert_eq!(h.angle(), h_before);
        assert!(c.angle() > c_before);
        assert!(!h.is_auto_rotating());
        assert!(c.is_auto_rotating());
    }

    #[test]
    fn orbit_and_zoom_count_as_interaction() {
        let (mut h, mut c) = pair();
        h.orbit(10.0, 0.0);
        c.zoom(1.0);
        assert!(!h.is_auto_rotating());
        assert!(!c.is_auto_rotating());
    }

    #[test]
    fn current_parts_are_weathered() {
        let (h, c) = pair();
        let hf = h.frame(region()).unwrap();
        let cf = c.frame(region()).unwrap();
        assert_eq!(hf.parts.len(), cf.parts.len());
        for (a, b) in hf.parts.iter().zip(&cf.parts) {
            assert_eq!(a.slot, b.slot);
            assert!(b.material.roughness >= a.material.roughness);
        }
    }

    #[test]
    fn frame_is_a_function_of_angle() {
        let (mut a, _) = pair();
        let (mut b, _) = pair();
        a.update(0.25);
        a.update(0.25);
        b.update(0.5);
        let fa = a.frame(region()).unwrap();
        let fb = b.frame(region()).unwrap();
        assert!(fa.parts[0].model.abs_diff_eq(fb.parts[0].model, 1e-5));
    }

    #[test]
    fn degraded_scene_draws_nothing() {
        let (mut h, _) = pair();
        h.mark_degraded("no adapter");
        assert!(matches!(h.status(), RenderStatus::Degraded(_)));
        assert!(h.frame(region()).is_none());
        // State keeps flowing.
        h.update(1.0);
        assert!(h.angle() > 0.0);
    }

    #[test]
    fn empty_region_draws_nothing() {
        let (h, _) = pair();
        assert!(h.frame(Rect::new(0.0, 0.0, 0.0, 480.0)).is_none());
    }
}
