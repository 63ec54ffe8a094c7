use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Radians of orbit per logical pixel of pointer travel.
const ORBIT_PER_PIXEL: f32 = 0.008;
/// Distance factor per wheel line.
const ZOOM_PER_LINE: f32 = 0.9;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

/// One scene's camera interaction scope.
///
/// Orbits a fixed target; distance and pitch are bounded and there is no
/// pan. Each scene owns its own instance, so interacting with one never
/// moves the other.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraScope {
    yaw: f32,
    pitch: f32,
    distance: f32,
    target: Vec3,
    auto_rotate: bool,
    limits: CameraConfig,
}

impl CameraScope {
    pub fn new(config: &CameraConfig) -> Self {
        let limits = config.clone();
        Self {
            yaw: 0.0,
            pitch: config.pitch.clamp(config.min_pitch, config.max_pitch),
            distance: config.distance.clamp(config.min_distance, config.max_distance),
            target: Vec3::new(0.0, config.target_height, 0.0),
            auto_rotate: true,
            limits,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    /// Turns auto-rotate off for good. Returns `true` the first time.
    pub fn disable_auto_rotate(&mut self) -> bool {
        std::mem::replace(&mut self.auto_rotate, false)
    }

    /// Pointer drag of `(dx, dy)` logical pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.yaw = (self.yaw - dx * ORBIT_PER_PIXEL).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + dy * ORBIT_PER_PIXEL).clamp(self.limits.min_pitch, self.limits.max_pitch);
    }

    /// Wheel movement in lines; positive moves closer.
    pub fn zoom(&mut self, lines: f32) {
        if !lines.is_finite() {
            return;
        }
        let factor = ZOOM_PER_LINE.powf(lines);
        self.distance = (self.distance * factor).clamp(self.limits.min_distance, self.limits.max_distance);
    }

    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(sy * cp, sp, cy * cp) * self.distance
    }

    /// View-projection for a viewport of the given aspect ratio.
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        let proj = Mat4::perspective_rh(self.limits.fov_y_degrees.to_radians(), aspect, NEAR, FAR);
        let view = Mat4::look_at_rh(self.eye(), self.target, Vec3::Y);
        proj * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> CameraScope {
        CameraScope::new(&CameraConfig::default())
    }

    #[test]
    fn starts_auto_rotating() {
        assert!(scope().auto_rotate());
    }

    #[test]
    fn disable_is_permanent_and_reported_once() {
        let mut c = scope();
        assert!(c.disable_auto_rotate());
        assert!(!c.disable_auto_rotate());
        assert!(!c.auto_rotate());
    }

    #[test]
    fn zoom_is_bounded() {
        let cfg = CameraConfig::default();
        let mut c = scope();
        c.zoom(1000.0);
        assert_eq!(c.distance(), cfg.min_distance);
        c.zoom(-1000.0);
        assert_eq!(c.distance(), cfg.max_distance);
        c.zoom(f32::NAN);
        assert_eq!(c.distance(), cfg.max_distance);
    }

    #[test]
    fn pitch_is_bounded() {
        let cfg = CameraConfig::default();
        let mut c = scope();
        c.orbit(0.0, 1e6);
        assert_eq!(c.pitch(), cfg.max_pitch);
        c.orbit(0.0, -1e6);
        assert_eq!(c.pitch(), cfg.min_pitch);
    }

    #[test]
    fn eye_keeps_distance_from_target() {
        let mut c = scope();
        c.orbit(123.0, 40.0);
        let target = Vec3::new(0.0, CameraConfig::default().target_height, 0.0);
        assert!(((c.eye() - target).length() - c.distance()).abs() < 1e-4);
    }

    #[test]
    fn orbit_does_not_move_the_target() {
        let mut c = scope();
        let before = c.view_proj(1.5);
        c.orbit(0.0, 0.0);
        assert_eq!(before, c.view_proj(1.5));
    }

    #[test]
    fn target_projects_to_viewport_centre() {
        let c = scope();
        let clip = c.view_proj(2.0) * Vec3::new(0.0, CameraConfig::default().target_height, 0.0).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
