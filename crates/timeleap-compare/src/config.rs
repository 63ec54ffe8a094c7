//! Tunables for the comparison view. Plain structs with defaults; the
//! viewer overrides a few from the command line.

/// Wipe handle and control geometry, in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleStyle {
    pub line_width: f32,
    pub knob_radius: f32,
    /// Extra grab tolerance around the line and knob.
    pub hit_slop: f32,
    pub reset_size: (f32, f32),
    /// Inset of the reset button and labels from the container edges.
    pub inset: f32,
    pub label_size: f32,
}

impl Default for HandleStyle {
    fn default() -> Self {
        Self {
            line_width: 3.0,
            knob_radius: 22.0,
            hit_slop: 6.0,
            reset_size: (68.0, 30.0),
            inset: 16.0,
            label_size: 15.0,
        }
    }
}

/// Orbit camera limits and starting pose.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Radians above the horizon.
    pub pitch: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub fov_y_degrees: f32,
    /// Height of the orbit target above the ground.
    pub target_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 8.0,
            min_distance: 4.0,
            max_distance: 14.0,
            pitch: 0.32,
            min_pitch: -0.05,
            max_pitch: 1.35,
            fov_y_degrees: 45.0,
            target_height: 1.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    /// Height of the comparison band at the top of the window.
    pub band_height: f32,
    pub handle: HandleStyle,
    pub camera: CameraConfig,
    /// Structure spin while auto-rotate is on, radians per second.
    pub auto_rotate_speed: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            band_height: 480.0,
            handle: HandleStyle::default(),
            camera: CameraConfig::default(),
            auto_rotate_speed: 0.3,
        }
    }
}

impl ViewConfig {
    pub fn with_band_height(mut self, height: f32) -> Self {
        if height.is_finite() && height > 0.0 {
            self.band_height = height;
        } else {
            log::warn!("ignoring band height {height}; keeping {}", self.band_height);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_starts_inside_limits() {
        let c = CameraConfig::default();
        assert!((c.min_distance..=c.max_distance).contains(&c.distance));
        assert!((c.min_pitch..=c.max_pitch).contains(&c.pitch));
    }

    #[test]
    fn band_height_rejects_nonsense() {
        let base = ViewConfig::default().band_height;
        assert_eq!(ViewConfig::default().with_band_height(-3.0).band_height, base);
        assert_eq!(ViewConfig::default().with_band_height(f32::NAN).band_height, base);
        assert_eq!(ViewConfig::default().with_band_height(300.0).band_height, 300.0);
    }
}
