use std::fmt;

use glam::Vec3;
use timeleap_engine::mesh::Material;
use timeleap_engine::paint::Color;

/// Which era a scene shows. Fixed when the scene is built.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SceneVariant {
    Historical,
    Current,
}

/// Surface ageing applied on top of a part's pristine finish.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Weathering {
    /// Added to roughness, result clamped to 1.
    pub roughness_offset: f32,
    /// 0 keeps the colour, 1 turns it fully grey.
    pub desaturation: f32,
    /// Multiplier on the base colour.
    pub darken: f32,
    /// Multiplier on metalness; tarnish dulls gilding.
    pub metal_retained: f32,
}

impl Weathering {
    pub const NONE: Weathering = Weathering {
        roughness_offset: 0.0,
        desaturation: 0.0,
        darken: 1.0,
        metal_retained: 1.0,
    };

    pub const AGED: Weathering = Weathering {
        roughness_offset: 0.35,
        desaturation: 0.55,
        darken: 0.82,
        metal_retained: 0.35,
    };

    pub fn apply(self, pristine: Material) -> Material {
        let luma = pristine.base_color.dot(Vec3::new(0.2126, 0.7152, 0.0722));
        let grey = Vec3::splat(luma);
        let color = pristine.base_color.lerp(grey, self.desaturation) * self.darken;
        Material::new(
            color,
            pristine.roughness + self.roughness_offset,
            pristine.metalness * self.metal_retained,
        )
    }
}

impl SceneVariant {
    pub const ALL: [SceneVariant; 2] = [SceneVariant::Historical, SceneVariant::Current];

    /// Short fallback label when no site is mounted.
    pub fn label(self) -> &'static str {
        match self {
            SceneVariant::Historical => "Then",
            SceneVariant::Current => "Now",
        }
    }

    pub fn weathering(self) -> Weathering {
        match self {
            SceneVariant::Historical => Weathering::NONE,
            SceneVariant::Current => Weathering::AGED,
        }
    }

    /// The material a part with `pristine` finish gets in this era.
    pub fn material(self, pristine: Material) -> Material {
        self.weathering().apply(pristine)
    }

    /// Backdrop colour behind the structure.
    pub fn sky(self) -> Color {
        match self {
            SceneVariant::Historical => Color::from_straight(0.42, 0.58, 0.82, 1.0),
            SceneVariant::Current => Color::from_straight(0.52, 0.55, 0.58, 1.0),
        }
    }
}

impl fmt::Display for SceneVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneVariant::Historical => f.write_str("historical"),
            SceneVariant::Current => f.write_str("current"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sandstone() -> Material {
        Material::new(Vec3::new(0.8, 0.6, 0.4), 0.5, 0.2)
    }

    fn saturation(c: Vec3) -> f32 {
        c.max_element() - c.min_element()
    }

    #[test]
    fn historical_is_pristine() {
        assert_eq!(SceneVariant::Historical.material(sandstone()), sandstone());
    }

    #[test]
    fn current_is_rougher_and_greyer() {
        let aged = SceneVariant::Current.material(sandstone());
        assert!((aged.roughness - 0.85).abs() < 1e-6);
        assert!(saturation(aged.base_color) < saturation(sandstone().base_color));
        assert!(aged.metalness < sandstone().metalness);
    }

    #[test]
    fn roughness_offset_saturates_at_one() {
        let rough = Material::new(Vec3::ONE, 0.9, 0.0);
        assert_eq!(SceneVariant::Current.material(rough).roughness, 1.0);
    }

    #[test]
    fn fallback_labels() {
        assert_eq!(SceneVariant::Historical.label(), "Then");
        assert_eq!(SceneVariant::Current.label(), "Now");
    }
}
