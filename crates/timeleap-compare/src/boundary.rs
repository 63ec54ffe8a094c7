use std::fmt;

/// Wipe position as a percentage of the container width.
///
/// Always within `[0, 100]`: every constructor and setter clamps, so a
/// reader never sees an out-of-range value.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct BoundaryPosition(f32);

impl BoundaryPosition {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 100.0;
    /// Value on mount and after reset.
    pub const CENTER: f32 = 50.0;

    /// Clamps `percent` into range. NaN maps to the centre.
    pub fn new(percent: f32) -> Self {
        if percent.is_nan() {
            return Self::centered();
        }
        Self(percent.clamp(Self::MIN, Self::MAX))
    }

    pub const fn centered() -> Self {
        Self(Self::CENTER)
    }

    /// Position of pointer `x` inside a container spanning
    /// `[left, left + width)`.
    ///
    /// `None` when the container has no width or `x` is not finite; there
    /// is no meaningful percentage in either case.
    pub fn from_offset(x: f32, left: f32, width: f32) -> Option<Self> {
        if !width.is_finite() || width <= 0.0 || !x.is_finite() || !left.is_finite() {
            return None;
        }
        Some(Self::new((x - left) * 100.0 / width))
    }

    #[inline]
    pub fn percent(self) -> f32 {
        self.0
    }

    /// `percent / 100`.
    #[inline]
    pub fn fraction(self) -> f32 {
        self.0 / 100.0
    }
}

impl Default for BoundaryPosition {
    fn default() -> Self {
        Self::centered()
    }
}

impl fmt::Display for BoundaryPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_center() {
        assert_eq!(BoundaryPosition::default().percent(), 50.0);
    }

    #[test]
    fn clamps_both_ends() {
        assert_eq!(BoundaryPosition::new(-12.0).percent(), 0.0);
        assert_eq!(BoundaryPosition::new(140.0).percent(), 100.0);
        assert_eq!(BoundaryPosition::new(f32::INFINITY).percent(), 100.0);
        assert_eq!(BoundaryPosition::new(f32::NEG_INFINITY).percent(), 0.0);
        assert_eq!(BoundaryPosition::new(f32::NAN).percent(), 50.0);
    }

    #[test]
    fn offset_to_percent() {
        let p = BoundaryPosition::from_offset(250.0, 0.0, 1000.0).unwrap();
        assert_eq!(p.percent(), 25.0);

        let p = BoundaryPosition::from_offset(150.0, 100.0, 200.0).unwrap();
        assert_eq!(p.percent(), 25.0);
    }

    #[test]
    fn offset_outside_container_clamps() {
        assert_eq!(BoundaryPosition::from_offset(-500.0, 0.0, 1000.0).unwrap().percent(), 0.0);
        assert_eq!(BoundaryPosition::from_offset(5000.0, 0.0, 1000.0).unwrap().percent(), 100.0);
    }

    #[test]
    fn degenerate_offsets_are_rejected() {
        assert!(BoundaryPosition::from_offset(10.0, 0.0, 0.0).is_none());
        assert!(BoundaryPosition::from_offset(10.0, 0.0, -5.0).is_none());
        assert!(BoundaryPosition::from_offset(f32::NAN, 0.0, 100.0).is_none());
        assert!(BoundaryPosition::from_offset(10.0, 0.0, f32::NAN).is_none());
    }

    #[test]
    fn display_one_decimal() {
        assert_eq!(BoundaryPosition::new(33.333).to_string(), "33.3%");
    }
}
