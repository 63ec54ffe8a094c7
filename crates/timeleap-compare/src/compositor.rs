//! Wipe compositor: turns the boundary position into the two scenes'
//! visible regions.

use timeleap_engine::coords::Rect;

use crate::boundary::BoundaryPosition;

/// The split is snapped to 1/64 logical pixel so the two widths add back to
/// the container width exactly in `f32`.
const SPLIT_GRID: f32 = 64.0;

/// Visible regions of the two scenes inside the container.
///
/// `historical` is `[left, split)` and `current` is `[split, right]`; their
/// widths always sum to the container width.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClipRegions {
    pub historical: Rect,
    pub current: Rect,
}

impl ClipRegions {
    /// Absolute x of the wipe line.
    #[inline]
    pub fn split_x(&self) -> f32 {
        self.current.origin.x
    }

    pub fn historical_visible(&self) -> bool {
        !self.historical.is_empty()
    }

    pub fn current_visible(&self) -> bool {
        !self.current.is_empty()
    }
}

/// Clip regions for boundary `position` within `container`. O(1) and pure.
pub fn clip_regions(container: Rect, position: BoundaryPosition) -> ClipRegions {
    let width = container.size.x.max(0.0);
    let p = position.percent();

    let left = if p <= BoundaryPosition::MIN {
        0.0
    } else if p >= BoundaryPosition::MAX {
        width
    } else {
        ((width * position.fraction() * SPLIT_GRID).round() / SPLIT_GRID).min(width)
    };

    let (historical, current) = container.split_left(left);
    ClipRegions { historical, current }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(p: f32, container: Rect) -> ClipRegions {
        clip_regions(container, BoundaryPosition::new(p))
    }

    #[test]
    fn widths_always_sum_to_container() {
        let widths = [1000.0, 333.3, 1366.0 / 1.5, 1.0, 7.77, 2560.0];
        for w in widths {
            let container = Rect::new(12.5, 40.0, w, 300.0);
            for step in 0..=1000 {
                let p = step as f32 * 0.1;
                let r = at(p, container);
                assert_eq!(r.historical.size.x + r.current.size.x, w, "w={w} p={p}");
                assert!(r.historical.size.x >= 0.0 && r.current.size.x >= 0.0);
            }
        }
    }

    #[test]
    fn regions_are_adjacent() {
        let container = Rect::new(0.0, 0.0, 1000.0, 400.0);
        let r = at(37.0, container);
        assert_eq!(r.historical.right(), r.current.origin.x);
        assert_eq!(r.historical.origin, container.origin);
        assert_eq!(r.historical.size.y, 400.0);
        assert_eq!(r.current.size.y, 400.0);
    }

    #[test]
    fn zero_hides_historical() {
        let container = Rect::new(0.0, 0.0, 800.0, 400.0);
        let r = at(0.0, container);
        assert!(!r.historical_visible());
        assert_eq!(r.current, container);
    }

    #[test]
    fn hundred_hides_current() {
        let container = Rect::new(0.0, 0.0, 910.6667, 400.0);
        let r = at(100.0, container);
        assert!(!r.current_visible());
        assert_eq!(r.historical, container);
    }

    #[test]
    fn half_splits_down_the_middle() {
        let r = at(50.0, Rect::new(100.0, 0.0, 1000.0, 10.0));
        assert_eq!(r.split_x(), 600.0);
        assert_eq!(r.historical.size.x, 500.0);
        assert_eq!(r.current.size.x, 500.0);
    }

    #[test]
    fn empty_container_yields_empty_regions() {
        let r = at(50.0, Rect::new(0.0, 0.0, 0.0, 0.0));
        assert!(!r.historical_visible());
        assert!(!r.current_visible());
    }
}
