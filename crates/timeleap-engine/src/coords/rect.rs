use super::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    #[inline]
    pub fn right(self) -> f32 {
        self.origin.x + self.size.x
    }

    #[inline]
    pub fn bottom(self) -> f32 {
        self.origin.y + self.size.y
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x * 0.5, self.origin.y + self.size.y * 0.5)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Half-open containment: `[min, max)`.
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.origin.x && p.y >= self.origin.y && p.x < self.right() && p.y < self.bottom()
    }

    /// Horizontal containment only; vertical position is ignored.
    #[inline]
    pub fn contains_x(self, x: f32) -> bool {
        x >= self.origin.x && x < self.right()
    }

    /// Grows (positive) or shrinks (negative) every edge by `d`.
    #[inline]
    pub fn inflate(self, d: f32) -> Rect {
        Rect::new(
            self.origin.x - d,
            self.origin.y - d,
            (self.size.x + 2.0 * d).max(0.0),
            (self.size.y + 2.0 * d).max(0.0),
        )
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let x0 = self.origin.x.max(other.origin.x);
        let y0 = self.origin.y.max(other.origin.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());

        if x1 <= x0 || y1 <= y0 {
            None
        } else {
            Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
        }
    }

    /// Splits off a left part `width` wide; the rest is the right part.
    ///
    /// `width` is clamped into `[0, self.width]`, so one side may come back
    /// zero-width. The right width is `self.width - width`.
    #[inline]
    pub fn split_left(self, width: f32) -> (Rect, Rect) {
        let w = if width.is_nan() { 0.0 } else { width.clamp(0.0, self.size.x.max(0.0)) };
        let left = Rect::new(self.origin.x, self.origin.y, w, self.size.y);
        let right = Rect::new(self.origin.x + w, self.origin.y, self.size.x - w, self.size.y);
        (left, right)
    }
}
