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
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x * 0.5, self.origin.y + self.size.y * 0.5)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Largest square centered inside this rectangle.
    ///
    /// The side is `min(width, height)`; a degenerate rectangle yields a
    /// zero-sized square at its center.
    #[inline]
    pub fn centered_square(self) -> Rect {
        let side = self.size.x.min(self.size.y).max(0.0);
        let c = self.center();
        Rect::new(c.x - side * 0.5, c.y - side * 0.5, side, side)
    }
}
