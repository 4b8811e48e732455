use core::ops::{Add, Mul, Sub};

/// 2D vector in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Point at `radius` from `center` along `angle_deg`.
    ///
    /// Angles are measured from +X and grow clockwise because +Y points down.
    #[inline]
    pub fn polar(center: Vec2, radius: f32, angle_deg: f32) -> Self {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        Vec2::new(center.x + radius * cos, center.y + radius * sin)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn polar_zero_degrees_points_right() {
        let p = Vec2::polar(Vec2::new(10.0, 10.0), 5.0, 0.0);
        assert!(close(p, Vec2::new(15.0, 10.0)));
    }

    #[test]
    fn polar_minus_ninety_points_up() {
        // +Y is down, so "up" is a smaller y.
        let p = Vec2::polar(Vec2::new(10.0, 10.0), 5.0, -90.0);
        assert!(close(p, Vec2::new(10.0, 5.0)));
    }

    #[test]
    fn polar_ninety_points_down() {
        let p = Vec2::polar(Vec2::zero(), 2.0, 90.0);
        assert!(close(p, Vec2::new(0.0, 2.0)));
    }

    #[test]
    fn length_of_3_4_is_5() {
        assert_eq!(Vec2::new(3.0, 4.0).length(), 5.0);
    }
}
