//! Face geometry derived from the canvas side length.

use stundenuhr_engine::coords::{Rect, Vec2};

/// Outer radius as a fraction of half the side.
const OUTER_FRACTION: f32 = 0.9;
const DIAL_FRACTION: f32 = 0.85;
const TICK_FRACTION: f32 = 0.1;
const NUMERAL_GAP_FRACTION: f32 = 0.06;
const RIM_WIDTH_FRACTION: f32 = 0.03;
const TICK_WIDTH_FRACTION: f32 = 0.03;
const HAND_WIDTH_FRACTION: f32 = 0.05;
const PIVOT_FRACTION: f32 = 0.06;
/// Hand length as a fraction of the dial radius.
const HAND_LENGTH_FRACTION: f32 = 0.95;
/// Font size as a fraction of the full side.
const FONT_FRACTION: f32 = 0.08;

/// Scalar measurements of one frame's face, in logical pixels.
///
/// Recomputed for every draw; all radii are fractions of `outer_radius`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FaceLayout {
    pub side: f32,
    pub origin: Vec2,
    pub center: Vec2,
    pub outer_radius: f32,
    pub dial_radius: f32,
    pub tick_length: f32,
    pub numeral_radius: f32,
    pub rim_width: f32,
    pub tick_width: f32,
    pub hand_width: f32,
    pub pivot_radius: f32,
    pub hand_length: f32,
    pub font_size: f32,
}

impl FaceLayout {
    /// Layout for a square canvas of `side` whose top-left is `origin`.
    ///
    /// Returns `None` if `side` is not a positive finite number.
    pub fn new(side: f32, origin: Vec2) -> Option<Self> {
        if !(side.is_finite() && side > 0.0) || !origin.is_finite() {
            return None;
        }

        let outer = side * 0.5 * OUTER_FRACTION;
        let dial = outer * DIAL_FRACTION;
        let tick = outer * TICK_FRACTION;

        Some(Self {
            side,
            origin,
            center: origin + Vec2::new(side * 0.5, side * 0.5),
            outer_radius: outer,
            dial_radius: dial,
            tick_length: tick,
            numeral_radius: dial + tick + outer * NUMERAL_GAP_FRACTION,
            rim_width: outer * RIM_WIDTH_FRACTION,
            tick_width: outer * TICK_WIDTH_FRACTION,
            hand_width: outer * HAND_WIDTH_FRACTION,
            pivot_radius: outer * PIVOT_FRACTION,
            hand_length: dial * HAND_LENGTH_FRACTION,
            font_size: side * FONT_FRACTION,
        })
    }

    /// Layout for the largest square centered in `bounds`.
    pub fn fit(bounds: Rect) -> Option<Self> {
        let square = bounds.centered_square();
        Self::new(square.size.x, square.origin)
    }

    /// The square canvas.
    #[inline]
    pub fn canvas(&self) -> Rect {
        Rect::new(self.origin.x, self.origin.y, self.side, self.side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-3 * b.abs().max(1.0)
    }

    #[test]
    fn fractions_for_a_400px_canvas() {
        let l = FaceLayout::new(400.0, Vec2::zero()).unwrap();
        assert!(approx(l.outer_radius, 180.0));
        assert!(approx(l.dial_radius, 153.0));
        assert!(approx(l.tick_length, 18.0));
        assert!(approx(l.numeral_radius, 181.8));
        assert!(approx(l.rim_width, 5.4));
        assert!(approx(l.tick_width, 5.4));
        assert!(approx(l.hand_width, 9.0));
        assert!(approx(l.pivot_radius, 10.8));
        assert!(approx(l.hand_length, 145.35));
        assert!(approx(l.font_size, 32.0));
        assert_eq!(l.center, Vec2::new(200.0, 200.0));
    }

    #[test]
    fn degenerate_sides_have_no_layout() {
        assert!(FaceLayout::new(0.0, Vec2::zero()).is_none());
        assert!(FaceLayout::new(-5.0, Vec2::zero()).is_none());
        assert!(FaceLayout::new(f32::NAN, Vec2::zero()).is_none());
        assert!(FaceLayout::new(f32::INFINITY, Vec2::zero()).is_none());
    }

    #[test]
    fn fit_centers_in_wide_window() {
        let l = FaceLayout::fit(Rect::new(0.0, 0.0, 800.0, 600.0)).unwrap();
        assert_eq!(l.side, 600.0);
        assert_eq!(l.origin, Vec2::new(100.0, 0.0));
        assert_eq!(l.center, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn fit_of_empty_window_is_none() {
        assert!(FaceLayout::fit(Rect::new(0.0, 0.0, 0.0, 600.0)).is_none());
    }

    proptest! {
        #[test]
        fn radii_are_nested(side in 1.0f32..10_000.0) {
            let l = FaceLayout::new(side, Vec2::zero()).unwrap();
            prop_assert!(l.dial_radius < l.dial_radius + l.tick_length);
            prop_assert!(l.dial_radius + l.tick_length < l.numeral_radius);
            prop_assert!(l.hand_length < l.dial_radius);
            prop_assert!(l.pivot_radius < l.hand_length);
        }

        #[test]
        fn numeral_ring_stays_on_canvas(side in 1.0f32..10_000.0) {
            let l = FaceLayout::new(side, Vec2::zero()).unwrap();
            // Half a glyph past the ring still fits inside the half-side.
            prop_assert!(l.numeral_radius + l.font_size * 0.5 < side * 0.5);
        }

        #[test]
        fn rim_stays_inside_outer_radius(side in 1.0f32..10_000.0) {
            let l = FaceLayout::new(side, Vec2::zero()).unwrap();
            prop_assert!(l.dial_radius + l.rim_width * 0.5 < l.outer_radius);
        }
    }
}
