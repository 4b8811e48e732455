use crate::coords::Vec2;

use super::Color;

/// A single gradient stop.
///
/// `t` is expected in [0, 1] in typical usage, but is not strictly enforced.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Evenly spaced stops for a list of colors (`t = 0 .. 1`).
pub fn even_stops(colors: &[Color]) -> Vec<ColorStop> {
    match colors.len() {
        0 => Vec::new(),
        1 => vec![ColorStop::new(0.0, colors[0])],
        n => {
            let step = 1.0 / (n - 1) as f32;
            colors
                .iter()
                .enumerate()
                .map(|(i, &c)| ColorStop::new(i as f32 * step, c))
                .collect()
        }
    }
}

/// Linear gradient definition in logical pixel space.
///
/// Semantics:
/// - `start` and `end` are positions in the same coordinate space as geometry.
/// - Colors are clamped to the edge stops outside `[start, end]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2, stops: Vec<ColorStop>) -> Self {
        Self { start, end, stops }
    }

    /// Returns true when the gradient definition is structurally usable.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.end.is_finite()
            && self.stops.iter().all(|s| s.t.is_finite() && s.color.is_finite())
            && self.stops.len() >= 2
            && (self.end.x != self.start.x || self.end.y != self.start.y)
    }
}

/// Radial gradient: `t = distance(center, p) / radius`, clamped to [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub radius: f32,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(center: Vec2, radius: f32, stops: Vec<ColorStop>) -> Self {
        Self { center, radius, stops }
    }

    pub fn is_valid(&self) -> bool {
        self.center.is_finite()
            && self.radius.is_finite()
            && self.radius > 0.0
            && self.stops.iter().all(|s| s.t.is_finite() && s.color.is_finite())
            && self.stops.len() >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_stops_span_unit_interval() {
        let stops = even_stops(&[Color::WHITE, Color::default(), Color::WHITE]);
        let ts: Vec<f32> = stops.iter().map(|s| s.t).collect();
        assert_eq!(ts, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn even_stops_single_color_is_one_stop() {
        assert_eq!(even_stops(&[Color::WHITE]).len(), 1);
        assert!(even_stops(&[]).is_empty());
    }

    #[test]
    fn linear_with_coincident_endpoints_is_invalid() {
        let p = Vec2::new(1.0, 1.0);
        let g = LinearGradient::new(p, p, even_stops(&[Color::WHITE, Color::WHITE]));
        assert!(!g.is_valid());
    }

    #[test]
    fn radial_needs_positive_radius() {
        let stops = even_stops(&[Color::WHITE, Color::default()]);
        assert!(RadialGradient::new(Vec2::zero(), 4.0, stops.clone()).is_valid());
        assert!(!RadialGradient::new(Vec2::zero(), 0.0, stops).is_valid());
    }
}
