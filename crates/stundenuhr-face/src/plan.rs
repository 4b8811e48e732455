//! Ordered drawing plan for one frame.

use stundenuhr_engine::coords::{Rect, Vec2};
use stundenuhr_engine::paint::{even_stops, Color, LinearGradient, Paint, RadialGradient};

use crate::angle::{hand_angle_deg, marker_angle_deg};
use crate::layout::FaceLayout;
use crate::theme::{TextShadow, Theme};
use crate::time::WallTime;

/// One element of the face, with its geometry and paint resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum FacePrimitive {
    /// Filled dial disc.
    Dial { center: Vec2, radius: f32, paint: Paint },
    /// Ring stroked on the dial edge.
    Rim { center: Vec2, radius: f32, width: f32, paint: Paint },
    /// Radial hour marker; `hour` is `0..=11`.
    Tick { hour: u32, start: Vec2, end: Vec2, width: f32, color: Color },
    /// Hour numeral centered on `anchor`; `value` is `1..=12`.
    Numeral { value: u32, anchor: Vec2, size: f32, color: Color, shadow: TextShadow },
    /// Hour hand from the center outwards, round cap.
    Hand { start: Vec2, end: Vec2, width: f32, paint: Paint },
    /// Center pivot disc.
    Pivot { center: Vec2, radius: f32, paint: Paint },
}

/// Face primitives in back-to-front order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FacePlan {
    primitives: Vec<FacePrimitive>,
}

impl FacePlan {
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Plans the face on the largest square centered in `bounds`, or returns
    /// an empty plan when that square is degenerate.
    pub fn for_bounds(bounds: Rect, time: WallTime, theme: &Theme) -> Self {
        match FaceLayout::fit(bounds) {
            Some(layout) => plan_face(&layout, time, theme),
            None => {
                log::debug!("skipping face for degenerate bounds {bounds:?}");
                Self::empty()
            }
        }
    }

    #[inline]
    pub fn primitives(&self) -> &[FacePrimitive] {
        &self.primitives
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &FacePrimitive> {
        self.primitives.iter()
    }
}

/// Builds the plan: dial, rim, 12 ticks, 12 numerals, hand, pivot.
pub fn plan_face(layout: &FaceLayout, time: WallTime, theme: &Theme) -> FacePlan {
    let c = layout.center;
    let canvas = layout.canvas();
    let corner_to_corner = |from: Color, to: Color| -> Paint {
        LinearGradient::new(canvas.origin, canvas.max(), even_stops(&[from, to])).into()
    };

    let mut out = Vec::with_capacity(28);

    out.push(FacePrimitive::Dial {
        center: c,
        radius: layout.dial_radius,
        paint: RadialGradient::new(
            c,
            layout.dial_radius,
            even_stops(&[theme.dial_center, theme.dial_edge]),
        )
        .into(),
    });

    out.push(FacePrimitive::Rim {
        center: c,
        radius: layout.dial_radius,
        width: layout.rim_width,
        paint: corner_to_corner(theme.rim_start, theme.rim_end),
    });

    let tick_outer = layout.dial_radius + layout.tick_length;
    for hour in 0..12 {
        let angle = marker_angle_deg(hour);
        out.push(FacePrimitive::Tick {
            hour,
            start: Vec2::polar(c, layout.dial_radius, angle),
            end: Vec2::polar(c, tick_outer, angle),
            width: layout.tick_width,
            color: theme.tick,
        });
    }

    for value in 1..=12 {
        out.push(FacePrimitive::Numeral {
            value,
            anchor: Vec2::polar(c, layout.numeral_radius, marker_angle_deg(value)),
            size: layout.font_size,
            color: theme.numeral,
            shadow: theme.numeral_shadow,
        });
    }

    out.push(FacePrimitive::Hand {
        start: c,
        end: Vec2::polar(c, layout.hand_length, hand_angle_deg(time)),
        width: layout.hand_width,
        paint: corner_to_corner(theme.hand_start, theme.hand_end),
    });

    out.push(FacePrimitive::Pivot {
        center: c,
        radius: layout.pivot_radius,
        paint: RadialGradient::new(
            c,
            layout.pivot_radius,
            even_stops(&[theme.pivot_center, theme.pivot_edge]),
        )
        .into(),
    });

    FacePlan { primitives: out }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn plan_at(h: u32, m: u32) -> FacePlan {
        let layout = FaceLayout::new(400.0, Vec2::zero()).unwrap();
        plan_face(&layout, WallTime::new(h, m), &Theme::default())
    }

    fn near(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn draw_order_is_back_to_front() {
        let plan = plan_at(10, 10);
        let p = plan.primitives();
        assert_eq!(p.len(), 28);
        assert!(matches!(p[0], FacePrimitive::Dial { .. }));
        assert!(matches!(p[1], FacePrimitive::Rim { .. }));
        assert!(p[2..14].iter().all(|x| matches!(x, FacePrimitive::Tick { .. })));
        assert!(p[14..26].iter().all(|x| matches!(x, FacePrimitive::Numeral { .. })));
        assert!(matches!(p[26], FacePrimitive::Hand { .. }));
        assert!(matches!(p[27], FacePrimitive::Pivot { .. }));
    }

    #[test]
    fn first_tick_and_twelve_point_up() {
        let plan = plan_at(0, 0);
        let FacePrimitive::Tick { hour, start, end, .. } = &plan.primitives()[2] else {
            panic!("expected tick");
        };
        assert_eq!(*hour, 0);
        assert!(near(*start, Vec2::new(200.0, 200.0 - 153.0)));
        assert!(near(*end, Vec2::new(200.0, 200.0 - 171.0)));

        let FacePrimitive::Numeral { value, anchor, .. } = &plan.primitives()[25] else {
            panic!("expected numeral");
        };
        assert_eq!(*value, 12);
        assert!(near(*anchor, Vec2::new(200.0, 200.0 - 181.8)));
    }

    #[test]
    fn numeral_three_sits_on_the_right() {
        let plan = plan_at(0, 0);
        let FacePrimitive::Numeral { value, anchor, .. } = &plan.primitives()[16] else {
            panic!("expected numeral");
        };
        assert_eq!(*value, 3);
        assert!(near(*anchor, Vec2::new(200.0 + 181.8, 200.0)));
    }

    #[test]
    fn hand_at_three_points_right() {
        let plan = plan_at(3, 0);
        let FacePrimitive::Hand { start, end, .. } = &plan.primitives()[26] else {
            panic!("expected hand");
        };
        assert!(near(*start, Vec2::new(200.0, 200.0)));
        assert!(near(*end, Vec2::new(200.0 + 145.35, 200.0)));
    }

    #[test]
    fn degenerate_bounds_plan_nothing() {
        let theme = Theme::default();
        for bounds in [Rect::new(0.0, 0.0, 0.0, 600.0), Rect::new(0.0, 0.0, 800.0, -1.0)] {
            assert!(FacePlan::for_bounds(bounds, WallTime::default(), &theme).is_empty());
        }
    }

    #[test]
    fn bounds_are_fitted_to_a_centered_square() {
        let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
        let plan = FacePlan::for_bounds(bounds, WallTime::default(), &Theme::default());
        assert_eq!(plan.len(), 28);
        let FacePrimitive::Dial { center, radius, .. } = &plan.primitives()[0] else {
            panic!("expected dial");
        };
        assert!(near(*center, Vec2::new(400.0, 300.0)));
        assert!((radius - 0.85 * 0.45 * 600.0).abs() < 1e-3);
    }

    #[test]
    fn rim_gradient_spans_the_canvas() {
        let layout = FaceLayout::new(300.0, Vec2::new(50.0, 0.0)).unwrap();
        let plan = plan_face(&layout, WallTime::default(), &Theme::default());
        let FacePrimitive::Rim { paint: Paint::LinearGradient(g), .. } = &plan.primitives()[1]
        else {
            panic!("expected linear rim");
        };
        assert_eq!(g.start, Vec2::new(50.0, 0.0));
        assert_eq!(g.end, Vec2::new(350.0, 300.0));
    }

    proptest! {
        #[test]
        fn markers_share_the_hour_angle(side in 10.0f32..4000.0) {
            let layout = FaceLayout::new(side, Vec2::zero()).unwrap();
            let plan = plan_face(&layout, WallTime::default(), &Theme::default());
            for prim in plan.iter() {
                let (idx, point, radius) = match prim {
                    FacePrimitive::Tick { hour, start, .. } => (*hour, *start, layout.dial_radius),
                    FacePrimitive::Numeral { value, anchor, .. } => {
                        (*value, *anchor, layout.numeral_radius)
                    }
                    _ => continue,
                };
                let expected = Vec2::polar(layout.center, radius, idx as f32 * 30.0 - 90.0);
                prop_assert!((point - expected).length() < 1e-4 * side + 1e-3);
            }
        }
    }
}
