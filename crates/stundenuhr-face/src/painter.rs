//! Records a [`FacePlan`] into an engine draw list.

use stundenuhr_engine::coords::Vec2;
use stundenuhr_engine::paint::Color;
use stundenuhr_engine::scene::{CircleStyle, DrawList, LineCap, ZIndex};
use stundenuhr_engine::text::{FontId, FontSystem, LineMetrics};

use crate::plan::{FacePlan, FacePrimitive};
use crate::theme::TextShadow;

/// Copies around the center tap of a blurred shadow.
const SHADOW_RING_TAPS: u32 = 8;
/// Opacity share of each shadow copy.
const SHADOW_TAP_ALPHA: f32 = 0.2;

/// Writes face primitives into a `DrawList`, one command each (numerals add
/// shadow commands beneath them).
///
/// All commands share one z-index, so paint order is plan order.
pub struct FacePainter<'a> {
    draw_list: &'a mut DrawList,
    fonts: &'a FontSystem,
    font: Option<FontId>,
    /// Physical-to-logical pixel ratio of the frame.
    scale: f32,
    z: ZIndex,
}

impl<'a> FacePainter<'a> {
    /// `font == None` skips the numerals; everything else still paints.
    pub fn new(
        draw_list: &'a mut DrawList,
        fonts: &'a FontSystem,
        font: Option<FontId>,
        scale: f32,
    ) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        Self { draw_list, fonts, font, scale, z: ZIndex::default() }
    }

    pub fn paint(&mut self, plan: &FacePlan) {
        for prim in plan.iter() {
            self.primitive(prim);
        }
    }

    fn primitive(&mut self, prim: &FacePrimitive) {
        let z = self.z;
        match prim {
            FacePrimitive::Dial { center, radius, paint }
            | FacePrimitive::Pivot { center, radius, paint } => {
                self.draw_list.push_circle(z, *center, *radius, paint.clone(), CircleStyle::Fill);
            }
            FacePrimitive::Rim { center, radius, width, paint } => {
                self.draw_list.push_circle(
                    z,
                    *center,
                    *radius,
                    paint.clone(),
                    CircleStyle::Stroke(*width),
                );
            }
            FacePrimitive::Tick { start, end, width, color, .. } => {
                self.draw_list.push_solid_line(z, *start, *end, *width, *color, LineCap::Round);
            }
            FacePrimitive::Hand { start, end, width, paint } => {
                self.draw_list.push_line(z, *start, *end, *width, paint.clone(), LineCap::Round);
            }
            FacePrimitive::Numeral { value, anchor, size, color, shadow } => {
                let Some(font) = self.font else {
                    log::trace!("no font, skipping numeral {value}");
                    return;
                };
                let label = value.to_string();
                let origin = centered_text_origin(
                    *anchor,
                    self.advance_width(&label, font, *size),
                    self.line_metrics(font, *size),
                );
                for (offset, tint) in shadow_layers(shadow) {
                    self.draw_list.push_text(z, label.clone(), font, *size, tint, origin + offset);
                }
                self.draw_list.push_text(z, label, font, *size, *color, origin);
            }
        }
    }

    /// Width at the renderer's physical scale, in logical pixels.
    fn advance_width(&self, text: &str, font: FontId, size: f32) -> f32 {
        self.fonts.measure_text(text, font, size * self.scale) / self.scale
    }

    fn line_metrics(&self, font: FontId, size: f32) -> LineMetrics {
        let m = self.fonts.line_metrics(font, size * self.scale);
        LineMetrics { ascent: m.ascent / self.scale, descent: m.descent / self.scale }
    }
}

/// Top-left origin that centers a single line of text on `anchor`.
///
/// Horizontally the advance width is centered; vertically the
/// ascent-to-descent box is, so digits sit on the ring regardless of the
/// font's baseline position.
pub fn centered_text_origin(anchor: Vec2, advance: f32, metrics: LineMetrics) -> Vec2 {
    let baseline = anchor.y + (metrics.ascent + metrics.descent) * 0.5;
    Vec2::new(anchor.x - advance * 0.5, baseline - metrics.ascent)
}

/// Offset and tint of each copy that approximates a blurred text shadow.
///
/// Without blur this is the shadow itself. Otherwise one copy sits at the
/// offset and the rest ring it at half the blur radius, each carrying a share
/// of the opacity, so the edge fades over roughly `blur` pixels.
pub fn shadow_layers(shadow: &TextShadow) -> Vec<(Vec2, Color)> {
    if !shadow.blur.is_finite() || shadow.blur <= 0.0 {
        return vec![(shadow.offset, shadow.color)];
    }
    let tint = shadow.color.with_alpha_scaled(SHADOW_TAP_ALPHA);
    let spread = shadow.blur * 0.5;
    let step = 360.0 / SHADOW_RING_TAPS as f32;

    let mut layers = Vec::with_capacity(1 + SHADOW_RING_TAPS as usize);
    layers.push((shadow.offset, tint));
    layers.extend(
        (0..SHADOW_RING_TAPS).map(|i| (Vec2::polar(shadow.offset, spread, i as f32 * step), tint)),
    );
    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FaceLayout;
    use crate::plan::plan_face;
    use crate::theme::Theme;
    use crate::time::WallTime;
    use stundenuhr_engine::scene::{DrawCmd, ShapeKind};

    #[test]
    fn centers_box_on_anchor() {
        let m = LineMetrics { ascent: 16.0, descent: -4.0 };
        let o = centered_text_origin(Vec2::new(100.0, 50.0), 20.0, m);
        assert_eq!(o.x, 90.0);
        // Box spans o.y .. o.y + ascent - descent, centered on 50.
        assert_eq!(o.y, 40.0);
        assert_eq!(o.y + (m.ascent - m.descent) * 0.5, 50.0);
    }

    fn shadow(blur: f32) -> TextShadow {
        TextShadow { color: Color::from_argb_hex(0xFF44_4444), offset: Vec2::new(3.0, 3.0), blur }
    }

    #[test]
    fn hard_shadow_is_a_single_copy() {
        let s = shadow(0.0);
        assert_eq!(shadow_layers(&s), vec![(s.offset, s.color)]);
    }

    #[test]
    fn blurred_shadow_spreads_around_the_offset() {
        let s = shadow(5.0);
        let layers = shadow_layers(&s);
        assert_eq!(layers.len(), 9);

        let sum = layers.iter().fold(Vec2::zero(), |acc, (p, _)| acc + *p);
        let mean = sum * (1.0 / layers.len() as f32);
        assert!((mean - s.offset).length() < 1e-4);

        let widest = layers.iter().map(|(p, _)| (*p - s.offset).length()).fold(0.0, f32::max);
        assert!((widest - 2.5).abs() < 1e-4);

        for (_, tint) in &layers {
            assert!(tint.a < s.color.a);
            assert!(tint.r <= tint.a && tint.g <= tint.a && tint.b <= tint.a);
        }
    }

    #[test]
    fn overlapping_copies_stay_close_to_the_shadow_color() {
        let s = shadow(5.0);
        let layers = shadow_layers(&s);
        // Where every copy overlaps, source-over coverage is 1 - (1 - a)^n.
        let covered = 1.0 - layers.iter().fold(1.0, |left, (_, c)| left * (1.0 - c.a));
        assert!(covered > 0.8 && covered <= s.color.a);
    }

    #[test]
    fn without_font_numerals_are_skipped() {
        let layout = FaceLayout::new(400.0, Vec2::zero()).unwrap();
        let plan = plan_face(&layout, WallTime::new(4, 20), &Theme::default());
        let fonts = FontSystem::new();
        let mut list = DrawList::new();

        FacePainter::new(&mut list, &fonts, None, 1.0).paint(&plan);

        // dial, rim, 12 ticks, hand, pivot
        assert_eq!(list.len(), 16);
        let kinds: Vec<ShapeKind> = list.batches().iter().map(|b| b.kind).collect();
        assert_eq!(kinds, vec![ShapeKind::Circle, ShapeKind::Line, ShapeKind::Circle]);
    }

    #[test]
    fn rim_is_a_stroke_and_ticks_are_round() {
        let layout = FaceLayout::new(200.0, Vec2::zero()).unwrap();
        let plan = plan_face(&layout, WallTime::default(), &Theme::default());
        let fonts = FontSystem::new();
        let mut list = DrawList::new();
        FacePainter::new(&mut list, &fonts, None, 2.0).paint(&plan);

        let cmds: Vec<&DrawCmd> = list.iter_in_paint_order().map(|i| &i.cmd).collect();
        let DrawCmd::Circle(rim) = cmds[1] else { panic!("expected rim circle") };
        assert_eq!(rim.style, CircleStyle::Stroke(layout.rim_width));
        let DrawCmd::Line(tick) = cmds[2] else { panic!("expected tick line") };
        assert_eq!(tick.cap, LineCap::Round);
    }
}
