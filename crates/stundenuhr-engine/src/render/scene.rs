use std::ops::Range;

use crate::render::shapes::circle::CircleRenderer;
use crate::render::shapes::line::LineRenderer;
use crate::render::shapes::text::TextRenderer;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{Batch, CircleCmd, DrawCmd, DrawList, LineCmd, ShapeKind, TextCmd};
use crate::text::FontSystem;

/// Renders a whole [`DrawList`] in paint order.
///
/// All instances are uploaded once per frame, then the list's batches are
/// replayed inside a single render pass, switching pipelines whenever the
/// shape kind changes. A circle recorded after a line therefore covers it,
/// regardless of which renderer owns which kind.
#[derive(Default)]
pub struct SceneRenderer {
    circles: CircleRenderer,
    lines: LineRenderer,
    text: TextRenderer,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `draw_list` on top of the target's current contents.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        font_system: &FontSystem,
    ) {
        let batches = draw_list.batches();
        if batches.is_empty() {
            return;
        }

        let mut circles: Vec<&CircleCmd> = Vec::new();
        let mut lines: Vec<&LineCmd> = Vec::new();
        let mut texts: Vec<&TextCmd> = Vec::new();
        // Index of each paint-order item within its kind's list.
        let mut kind_pos: Vec<usize> = Vec::with_capacity(draw_list.len());

        for item in draw_list.iter_in_paint_order() {
            match &item.cmd {
                DrawCmd::Circle(c) => {
                    kind_pos.push(circles.len());
                    circles.push(c);
                }
                DrawCmd::Line(l) => {
                    kind_pos.push(lines.len());
                    lines.push(l);
                }
                DrawCmd::Text(t) => {
                    kind_pos.push(texts.len());
                    texts.push(t);
                }
            }
        }

        let ranges = KindRanges {
            circle: self.circles.prepare(ctx, &circles),
            line: self.lines.prepare(ctx, &lines),
            text: self.text.prepare(ctx, &texts, font_system),
        };
        let draws = plan_draws(&batches, &kind_pos, &ranges);

        log::trace!(
            "scene: {} items, {} batches, {} draw calls",
            kind_pos.len(),
            batches.len(),
            draws.len()
        );

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("stundenuhr scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for (kind, instances) in draws {
            match kind {
                ShapeKind::Circle => self.circles.draw(&mut rpass, instances),
                ShapeKind::Line => self.lines.draw(&mut rpass, instances),
                ShapeKind::Text => self.text.draw(&mut rpass, instances),
            }
        }
    }
}

/// Per-command instance ranges returned by each renderer's `prepare`.
struct KindRanges {
    circle: Vec<Range<u32>>,
    line: Vec<Range<u32>>,
    text: Vec<Range<u32>>,
}

impl KindRanges {
    fn of(&self, kind: ShapeKind) -> &[Range<u32>] {
        match kind {
            ShapeKind::Circle => &self.circle,
            ShapeKind::Line => &self.line,
            ShapeKind::Text => &self.text,
        }
    }
}

/// Turns batches into one instanced draw each.
///
/// Commands of a batch are consecutive within their kind, so their instance
/// ranges are contiguous and merge into `first.start..last.end`. Batches with
/// no surviving instances are dropped.
fn plan_draws(
    batches: &[Batch],
    kind_pos: &[usize],
    ranges: &KindRanges,
) -> Vec<(ShapeKind, Range<u32>)> {
    batches
        .iter()
        .filter_map(|batch| {
            let per_cmd = ranges.of(batch.kind);
            let first = per_cmd.get(*kind_pos.get(batch.range.start)?)?;
            let last = per_cmd.get(*kind_pos.get(batch.range.end.checked_sub(1)?)?)?;
            let merged = first.start..last.end;
            (!merged.is_empty()).then_some((batch.kind, merged))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;
    use crate::scene::{CircleStyle, LineCap, ZIndex};

    #[test]
    fn interleaved_kinds_keep_paint_order() {
        // circle, line, line, circle  ->  4 items, 3 batches
        let batches = vec![
            Batch { kind: ShapeKind::Circle, range: 0..1 },
            Batch { kind: ShapeKind::Line, range: 1..3 },
            Batch { kind: ShapeKind::Circle, range: 3..4 },
        ];
        let kind_pos = vec![0, 0, 1, 1];
        let ranges = KindRanges {
            circle: vec![0..1, 1..2],
            line: vec![0..1, 1..2],
            text: vec![],
        };

        let draws = plan_draws(&batches, &kind_pos, &ranges);
        assert_eq!(
            draws,
            vec![
                (ShapeKind::Circle, 0..1),
                (ShapeKind::Line, 0..2),
                (ShapeKind::Circle, 1..2),
            ]
        );
    }

    #[test]
    fn text_batches_merge_glyph_ranges() {
        let batches = vec![Batch { kind: ShapeKind::Text, range: 0..2 }];
        let ranges = KindRanges { circle: vec![], line: vec![], text: vec![0..3, 3..5] };
        let draws = plan_draws(&batches, &[0, 1], &ranges);
        assert_eq!(draws, vec![(ShapeKind::Text, 0..5)]);
    }

    #[test]
    fn empty_batches_are_dropped() {
        let batches = vec![
            Batch { kind: ShapeKind::Circle, range: 0..1 },
            Batch { kind: ShapeKind::Text, range: 1..2 },
        ];
        // Circle skipped (zero radius), text has no glyphs.
        let ranges = KindRanges { circle: vec![0..0], line: vec![], text: vec![0..0] };
        assert!(plan_draws(&batches, &[0, 0], &ranges).is_empty());
    }

    #[test]
    fn batches_from_draw_list_map_through_kind_positions() {
        let mut list = DrawList::new();
        list.push_circle(
            ZIndex::new(0),
            Vec2::new(1.0, 1.0),
            1.0,
            Color::WHITE.into(),
            CircleStyle::Fill,
        );
        list.push_solid_line(
            ZIndex::new(0),
            Vec2::zero(),
            Vec2::new(1.0, 0.0),
            1.0,
            Color::WHITE,
            LineCap::Butt,
        );
        list.push_circle(
            ZIndex::new(0),
            Vec2::new(2.0, 2.0),
            1.0,
            Color::WHITE.into(),
            CircleStyle::Fill,
        );

        let batches = list.batches();
        let ranges = KindRanges { circle: vec![0..1, 1..2], line: vec![0..1], text: vec![] };
        let draws = plan_draws(&batches, &[0, 0, 1], &ranges);
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[2], (ShapeKind::Circle, 1..2));
    }
}
