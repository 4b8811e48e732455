use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::render::RenderCtx;
use crate::scene::{CircleCmd, CircleStyle};

use super::common::{resolve_paint, QuadPipeline, RangeRecorder};

/// Renderer for `DrawCmd::Circle`.
///
/// Supported paints:
/// - `Paint::Solid`
/// - `Paint::LinearGradient` / `Paint::RadialGradient` (2-stop; first and last stop
///   are used for gradients with more stops)
///
/// `CircleStyle::Stroke` renders an AA ring centered on the radius.
pub struct CircleRenderer {
    quad: QuadPipeline,
    warned_multi_stop: bool,
}

impl Default for CircleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CircleRenderer {
    pub fn new() -> Self {
        Self {
            quad: QuadPipeline::new(
                "stundenuhr circle",
                include_str!("shaders/circle.wgsl"),
                CircleInstance::layout,
            ),
            warned_multi_stop: false,
        }
    }

    /// Uploads all circles of the frame.
    ///
    /// Returns one instance range per command, in input order. Skipped
    /// commands (non-positive radius, non-finite geometry) get an empty range.
    pub fn prepare(&mut self, ctx: &RenderCtx<'_>, cmds: &[&CircleCmd]) -> Vec<Range<u32>> {
        let mut instances: Vec<CircleInstance> = Vec::with_capacity(cmds.len());
        let mut ranges = RangeRecorder::default();

        for cmd in cmds {
            let start = instances.len();
            if let Some(inst) = self.instance_for(cmd) {
                instances.push(inst);
            }
            ranges.record(start, instances.len());
        }

        self.quad.upload(ctx, &instances, None);
        ranges.finish()
    }

    /// Draws a sub-range of the instances uploaded by the last `prepare`.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, instances: Range<u32>) {
        self.quad.draw(rpass, instances);
    }

    fn instance_for(&mut self, cmd: &CircleCmd) -> Option<CircleInstance> {
        if !(cmd.radius > 0.0) || !cmd.center.is_finite() {
            return None;
        }
        let stroke_width = match cmd.style {
            CircleStyle::Fill => 0.0,
            CircleStyle::Stroke(w) if w > 0.0 && w.is_finite() => w,
            CircleStyle::Stroke(_) => return None,
        };

        let paint = resolve_paint(&cmd.paint, &mut self.warned_multi_stop);
        Some(CircleInstance {
            center: [cmd.center.x, cmd.center.y],
            radius_stroke: [cmd.radius, stroke_width],
            color0: paint.color0,
            color1: paint.color1,
            grad_p0: paint.p0,
            grad_p1: paint.p1,
            paint_kind: [paint.kind, 0.0],
            _pad: [0.0; 2],
        })
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (80 bytes):
///
///  offset  0  center        [f32; 2]   loc 1
///  offset  8  radius_stroke [f32; 2]   loc 2  (.x = radius, .y = stroke width, 0 = fill)
///  offset 16  color0        [f32; 4]   loc 3
///  offset 32  color1        [f32; 4]   loc 4
///  offset 48  grad_p0       [f32; 2]   loc 5
///  offset 56  grad_p1       [f32; 2]   loc 6
///  offset 64  paint_kind    [f32; 2]   loc 7  (.x = kind)
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CircleInstance {
    center: [f32; 2],
    radius_stroke: [f32; 2],
    color0: [f32; 4],
    color1: [f32; 4],
    grad_p0: [f32; 2],
    grad_p1: [f32; 2],
    paint_kind: [f32; 2],
    _pad: [f32; 2],
}

impl CircleInstance {
    const ATTRS: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
        1 => Float32x2, // center
        2 => Float32x2, // radius_stroke
        3 => Float32x4, // color0
        4 => Float32x4, // color1
        5 => Float32x2, // grad_p0
        6 => Float32x2, // grad_p1
        7 => Float32x2  // paint_kind
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CircleInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::{Color, Paint};

    fn cmd(radius: f32, style: CircleStyle) -> CircleCmd {
        CircleCmd::new(Vec2::new(10.0, 10.0), radius, Paint::Solid(Color::WHITE), style)
    }

    #[test]
    fn instance_layout_is_80_bytes() {
        assert_eq!(std::mem::size_of::<CircleInstance>(), 80);
    }

    #[test]
    fn fill_has_zero_stroke() {
        let mut r = CircleRenderer::new();
        let inst = r.instance_for(&cmd(5.0, CircleStyle::Fill)).unwrap();
        assert_eq!(inst.radius_stroke, [5.0, 0.0]);
    }

    #[test]
    fn degenerate_circles_are_skipped() {
        let mut r = CircleRenderer::new();
        assert!(r.instance_for(&cmd(0.0, CircleStyle::Fill)).is_none());
        assert!(r.instance_for(&cmd(f32::NAN, CircleStyle::Fill)).is_none());
        assert!(r.instance_for(&cmd(5.0, CircleStyle::Stroke(0.0))).is_none());
        assert!(r.instance_for(&cmd(5.0, CircleStyle::Stroke(2.0))).is_some());
    }
}
