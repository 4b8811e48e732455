use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::render::RenderCtx;
use crate::scene::{LineCap, LineCmd};

use super::common::{resolve_paint, QuadPipeline, RangeRecorder};

/// Renderer for `DrawCmd::Line`.
///
/// Each segment is one oriented quad shaded with a signed distance to the
/// segment (round caps) or to its rectangle (butt caps).
pub struct LineRenderer {
    quad: QuadPipeline,
    warned_multi_stop: bool,
}

impl Default for LineRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineRenderer {
    pub fn new() -> Self {
        Self {
            quad: QuadPipeline::new(
                "stundenuhr line",
                include_str!("shaders/line.wgsl"),
                LineInstance::layout,
            ),
            warned_multi_stop: false,
        }
    }

    /// Uploads all line segments of the frame.
    ///
    /// Returns one instance range per command, in input order.
    pub fn prepare(&mut self, ctx: &RenderCtx<'_>, cmds: &[&LineCmd]) -> Vec<Range<u32>> {
        let mut instances: Vec<LineInstance> = Vec::with_capacity(cmds.len());
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

    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, instances: Range<u32>) {
        self.quad.draw(rpass, instances);
    }

    fn instance_for(&mut self, cmd: &LineCmd) -> Option<LineInstance> {
        if !(cmd.width > 0.0) || !cmd.width.is_finite() {
            return None;
        }
        if !cmd.start.is_finite() || !cmd.end.is_finite() {
            return None;
        }
        // A zero-length butt segment covers nothing.
        if cmd.start == cmd.end && cmd.cap == LineCap::Butt {
            return None;
        }

        let cap = match cmd.cap {
            LineCap::Butt => 0.0,
            LineCap::Round => 1.0,
        };
        let paint = resolve_paint(&cmd.paint, &mut self.warned_multi_stop);
        Some(LineInstance {
            start: [cmd.start.x, cmd.start.y],
            end: [cmd.end.x, cmd.end.y],
            width_cap: [cmd.width, cap],
            paint_kind: [paint.kind, 0.0],
            color0: paint.color0,
            color1: paint.color1,
            grad_p0: paint.p0,
            grad_p1: paint.p1,
        })
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (80 bytes):
///
///  offset  0  start       [f32; 2]   loc 1
///  offset  8  end         [f32; 2]   loc 2
///  offset 16  width_cap   [f32; 2]   loc 3  (.x = width, .y = 1 for round caps)
///  offset 24  paint_kind  [f32; 2]   loc 4  (.x = kind)
///  offset 32  color0      [f32; 4]   loc 5
///  offset 48  color1      [f32; 4]   loc 6
///  offset 64  grad_p0     [f32; 2]   loc 7
///  offset 72  grad_p1     [f32; 2]   loc 8
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LineInstance {
    start: [f32; 2],
    end: [f32; 2],
    width_cap: [f32; 2],
    paint_kind: [f32; 2],
    color0: [f32; 4],
    color1: [f32; 4],
    grad_p0: [f32; 2],
    grad_p1: [f32; 2],
}

impl LineInstance {
    const ATTRS: [wgpu::VertexAttribute; 8] = wgpu::vertex_attr_array![
        1 => Float32x2, // start
        2 => Float32x2, // end
        3 => Float32x2, // width_cap
        4 => Float32x2, // paint_kind
        5 => Float32x4, // color0
        6 => Float32x4, // color1
        7 => Float32x2, // grad_p0
        8 => Float32x2  // grad_p1
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineInstance>() as u64,
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

    fn cmd(start: Vec2, end: Vec2, width: f32, cap: LineCap) -> LineCmd {
        LineCmd::new(start, end, width, Paint::Solid(Color::WHITE), cap)
    }

    #[test]
    fn instance_layout_is_80_bytes() {
        assert_eq!(std::mem::size_of::<LineInstance>(), 80);
    }

    #[test]
    fn round_cap_flag_is_packed() {
        let mut r = LineRenderer::new();
        let inst = r
            .instance_for(&cmd(Vec2::zero(), Vec2::new(10.0, 0.0), 4.0, LineCap::Round))
            .unwrap();
        assert_eq!(inst.width_cap, [4.0, 1.0]);
    }

    #[test]
    fn zero_length_round_line_is_a_dot() {
        let mut r = LineRenderer::new();
        let p = Vec2::new(3.0, 3.0);
        assert!(r.instance_for(&cmd(p, p, 4.0, LineCap::Round)).is_some());
        assert!(r.instance_for(&cmd(p, p, 4.0, LineCap::Butt)).is_none());
    }

    #[test]
    fn non_positive_width_is_skipped() {
        let mut r = LineRenderer::new();
        let zero_width = cmd(Vec2::zero(), Vec2::new(1.0, 0.0), 0.0, LineCap::Butt);
        assert!(r.instance_for(&zero_width).is_none());
    }
}
