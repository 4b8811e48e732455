//! Shared GPU types and utilities used by the shape renderers.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Viewport;
use crate::paint::Paint;
use crate::render::RenderCtx;

// ── blend ─────────────────────────────────────────────────────────────────

fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── viewport uniform ──────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

impl ViewportUniform {
    fn from_viewport(vp: Viewport) -> Self {
        Self { viewport: [vp.width.max(1.0), vp.height.max(1.0)], _pad: [0.0; 2] }
    }
}

/// Minimum binding size of the viewport uniform (16 bytes, never zero).
fn viewport_ubo_min_binding_size() -> Option<std::num::NonZeroU64> {
    std::num::NonZeroU64::new(std::mem::size_of::<ViewportUniform>() as u64)
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    pub pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── paint resolution ──────────────────────────────────────────────────────

/// Shader-side paint kinds; must match the `PAINT_*` constants in the WGSL.
const PAINT_SOLID: f32 = 0.0;
const PAINT_LINEAR: f32 = 1.0;
const PAINT_RADIAL: f32 = 2.0;

/// GPU form of a [`Paint`].
///
/// - solid: `color0 == color1`
/// - linear: `p0`/`p1` are the gradient endpoints
/// - radial: `p0` is the center, `p1.x` the radius
#[derive(Debug, Copy, Clone, PartialEq)]
pub(super) struct PaintParams {
    pub color0: [f32; 4],
    pub color1: [f32; 4],
    pub p0: [f32; 2],
    pub p1: [f32; 2],
    pub kind: f32,
}

impl PaintParams {
    fn solid(color: [f32; 4]) -> Self {
        Self { color0: color, color1: color, p0: [0.0; 2], p1: [0.0; 2], kind: PAINT_SOLID }
    }
}

/// Converts a `Paint` to shader parameters.
///
/// Gradients are reduced to their first and last stop; more stops emit a
/// one-time debug message. Structurally invalid gradients fall back to a
/// solid fill with their first stop.
pub(super) fn resolve_paint(paint: &Paint, warned_multi_stop: &mut bool) -> PaintParams {
    let (stops, valid, kind, p0, p1) = match paint {
        Paint::Solid(c) => return PaintParams::solid(c.to_array()),
        Paint::LinearGradient(g) => (
            &g.stops,
            g.is_valid(),
            PAINT_LINEAR,
            [g.start.x, g.start.y],
            [g.end.x, g.end.y],
        ),
        Paint::RadialGradient(g) => (
            &g.stops,
            g.is_valid(),
            PAINT_RADIAL,
            [g.center.x, g.center.y],
            [g.radius, 0.0],
        ),
    };

    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return PaintParams::solid([0.0; 4]);
    };
    if !valid {
        return PaintParams::solid(first.color.to_array());
    }

    if stops.len() > 2 && !*warned_multi_stop {
        log::debug!("only 2-stop gradients supported; using first and last stop");
        *warned_multi_stop = true;
    }

    PaintParams { color0: first.color.to_array(), color1: last.color.to_array(), p0, p1, kind }
}

// ── instanced quad pipeline ───────────────────────────────────────────────

/// Texture + sampler bound next to the viewport uniform.
///
/// `generation` changes whenever the texture is recreated, which forces the
/// bind group to be rebuilt.
#[derive(Copy, Clone)]
pub(super) struct AtlasBinding<'a> {
    pub view: &'a wgpu::TextureView,
    pub sampler: &'a wgpu::Sampler,
    pub generation: u64,
}

/// Lazily-built pipeline for shapes drawn as one instanced unit quad each.
///
/// Bindings: `0` viewport uniform (vertex); textured pipelines add `1` a
/// filterable 2D texture and `2` its sampler (fragment).
pub(super) struct QuadPipeline {
    label: &'static str,
    shader_src: &'static str,
    instance_layout: fn() -> wgpu::VertexBufferLayout<'static>,
    textured: bool,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    viewport_ubo: Option<wgpu::Buffer>,
    bind_group: Option<wgpu::BindGroup>,
    bound_generation: Option<u64>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl QuadPipeline {
    pub(super) fn new(
        label: &'static str,
        shader_src: &'static str,
        instance_layout: fn() -> wgpu::VertexBufferLayout<'static>,
    ) -> Self {
        Self {
            label,
            shader_src,
            instance_layout,
            textured: false,
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            viewport_ubo: None,
            bind_group: None,
            bound_generation: None,
            quad_vbo: None,
            quad_ibo: None,
            instance_vbo: None,
            instance_capacity: 0,
        }
    }

    /// Same as [`QuadPipeline::new`] with texture and sampler bindings.
    pub(super) fn textured(
        label: &'static str,
        shader_src: &'static str,
        instance_layout: fn() -> wgpu::VertexBufferLayout<'static>,
    ) -> Self {
        Self { textured: true, ..Self::new(label, shader_src, instance_layout) }
    }

    /// Uploads the frame's instances and the viewport uniform.
    ///
    /// Textured pipelines skip the upload when `atlas` is `None`.
    pub(super) fn upload<T: Pod>(
        &mut self,
        ctx: &RenderCtx<'_>,
        instances: &[T],
        atlas: Option<AtlasBinding<'_>>,
    ) {
        if instances.is_empty() || (self.textured && atlas.is_none()) {
            return;
        }
        self.ensure_pipeline(ctx);
        self.ensure_bind_group(ctx, atlas);
        self.ensure_static_buffers(ctx);
        self.ensure_instance_capacity::<T>(ctx, instances.len());

        if let Some(ubo) = self.viewport_ubo.as_ref() {
            let uniform = ViewportUniform::from_viewport(ctx.viewport);
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&uniform));
        }
        if let Some(vbo) = self.instance_vbo.as_ref() {
            ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(instances));
        }
    }

    /// Draws `instances` (indices into the last upload).
    pub(super) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, instances: Range<u32>) {
        if instances.is_empty() {
            return;
        }
        let (Some(pipeline), Some(bind_group)) = (self.pipeline.as_ref(), self.bind_group.as_ref())
        else {
            return;
        };
        let (Some(quad_vbo), Some(quad_ibo), Some(instance_vbo)) =
            (self.quad_vbo.as_ref(), self.quad_ibo.as_ref(), self.instance_vbo.as_ref())
        else {
            return;
        };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, instances);
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn layout_entries(&self) -> Vec<wgpu::BindGroupLayoutEntry> {
        let mut entries = vec![wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: viewport_ubo_min_binding_size(),
            },
            count: None,
        }];
        if self.textured {
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            });
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            });
        }
        entries
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.label),
            source: wgpu::ShaderSource::Wgsl(self.shader_src.into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(self.label),
                entries: &self.layout_entries(),
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(self.label),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(self.label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), (self.instance_layout)()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("built pipeline '{}' for {:?}", self.label, ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
    }

    fn ensure_bind_group(&mut self, ctx: &RenderCtx<'_>, atlas: Option<AtlasBinding<'_>>) {
        let generation = atlas.map(|a| a.generation);
        if self.bind_group.is_some() && self.bound_generation == generation {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let viewport_ubo = self.viewport_ubo.get_or_insert_with(|| {
            ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: std::mem::size_of::<ViewportUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });

        let mut entries = vec![wgpu::BindGroupEntry {
            binding: 0,
            resource: viewport_ubo.as_entire_binding(),
        }];
        if let Some(atlas) = atlas {
            entries.push(wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(atlas.view),
            });
            entries.push(wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(atlas.sampler),
            });
        }

        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(self.label),
            layout: bgl,
            entries: &entries,
        }));
        self.bound_generation = generation;
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(self.label),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(self.label),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn ensure_instance_capacity<T>(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(64);
        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(self.label),
            size: (new_cap * std::mem::size_of::<T>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

/// Accumulates per-command instance ranges while building an upload.
#[derive(Debug, Default)]
pub(super) struct RangeRecorder {
    ranges: Vec<Range<u32>>,
}

impl RangeRecorder {
    /// Records that the command just processed produced instances
    /// `start..end` of the upload.
    pub(super) fn record(&mut self, start: usize, end: usize) {
        self.ranges.push(start as u32..end as u32);
    }

    pub(super) fn finish(self) -> Vec<Range<u32>> {
        self.ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::{even_stops, Color, LinearGradient, RadialGradient};

    #[test]
    fn solid_paint_has_equal_colors() {
        let mut warned = false;
        let p = resolve_paint(&Paint::Solid(Color::WHITE), &mut warned);
        assert_eq!(p.kind, PAINT_SOLID);
        assert_eq!(p.color0, p.color1);
    }

    #[test]
    fn radial_paint_packs_center_and_radius() {
        let mut warned = false;
        let g = RadialGradient::new(
            Vec2::new(5.0, 6.0),
            9.0,
            even_stops(&[Color::WHITE, Color::default()]),
        );
        let p = resolve_paint(&g.into(), &mut warned);
        assert_eq!(p.kind, PAINT_RADIAL);
        assert_eq!(p.p0, [5.0, 6.0]);
        assert_eq!(p.p1, [9.0, 0.0]);
        assert_eq!(p.color1, [0.0; 4]);
    }

    #[test]
    fn multi_stop_linear_uses_first_and_last_and_warns_once() {
        let mut warned = false;
        let black = Color::from_premul(0.0, 0.0, 0.0, 1.0);
        let g = LinearGradient::new(
            Vec2::zero(),
            Vec2::new(1.0, 1.0),
            even_stops(&[Color::WHITE, Color::default(), black]),
        );
        let p = resolve_paint(&g.into(), &mut warned);
        assert!(warned);
        assert_eq!(p.kind, PAINT_LINEAR);
        assert_eq!(p.color0, Color::WHITE.to_array());
        assert_eq!(p.color1, black.to_array());
    }

    #[test]
    fn invalid_gradient_falls_back_to_first_stop() {
        let mut warned = false;
        let g = LinearGradient::new(
            Vec2::zero(),
            Vec2::zero(),
            even_stops(&[Color::WHITE, Color::default()]),
        );
        let p = resolve_paint(&g.into(), &mut warned);
        assert_eq!(p.kind, PAINT_SOLID);
        assert_eq!(p.color0, Color::WHITE.to_array());
    }

    #[test]
    fn textured_layout_adds_texture_and_sampler() {
        fn no_instances() -> wgpu::VertexBufferLayout<'static> {
            QuadVertex::layout()
        }
        let plain = QuadPipeline::new("plain", "", no_instances);
        let textured = QuadPipeline::textured("textured", "", no_instances);
        assert_eq!(plain.layout_entries().len(), 1);
        let bindings: Vec<u32> = textured.layout_entries().iter().map(|e| e.binding).collect();
        assert_eq!(bindings, vec![0, 1, 2]);
    }

    #[test]
    fn viewport_uniform_never_zero() {
        let u = ViewportUniform::from_viewport(Viewport::new(0.0, 300.0));
        assert_eq!(u.viewport, [1.0, 300.0]);
    }
}
