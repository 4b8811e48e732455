use std::collections::HashMap;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::render::RenderCtx;
use crate::scene::TextCmd;
use crate::text::FontSystem;

use super::common::{AtlasBinding, QuadPipeline, RangeRecorder};

const ATLAS_SIZE: u32 = 1024;
const GLYPH_PADDING: u32 = 1; // pixels between glyphs in the atlas

/// Atlas region of a rasterized glyph, in normalized texture coordinates.
#[derive(Debug, Copy, Clone)]
struct AtlasSlot {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

/// Renderer for `DrawCmd::Text`.
///
/// Keeps an R8Unorm shelf-packed glyph atlas. Glyphs are rasterized with
/// fontdue on first use and cached, keyed by `GlyphRasterConfig` (font,
/// glyph index, pixel size). A numeral drawn twice at the same size, as text
/// and as its shadow, is rasterized once.
pub struct TextRenderer {
    quad: QuadPipeline,

    atlas: Option<(wgpu::Texture, wgpu::TextureView)>,
    sampler: Option<wgpu::Sampler>,
    /// Bumped whenever the atlas texture is recreated.
    atlas_generation: u64,
    shelf: Shelf,
    slots: HashMap<GlyphRasterConfig, AtlasSlot>,

    layout: Layout<()>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            quad: QuadPipeline::textured(
                "stundenuhr text",
                include_str!("shaders/text.wgsl"),
                GlyphInstance::layout,
            ),
            atlas: None,
            sampler: None,
            atlas_generation: 0,
            shelf: Shelf::new(ATLAS_SIZE),
            slots: HashMap::new(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }

    /// Lays out and uploads every text command of the frame.
    ///
    /// Glyphs are rasterized at `size * scale_factor` so they stay crisp on
    /// high-DPI surfaces. Returns one glyph-instance range per command, in
    /// input order; unknown fonts and empty strings yield an empty range.
    pub fn prepare(
        &mut self,
        ctx: &RenderCtx<'_>,
        cmds: &[&TextCmd],
        font_system: &FontSystem,
    ) -> Vec<Range<u32>> {
        let mut ranges = RangeRecorder::default();
        if cmds.is_empty() {
            return ranges.finish();
        }
        self.ensure_atlas(ctx);

        // Resizing rasterizes every glyph at a new pixel size; once the atlas
        // fills up, start over instead of dropping glyphs for good.
        if self.shelf.full {
            self.reset_atlas();
        }

        let scale = if ctx.scale_factor.is_finite() && ctx.scale_factor > 0.0 {
            ctx.scale_factor
        } else {
            1.0
        };

        let mut instances: Vec<GlyphInstance> = Vec::new();
        for cmd in cmds {
            let start = instances.len();
            self.append_glyphs(ctx, cmd, font_system, scale, &mut instances);
            ranges.record(start, instances.len());
        }

        let binding = match (self.atlas.as_ref(), self.sampler.as_ref()) {
            (Some((_, view)), Some(sampler)) => {
                Some(AtlasBinding { view, sampler, generation: self.atlas_generation })
            }
            _ => None,
        };
        self.quad.upload(ctx, &instances, binding);

        ranges.finish()
    }

    /// Draws a sub-range of the glyphs uploaded by the last `prepare`.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, instances: Range<u32>) {
        self.quad.draw(rpass, instances);
    }

    fn append_glyphs(
        &mut self,
        ctx: &RenderCtx<'_>,
        cmd: &TextCmd,
        font_system: &FontSystem,
        scale: f32,
        out: &mut Vec<GlyphInstance>,
    ) {
        if cmd.text.is_empty() || !(cmd.size > 0.0) || !cmd.origin.is_finite() {
            return;
        }
        let Some(font) = font_system.get(cmd.font) else {
            log::warn!("TextRenderer: unknown FontId {:?}, skipping", cmd.font);
            return;
        };
        let color = cmd.color.to_array();

        // Layout in physical pixels; instances are mapped back to logical.
        self.layout.reset(&LayoutSettings {
            x: cmd.origin.x * scale,
            y: cmd.origin.y * scale,
            ..LayoutSettings::default()
        });
        self.layout.append(&[font], &TextStyle::new(&cmd.text, cmd.size * scale, 0));

        // Copy positions out so `self.layout` is no longer borrowed while
        // glyphs are placed into the atlas.
        let placed: Vec<(GlyphRasterConfig, f32, f32, usize, usize)> = self
            .layout
            .glyphs()
            .iter()
            .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
            .map(|g| (g.key, g.x, g.y, g.width, g.height))
            .collect();

        for (key, x, y, w, h) in placed {
            let slot = match self.slots.get(&key) {
                Some(slot) => *slot,
                None => {
                    let (metrics, bitmap) = font.rasterize_config(key);
                    let Some(slot) =
                        self.upload_glyph(ctx, &bitmap, metrics.width as u32, metrics.height as u32)
                    else {
                        continue;
                    };
                    self.slots.insert(key, slot);
                    slot
                }
            };

            out.push(GlyphInstance {
                dst_min: [x / scale, y / scale],
                dst_max: [(x + w as f32) / scale, (y + h as f32) / scale],
                uv_min: slot.uv_min,
                uv_max: slot.uv_max,
                color,
            });
        }
    }

    // ── atlas ──────────────────────────────────────────────────────────────

    fn upload_glyph(
        &mut self,
        ctx: &RenderCtx<'_>,
        bitmap: &[u8],
        w: u32,
        h: u32,
    ) -> Option<AtlasSlot> {
        if w == 0 || h == 0 {
            return None;
        }
        let Some((texture, _)) = self.atlas.as_ref() else { return None };
        let Some((gx, gy)) = self.shelf.allocate(w, h) else {
            log::warn!("TextRenderer: glyph atlas full ({ATLAS_SIZE}px), dropping glyph");
            return None;
        };

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );

        let size = ATLAS_SIZE as f32;
        Some(AtlasSlot {
            uv_min: [gx as f32 / size, gy as f32 / size],
            uv_max: [(gx + w) as f32 / size, (gy + h) as f32 / size],
        })
    }

    fn ensure_atlas(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_none() {
            self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("stundenuhr text sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            }));
        }
        if self.atlas.is_some() {
            return;
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("stundenuhr text atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.atlas = Some((texture, view));
        self.atlas_generation += 1;
        self.reset_atlas();
    }

    fn reset_atlas(&mut self) {
        log::debug!("TextRenderer: resetting glyph atlas ({} cached glyphs)", self.slots.len());
        self.slots.clear();
        self.shelf = Shelf::new(ATLAS_SIZE);
    }
}

/// Row-based packer: glyphs fill a row left to right, a new row starts
/// below the tallest glyph of the previous one.
#[derive(Debug, Clone, PartialEq)]
struct Shelf {
    size: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl Shelf {
    fn new(size: u32) -> Self {
        Self {
            size,
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
            full: false,
        }
    }

    /// Top-left corner for a `w` x `h` glyph, or `None` once full.
    fn allocate(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full || w + 2 * GLYPH_PADDING > self.size {
            return None;
        }
        if self.cursor_x + w + GLYPH_PADDING > self.size {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }
        if self.cursor_y + h + GLYPH_PADDING > self.size {
            self.full = true;
            return None;
        }

        let at = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(at)
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (48 bytes):
///
///  offset  0  dst_min  [f32; 2]   loc 1
///  offset  8  dst_max  [f32; 2]   loc 2
///  offset 16  uv_min   [f32; 2]   loc 3
///  offset 24  uv_max   [f32; 2]   loc 4
///  offset 32  color    [f32; 4]   loc 5
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // dst_min
        2 => Float32x2, // dst_max
        3 => Float32x2, // uv_min
        4 => Float32x2, // uv_max
        5 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
