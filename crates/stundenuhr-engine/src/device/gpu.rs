use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface;

/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface format when one exists. Paint colors are linear
    /// and rely on the target to encode them.
    pub prefer_srgb: bool,
    pub present_mode: wgpu::PresentMode,
    /// Unsupported values fall back to the surface's first alpha mode.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    /// A face that redraws once a second has no use for the discrete GPU.
    pub power_preference: wgpu::PowerPreference,
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::LowPower,
            desired_maximum_frame_latency: 2,
        }
    }
}

/// What the frame loop does after a failed surface acquire.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface reconfigured; the next frame can acquire again.
    Reconfigured,
    /// Transient; drop this frame.
    SkipFrame,
    /// Unrecoverable (out of memory); end the run loop.
    Fatal,
}

/// One acquired surface texture with its view and a fresh encoder.
///
/// Must be handed back to [`Gpu::submit`] promptly; an outstanding texture
/// blocks the next acquire.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// Device, queue and configured surface of one window.
///
/// The surface borrows the window for `'w`; the runtime stores both in one
/// self-referential entry.
pub struct Gpu<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    /// False while the window is minimized (0x0); the surface keeps its last
    /// valid configuration.
    drawable: bool,
}

impl<'w> Gpu<'w> {
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can present to this window")?;
        log::info!("using adapter {:?}", adapter.get_info().name);

        // The face needs nothing beyond WebGL2-level limits.
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("stundenuhr device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to open GPU device")?;

        let caps = surface.get_capabilities(&adapter);
        let config = surface::surface_config(&caps, (size.width, size.height), &init)
            .context("surface reports no usable formats")?;
        surface.configure(&device, &config);
        log::debug!("surface {:?} {}x{}", config.format, config.width, config.height);

        Ok(Self { surface, device, queue, config, drawable: true })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Applies a new physical window size. A 0x0 size only marks the
    /// surface as not drawable; wgpu rejects empty configurations.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.drawable = new_size.width > 0 && new_size.height > 0;
        if !self.drawable {
            return;
        }
        if (self.config.width, self.config.height) == (new_size.width, new_size.height) {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquires the next surface texture.
    ///
    /// A minimized window reports `SurfaceError::Outdated` without touching
    /// the surface.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        if !self.drawable {
            return Err(SurfaceError::Outdated);
        }
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("stundenuhr frame encoder"),
        });
        Ok(GpuFrame { surface_texture, view, encoder })
    }

    /// Submits the frame's commands and presents it.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame { surface_texture, view, encoder } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    /// Reacts to a failed acquire and tells the caller how to proceed.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        let action = surface::classify_surface_error(&err);
        match action {
            SurfaceErrorAction::Reconfigured if self.drawable => {
                log::debug!("reconfiguring surface after: {err}");
                self.surface.configure(&self.device, &self.config);
            }
            SurfaceErrorAction::Reconfigured => {}
            SurfaceErrorAction::SkipFrame => log::debug!("skipping frame: {err}"),
            SurfaceErrorAction::Fatal => log::error!("fatal surface error: {err}"),
        }
        action
    }
}
