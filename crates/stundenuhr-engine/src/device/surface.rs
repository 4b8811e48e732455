//! Surface policy helpers, kept free of wgpu handles so they can be tested.

use super::{GpuInit, SurfaceErrorAction};

/// Full surface configuration for a window of `size` physical pixels.
///
/// Returns `None` when the surface supports no formats.
pub(super) fn surface_config(
    caps: &wgpu::SurfaceCapabilities,
    size: (u32, u32),
    init: &GpuInit,
) -> Option<wgpu::SurfaceConfiguration> {
    let format = choose_surface_format(&caps.formats, init.prefer_srgb)?;
    let present_mode = if caps.present_modes.contains(&init.present_mode) {
        init.present_mode
    } else {
        wgpu::PresentMode::Fifo
    };
    Some(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.0.max(1),
        height: size.1.max(1),
        present_mode,
        alpha_mode: choose_alpha_mode(&caps.alpha_modes, init.alpha_mode),
        view_formats: vec![],
        desired_maximum_frame_latency: init.desired_maximum_frame_latency,
    })
}

/// Picks a surface format, preferring sRGB variants when requested.
///
/// Returns `None` only when the surface reports no formats at all.
pub(super) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = *formats.first()?;

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| formats.contains(f)) {
            return Some(f);
        }
        log::warn!("no sRGB surface format available; colors will look darker than intended");
    }

    Some(first)
}

/// Uses the requested alpha mode if supported, otherwise the surface's first.
pub(super) fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| supported.contains(m))
        .or_else(|| supported.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Maps an acquire error to what the frame loop should do next.
///
/// `Reconfigured` means the caller must reconfigure the surface before the
/// next acquire.
pub(super) fn classify_surface_error(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode, TextureFormat};

    #[test]
    fn prefers_srgb_when_present() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(choose_surface_format(&formats, true), Some(TextureFormat::Bgra8UnormSrgb));
    }

    #[test]
    fn falls_back_to_first_format() {
        let formats = [TextureFormat::Rgba16Float, TextureFormat::Bgra8Unorm];
        assert_eq!(choose_surface_format(&formats, true), Some(TextureFormat::Rgba16Float));
        assert_eq!(choose_surface_format(&formats, false), Some(TextureFormat::Rgba16Float));
    }

    #[test]
    fn no_formats_is_none() {
        assert_eq!(choose_surface_format(&[], true), None);
    }

    #[test]
    fn unsupported_alpha_mode_falls_back() {
        let supported = [CompositeAlphaMode::Opaque];
        assert_eq!(
            choose_alpha_mode(&supported, Some(CompositeAlphaMode::PreMultiplied)),
            CompositeAlphaMode::Opaque
        );
        assert_eq!(choose_alpha_mode(&[], None), CompositeAlphaMode::Auto);
    }

    fn caps(formats: Vec<TextureFormat>) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            present_modes: vec![wgpu::PresentMode::Fifo],
            alpha_modes: vec![CompositeAlphaMode::Opaque],
            ..Default::default()
        }
    }

    #[test]
    fn config_uses_chosen_format_and_size() {
        let config = surface_config(
            &caps(vec![TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb]),
            (800, 600),
            &GpuInit::default(),
        )
        .unwrap();
        assert_eq!(config.format, TextureFormat::Bgra8UnormSrgb);
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.alpha_mode, CompositeAlphaMode::Opaque);
    }

    #[test]
    fn unsupported_present_mode_falls_back_to_fifo() {
        let init = GpuInit { present_mode: wgpu::PresentMode::Mailbox, ..GpuInit::default() };
        let config = surface_config(&caps(vec![TextureFormat::Rgba8Unorm]), (1, 1), &init).unwrap();
        assert_eq!(config.present_mode, wgpu::PresentMode::Fifo);
    }

    #[test]
    fn config_without_formats_is_none() {
        assert!(surface_config(&caps(vec![]), (10, 10), &GpuInit::default()).is_none());
    }

    #[test]
    fn surface_errors_map_to_actions() {
        use wgpu::SurfaceError;
        assert_eq!(classify_surface_error(&SurfaceError::Lost), SurfaceErrorAction::Reconfigured);
        assert_eq!(classify_surface_error(&SurfaceError::Timeout), SurfaceErrorAction::SkipFrame);
        assert_eq!(classify_surface_error(&SurfaceError::OutOfMemory), SurfaceErrorAction::Fatal);
    }
}
