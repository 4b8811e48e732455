use std::time::Duration;

use winit::dpi::LogicalSize;

use stundenuhr_engine::coords::Viewport;
use stundenuhr_engine::core::{App, AppControl, FrameCtx};
use stundenuhr_engine::render::SceneRenderer;
use stundenuhr_engine::scene::DrawList;
use stundenuhr_engine::text::{FontId, FontSystem};
use stundenuhr_engine::time::RedrawPolicy;
use stundenuhr_engine::window::RuntimeConfig;
use stundenuhr_face::{Clock, FacePainter, FacePlan, Theme, WallTime};

/// Window and refresh settings of the clock.
#[derive(Debug, Clone)]
pub struct ClockConfig {
    pub title: String,
    /// Initial window side in logical pixels.
    pub side: f64,
    pub min_side: f64,
    /// Interval between time samples.
    pub refresh: Duration,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            title: "Stundenuhr".to_string(),
            side: 480.0,
            min_side: 120.0,
            refresh: Duration::from_secs(1),
        }
    }
}

impl ClockConfig {
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.side, self.side),
            min_size: Some(LogicalSize::new(self.min_side, self.min_side)),
            redraw: RedrawPolicy::Interval(self.refresh),
        }
    }
}

/// Samples the clock on every frame and draws the face.
pub struct ClockApp<C: Clock> {
    clock: C,
    theme: Theme,
    fonts: FontSystem,
    font: Option<FontId>,
    draw_list: DrawList,
    renderer: SceneRenderer,
    shown: Option<WallTime>,
}

impl<C: Clock> ClockApp<C> {
    pub fn new(clock: C, fonts: FontSystem, font: Option<FontId>) -> Self {
        Self {
            clock,
            theme: Theme::default(),
            fonts,
            font,
            draw_list: DrawList::new(),
            renderer: SceneRenderer::new(),
            shown: None,
        }
    }

    /// Rebuilds the draw list for a window of `viewport` logical size.
    fn record(&mut self, viewport: Viewport, scale: f32) {
        self.draw_list.clear();

        let now = WallTime::from_time(&self.clock.now());
        if self.shown != Some(now) {
            log::debug!("showing {:02}:{:02}", now.hour(), now.minute());
            self.shown = Some(now);
        }

        let plan = FacePlan::for_bounds(viewport.rect(), now, &self.theme);
        FacePainter::new(&mut self.draw_list, &self.fonts, self.font, scale).paint(&plan);
    }
}

impl<C: Clock + 'static> App for ClockApp<C> {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let viewport = ctx.window.viewport();
        let scale = ctx.window.window.scale_factor() as f32;
        self.record(viewport, scale);

        let Self { renderer, draw_list, fonts, theme, .. } = self;
        ctx.render(theme.background, |rctx, target| {
            renderer.render(rctx, target, draw_list, fonts);
        })
    }
}
