use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::time::{RedrawPolicy, RefreshTicker};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub min_size: Option<LogicalSize<f64>>,
    pub redraw: RedrawPolicy,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "stundenuhr".to_string(),
            initial_size: LogicalSize::new(640.0, 640.0),
            min_size: None,
            redraw: RedrawPolicy::Continuous,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and drives `app` until the window closes or the app
    /// asks to exit.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn ticker_for(policy: RedrawPolicy, start: Instant) -> Option<RefreshTicker> {
    match policy {
        RedrawPolicy::Continuous => None,
        RedrawPolicy::Interval(period) => Some(RefreshTicker::new(period, start)),
    }
}

/// What the loop does once it goes idle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Wakeup {
    redraw: bool,
    control_flow: ControlFlow,
}

/// Decides the next redraw for a window's ticker slot.
///
/// `None` means no window is open (never created, or torn down on exit):
/// nothing is redrawn and no deadline is armed. An open window without a
/// ticker redraws continuously.
fn schedule(window: Option<&mut Option<RefreshTicker>>, now: Instant) -> Wakeup {
    match window {
        None => Wakeup { redraw: false, control_flow: ControlFlow::Wait },
        Some(None) => Wakeup { redraw: true, control_flow: ControlFlow::Wait },
        Some(Some(ticker)) => Wakeup {
            redraw: ticker.poll(now),
            control_flow: ControlFlow::WaitUntil(ticker.deadline()),
        },
    }
}

#[self_referencing]
struct WindowEntry {
    ticker: Option<RefreshTicker>,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    exit_requested: bool,
    /// First fatal error; reported from `Runtime::run` after the loop ends.
    failure: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            exit_requested: false,
            failure: None,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        // Dropping the entry tears down the surface and the ticker with it.
        self.entry = None;
        event_loop.exit();
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let mut attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        if let Some(min) = self.config.min_size {
            attrs = attrs.with_min_inner_size(min);
        }

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let ticker = ticker_for(self.config.redraw, Instant::now());
        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            ticker,
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")
    }

    fn draw_frame(&mut self) -> AppControl {
        let Some(entry) = self.entry.as_mut() else {
            return AppControl::Continue;
        };
        let app = &mut self.app;

        entry.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: WindowCtx { window: fields.window },
                gpu: fields.gpu,
            };
            app.on_frame(&mut ctx)
        })
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if let StartCause::ResumeTimeReached { .. } = cause {
            log::trace!("refresh deadline reached");
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.entry = Some(entry);
            }
            Err(e) => {
                log::error!("failed to create initial window: {e:#}");
                self.failure = Some(e);
                self.request_exit(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }
        let now = Instant::now();
        let wakeup = match self.entry.as_mut() {
            Some(entry) => entry.with_ticker_mut(|ticker| schedule(Some(ticker), now)),
            None => schedule(None, now),
        };

        if wakeup.redraw {
            if let Some(entry) = self.entry.as_ref() {
                entry.with_window(|w| w.request_redraw());
            }
        }
        event_loop.set_control_flow(wakeup.control_flow);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                log::info!("window closed");
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => {
                if self.draw_frame() == AppControl::Exit {
                    self.request_exit(event_loop);
                }
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const SEC: Duration = Duration::from_secs(1);

    #[test]
    fn interval_waits_until_the_next_deadline() {
        let t0 = Instant::now();
        let mut ticker = Some(RefreshTicker::new(SEC, t0));

        let idle = schedule(Some(&mut ticker), t0 + Duration::from_millis(400));
        assert!(!idle.redraw);
        assert_eq!(idle.control_flow, ControlFlow::WaitUntil(t0 + SEC));

        let due = schedule(Some(&mut ticker), t0 + SEC);
        assert!(due.redraw);
        assert_eq!(due.control_flow, ControlFlow::WaitUntil(t0 + 2 * SEC));
    }

    #[test]
    fn continuous_always_redraws() {
        let now = Instant::now();
        let mut ticker = None;
        for _ in 0..3 {
            let w = schedule(Some(&mut ticker), now);
            assert!(w.redraw);
            assert_eq!(w.control_flow, ControlFlow::Wait);
        }
    }

    #[test]
    fn closed_window_stops_refreshing() {
        let t0 = Instant::now();
        let w = schedule(None, t0 + 10 * SEC);
        assert!(!w.redraw);
        assert_eq!(w.control_flow, ControlFlow::Wait);
    }

    #[test]
    fn interval_policy_arms_one_second_ticker() {
        let config = RuntimeConfig { redraw: RedrawPolicy::Interval(SEC), ..Default::default() };
        let t0 = Instant::now();
        let ticker = ticker_for(config.redraw, t0);
        assert_eq!(ticker.map(|t| t.deadline()), Some(t0 + SEC));
        assert!(ticker_for(RedrawPolicy::Continuous, t0).is_none());
    }
}
