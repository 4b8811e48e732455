//! Stundenuhr: a golden-sun analog clock showing Berlin time.

mod app;
mod fonts;

use anyhow::Result;

use stundenuhr_engine::device::GpuInit;
use stundenuhr_engine::logging::{init_logging, LoggingConfig};
use stundenuhr_engine::text::FontSystem;
use stundenuhr_engine::window::Runtime;
use stundenuhr_face::SystemClock;

use crate::app::{ClockApp, ClockConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = ClockConfig::default();
    let mut fonts = FontSystem::new();
    let font = fonts::load_numeral_font(&mut fonts);

    log::info!("starting {} ({:?} refresh)", config.title, config.refresh);
    let app = ClockApp::new(SystemClock::new(), fonts, font);
    Runtime::run(config.runtime_config(), GpuInit::default(), app)
}
