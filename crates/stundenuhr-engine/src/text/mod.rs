//! Font loading and measurement.
//!
//! Rasterization lives in `render::shapes::text`; this module only owns
//! parsed fonts and answers layout questions.

mod font_system;

pub use font_system::{FontId, FontLoadError, FontSystem, LineMetrics};
