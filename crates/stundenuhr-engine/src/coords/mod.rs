//! Coordinate and geometry types shared across renderers and the clock face.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down (so positive angles turn clockwise on screen)
//!
//! Renderers convert to NDC in shaders using a viewport uniform.

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
