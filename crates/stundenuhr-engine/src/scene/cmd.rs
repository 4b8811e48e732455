use crate::scene::shapes::circle::CircleCmd;
use crate::scene::shapes::line::LineCmd;
use crate::scene::shapes::text::TextCmd;

/// Renderer-agnostic draw command stream.
///
/// Extending the scene:
/// - add a new shape module under `scene::shapes::*`
/// - add a new variant here and in [`ShapeKind`]
/// - implement push helpers inside that shape module
/// - add a matching renderer under `render::shapes::*`
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Circle(CircleCmd),
    Line(LineCmd),
    Text(TextCmd),
}

impl DrawCmd {
    #[inline]
    pub fn kind(&self) -> ShapeKind {
        match self {
            DrawCmd::Circle(_) => ShapeKind::Circle,
            DrawCmd::Line(_) => ShapeKind::Line,
            DrawCmd::Text(_) => ShapeKind::Text,
        }
    }
}

/// Discriminant of [`DrawCmd`], used to select a renderer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShapeKind {
    Circle,
    Line,
    Text,
}
