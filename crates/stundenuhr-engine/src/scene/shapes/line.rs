use crate::coords::Vec2;
use crate::paint::{Color, Paint};
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// End-cap shape of a line segment.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum LineCap {
    /// Flat end exactly at the endpoint.
    #[default]
    Butt,
    /// Semicircle of radius `width / 2` past each endpoint.
    Round,
}

/// Line segment draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCmd {
    pub start: Vec2,
    pub end: Vec2,
    /// Stroke width in logical pixels.
    pub width: f32,
    pub paint: Paint,
    pub cap: LineCap,
}

impl LineCmd {
    #[inline]
    pub fn new(start: Vec2, end: Vec2, width: f32, paint: Paint, cap: LineCap) -> Self {
        Self { start, end, width, paint, cap }
    }
}

impl DrawList {
    /// Records a line segment draw command.
    #[inline]
    pub fn push_line(
        &mut self,
        z: ZIndex,
        start: Vec2,
        end: Vec2,
        width: f32,
        paint: Paint,
        cap: LineCap,
    ) {
        self.push(z, DrawCmd::Line(LineCmd::new(start, end, width, paint, cap)));
    }

    /// Records a solid line segment.
    #[inline]
    pub fn push_solid_line(
        &mut self,
        z: ZIndex,
        start: Vec2,
        end: Vec2,
        width: f32,
        color: Color,
        cap: LineCap,
    ) {
        self.push_line(z, start, end, width, Paint::Solid(color), cap);
    }
}
