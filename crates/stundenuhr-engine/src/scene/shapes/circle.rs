use crate::coords::Vec2;
use crate::paint::Paint;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// How a circle is painted.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CircleStyle {
    /// Solid disc of `radius`.
    Fill,
    /// Ring of the given width centered on `radius`.
    Stroke(f32),
}

/// Circle draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleCmd {
    pub center: Vec2,
    pub radius: f32,
    pub paint: Paint,
    pub style: CircleStyle,
}

impl CircleCmd {
    #[inline]
    pub fn new(center: Vec2, radius: f32, paint: Paint, style: CircleStyle) -> Self {
        Self { center, radius, paint, style }
    }
}

impl DrawList {
    /// Records a circle draw command.
    #[inline]
    pub fn push_circle(
        &mut self,
        z: ZIndex,
        center: Vec2,
        radius: f32,
        paint: Paint,
        style: CircleStyle,
    ) {
        self.push(z, DrawCmd::Circle(CircleCmd::new(center, radius, paint, style)));
    }
}
