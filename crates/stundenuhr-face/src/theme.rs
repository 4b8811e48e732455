//! Golden-sun color theme.

use stundenuhr_engine::coords::Vec2;
use stundenuhr_engine::paint::Color;

/// Soft drop shadow behind text.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextShadow {
    pub color: Color,
    /// Displacement in logical pixels.
    pub offset: Vec2,
    /// Blur radius in logical pixels; `0` draws a hard copy.
    pub blur: f32,
}

/// Colors of the face. Hex values are straight sRGB `0xAARRGGBB`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub dial_center: Color,
    pub dial_edge: Color,
    pub rim_start: Color,
    pub rim_end: Color,
    pub tick: Color,
    pub numeral: Color,
    pub numeral_shadow: TextShadow,
    pub hand_start: Color,
    pub hand_end: Color,
    pub pivot_center: Color,
    pub pivot_edge: Color,
}

impl Theme {
    pub fn golden_sun() -> Self {
        Self {
            background: Color::from_argb_hex(0xFFFF_FBFE),
            dial_center: Color::from_argb_hex(0xFFFF_F8E1),
            dial_edge: Color::from_argb_hex(0xFFFF_ECB3),
            rim_start: Color::from_argb_hex(0xFFBC_AAA4),
            rim_end: Color::from_argb_hex(0xFF8D_6E63),
            tick: Color::from_argb_hex(0xFF5D_4037),
            numeral: Color::from_argb_hex(0xFF3E_2723),
            numeral_shadow: TextShadow {
                color: Color::from_argb_hex(0xFF44_4444),
                offset: Vec2::new(3.0, 3.0),
                blur: 5.0,
            },
            hand_start: Color::from_argb_hex(0xFF3E_2723),
            hand_end: Color::from_argb_hex(0xFF5D_4037),
            pivot_center: Color::WHITE,
            pivot_edge: Color::from_argb_hex(0xFFFF_E082),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::golden_sun()
    }
}
