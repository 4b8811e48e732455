//! Dial angles.
//!
//! Angles are in degrees, 0° along +x, increasing clockwise (y down). The
//! −90° offset puts twelve o'clock straight up.

use crate::time::WallTime;

const DEG_PER_HOUR: f32 = 30.0;
const TWELVE_O_CLOCK: f32 = -90.0;

/// Angle of hour marker `i` (0 and 12 both point up).
#[inline]
pub fn marker_angle_deg(i: u32) -> f32 {
    (i % 12) as f32 * DEG_PER_HOUR + TWELVE_O_CLOCK
}

/// Angle of the hour hand, advancing continuously with the minutes.
#[inline]
pub fn hand_angle_deg(t: WallTime) -> f32 {
    let hours = t.dial_hour() as f32 + t.minute() as f32 / 60.0;
    hours * DEG_PER_HOUR + TWELVE_O_CLOCK
}
