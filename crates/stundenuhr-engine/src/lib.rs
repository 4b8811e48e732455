//! Stundenuhr engine crate.
//!
//! Owns the platform + GPU runtime pieces the clock face draws through:
//! window loop, surface, draw list, shape renderers and fonts.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;
pub mod text;
