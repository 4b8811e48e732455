//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, wires them to the GPU layer and
//! schedules redraws according to a [`RedrawPolicy`](crate::time::RedrawPolicy).

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
