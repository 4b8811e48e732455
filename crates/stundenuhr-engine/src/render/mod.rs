//! GPU rendering subsystem.
//!
//! Renderers consume `scene` draw streams and issue GPU commands via wgpu.
//! Each shape renderer owns its GPU resources (pipelines, buffers) and works
//! in two steps: `prepare` uploads every instance of its kind for the frame,
//! `draw` replays a sub-range inside a shared render pass. [`SceneRenderer`]
//! interleaves the kinds so paint order holds across them.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a viewport uniform.

mod ctx;
mod scene;
pub mod shapes;

pub use ctx::{RenderCtx, RenderTarget};
pub use scene::SceneRenderer;
