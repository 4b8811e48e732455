//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands
//! - provide deterministic ordering (z-index + insertion order)
//! - group paint order into same-kind batches so renderers can interleave
//! - keep shape-specific helpers isolated per shape file under `scene::shapes`

mod cmd;
mod key;
mod list;
mod z_index;

pub mod shapes;

pub use cmd::{DrawCmd, ShapeKind};
pub use key::SortKey;
pub use list::{Batch, DrawItem, DrawList};
pub use shapes::circle::{CircleCmd, CircleStyle};
pub use shapes::line::{LineCap, LineCmd};
pub use shapes::text::TextCmd;
pub use z_index::ZIndex;
