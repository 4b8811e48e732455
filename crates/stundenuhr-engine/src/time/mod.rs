//! Time subsystem.
//!
//! Provides stable, testable redraw scheduling without coupling to the runtime.
//! Intended usage:
//! - one `RefreshTicker` per window
//! - the runtime asks `poll(now)` whether a redraw is due and sleeps until
//!   `deadline()` otherwise

mod ticker;

pub use ticker::{RedrawPolicy, RefreshTicker};
