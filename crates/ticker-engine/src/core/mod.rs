//! Engine-facing application contract.
//!
//! Defines the interface between the runtime (platform loop) and the
//! application, plus the per-frame context handed to it.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
