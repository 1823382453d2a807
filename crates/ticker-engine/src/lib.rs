//! Ticker engine crate.
//!
//! Owns the platform + GPU runtime pieces and the geometry generators used by
//! the ticker binary:
//! - `text`: pre-baked SDF font metrics and single-line glyph layout
//! - `graph`: bounded sample window and thick-line tessellation
//! - `render`: wgpu renderers consuming that geometry

pub mod coords;
pub mod core;
pub mod device;
pub mod graph;
pub mod logging;
pub mod render;
pub mod text;
pub mod time;
pub mod window;
