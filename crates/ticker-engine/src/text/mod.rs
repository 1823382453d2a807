//! Signed-distance-field text: pre-baked font metrics and CPU glyph layout.
//!
//! The atlas image and its metrics table are produced offline (msdf-bmfont
//! style). At runtime we only look glyphs up and emit quads; rasterization is
//! left to the fragment shader in `render::shapes::text`.

mod font_metrics;
mod layout;

pub use font_metrics::{FontError, FontMetrics, Glyph};
pub use layout::{TextAlign, TextGeometry, TextLayoutParams, TextStyle, layout_text, measure_text};
