//! Scrolling line graph: a bounded sample window and its thick-line tessellation.

mod series;
mod tessellate;

pub use series::{SampleBand, SampleSeries};
pub use tessellate::{GraphLayout, MIN_SEGMENT_LENGTH, tessellate};
