//! Coordinate and geometry types shared across the geometry generators and renderers.
//!
//! Canonical space is normalized device coordinates:
//! - range [-1, 1] on both axes
//! - origin at the viewport center
//! - +X right, +Y up
//!
//! Renderers pass positions through to the rasterizer unchanged. Aspect-ratio
//! compensation happens on the CPU while geometry is generated.

mod color;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use vec2::Vec2;
pub use viewport::Viewport;
