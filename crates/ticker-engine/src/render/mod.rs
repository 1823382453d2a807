//! GPU rendering subsystem.
//!
//! Renderers consume CPU-generated geometry and issue GPU commands via wgpu.
//! Each renderer owns its GPU resources (pipelines, buffers, textures) and
//! creates them lazily on first use.
//!
//! Convention:
//! - positions arrive in NDC and are passed through unchanged
//! - colors are straight alpha; blending is `src * a + dst * (1 - a)`

mod ctx;
pub mod shapes;

pub use ctx::{RenderCtx, RenderTarget};
