use bytemuck::{Pod, Zeroable};

use crate::coords::{ColorRgba, Vec2};
use crate::render::{RenderCtx, RenderTarget};

use super::common::{DynamicVertexBuffer, triangle_pipeline};

/// Renderer for pre-tessellated line meshes (see `graph::tessellate`).
///
/// The mesh is already a triangle list in NDC; this only uploads it with a
/// solid color and issues one draw.
pub struct LineRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    vertices: DynamicVertexBuffer,
    scratch: Vec<LineVertex>,
}

impl Default for LineRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            vertices: DynamicVertexBuffer::new("ticker line vbo"),
            scratch: Vec::new(),
        }
    }
}

impl LineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `mesh` with `color` on top of the current target contents.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        mesh: &[Vec2],
        color: ColorRgba,
    ) {
        self.ensure_pipeline(ctx);

        let color = color.to_array();
        self.scratch.clear();
        self.scratch
            .extend(mesh.iter().map(|p| LineVertex { pos: p.to_array(), color }));
        self.vertices.write(ctx, &self.scratch);

        let Some((vbo, count)) = self.vertices.slice() else { return };
        let Some(pipeline) = self.pipeline.as_ref() else { return };

        let mut rpass = target.begin_load_pass("ticker line pass");
        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.draw(0..count, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        self.pipeline = Some(triangle_pipeline(
            ctx,
            "ticker line pipeline",
            include_str!("shaders/line.wgsl"),
            LineVertex::layout(),
            &[],
        ));
        self.pipeline_format = Some(ctx.surface_format);
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Vertex layout (24 bytes):
///
///  offset  0  pos    [f32; 2]   loc 0
///  offset  8  color  [f32; 4]   loc 1
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LineVertex {
    pos: [f32; 2],
    color: [f32; 4],
}

impl LineVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
