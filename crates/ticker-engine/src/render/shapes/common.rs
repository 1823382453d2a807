//! Shared GPU plumbing used by the geometry renderers.

use bytemuck::Pod;

use crate::render::RenderCtx;

// ── blend ─────────────────────────────────────────────────────────────────

/// Straight-alpha "over" blending.
pub(super) fn straight_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── pipeline ──────────────────────────────────────────────────────────────

/// Builds a triangle-list pipeline with `vs_main` / `fs_main` entry points,
/// no culling and no depth.
pub(super) fn triangle_pipeline(
    ctx: &RenderCtx<'_>,
    label: &'static str,
    shader_source: &'static str,
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
) -> wgpu::RenderPipeline {
    let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(shader_source.into()),
    });

    let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        immediate_size: 0,
    });

    ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[vertex_layout],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: Some(straight_alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Glyph quads and line quads use different windings.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

// ── dynamic vertex buffer ─────────────────────────────────────────────────

/// Vertex buffer that grows to the next power of two and is rewritten each
/// time its contents change.
pub(super) struct DynamicVertexBuffer {
    label: &'static str,
    buffer: Option<wgpu::Buffer>,
    capacity_bytes: u64,
    len: u32,
}

impl DynamicVertexBuffer {
    pub(super) const fn new(label: &'static str) -> Self {
        Self {
            label,
            buffer: None,
            capacity_bytes: 0,
            len: 0,
        }
    }

    /// Uploads `vertices`, reallocating when they do not fit.
    pub(super) fn write<T: Pod>(&mut self, ctx: &RenderCtx<'_>, vertices: &[T]) {
        self.len = vertices.len() as u32;
        if vertices.is_empty() {
            return;
        }

        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        let required = bytes.len() as u64;

        if self.buffer.is_none() || required > self.capacity_bytes {
            let capacity = required.next_power_of_two().max(1024);
            log::debug!("{}: growing to {capacity} bytes", self.label);
            self.buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: capacity,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity_bytes = capacity;
        }

        if let Some(buffer) = self.buffer.as_ref() {
            ctx.queue.write_buffer(buffer, 0, bytes);
        }
    }

    /// Buffer and vertex count of the last write, if it held any vertices.
    pub(super) fn slice(&self) -> Option<(&wgpu::Buffer, u32)> {
        match self.buffer.as_ref() {
            Some(buffer) if self.len > 0 => Some((buffer, self.len)),
            _ => None,
        }
    }
}
