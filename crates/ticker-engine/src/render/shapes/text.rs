use anyhow::Result;
use bytemuck::{Pod, Zeroable};

use crate::coords::ColorRgba;
use crate::render::{RenderCtx, RenderTarget};
use crate::text::TextGeometry;

use super::common::{DynamicVertexBuffer, triangle_pipeline};

// ── atlas ─────────────────────────────────────────────────────────────────

/// Decoded SDF atlas pixels (RGBA8, rows top to bottom).
#[derive(Clone)]
pub struct AtlasImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl AtlasImage {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "atlas image has zero size");
        let expected = width as usize * height as usize * 4;
        anyhow::ensure!(
            rgba.len() == expected,
            "atlas image is {} bytes, expected {expected} for {width}x{height} RGBA8",
            rgba.len()
        );
        Ok(Self { width, height, rgba })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl std::fmt::Debug for AtlasImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtlasImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

// ── draw input ────────────────────────────────────────────────────────────

/// One laid-out line and the color to draw it with.
#[derive(Debug, Copy, Clone)]
pub struct TextDraw<'a> {
    pub geometry: &'a TextGeometry,
    pub color: ColorRgba,
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Renderer for multi-channel SDF text.
///
/// The atlas is handed over at construction and uploaded on first render.
/// All lines are batched into one vertex buffer and drawn with a single call.
pub struct SdfTextRenderer {
    // pipeline
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,

    // atlas
    pending_atlas: Option<AtlasImage>,
    atlas_view: Option<wgpu::TextureView>,
    sampler: Option<wgpu::Sampler>,

    // geometry
    vertices: DynamicVertexBuffer,
    scratch: Vec<TextVertex>,
}

impl SdfTextRenderer {
    pub fn new(atlas: AtlasImage) -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            pending_atlas: Some(atlas),
            atlas_view: None,
            sampler: None,
            vertices: DynamicVertexBuffer::new("ticker text vbo"),
            scratch: Vec::new(),
        }
    }

    /// Draws every line in `draws` on top of the current target contents.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draws: &[TextDraw<'_>],
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_atlas(ctx);
        self.ensure_bindings(ctx);

        build_vertices(draws, &mut self.scratch);
        self.vertices.write(ctx, &self.scratch);

        let Some((vbo, count)) = self.vertices.slice() else { return };
        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };

        let mut rpass = target.begin_load_pass("ticker text pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.draw(0..count, 0..1);
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ticker text bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline = triangle_pipeline(
            ctx,
            "ticker text pipeline",
            include_str!("shaders/text.wgsl"),
            TextVertex::layout(),
            &[&bgl],
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
    }

    fn ensure_atlas(&mut self, ctx: &RenderCtx<'_>) {
        let Some(atlas) = self.pending_atlas.take() else { return };

        let size = wgpu::Extent3d {
            width: atlas.width,
            height: atlas.height,
            depth_or_array_layers: 1,
        };

        // Distances are data, not color: no sRGB decode.
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("ticker sdf atlas"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &atlas.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * atlas.width),
                rows_per_image: Some(atlas.height),
            },
            size,
        );

        log::debug!("uploaded sdf atlas {}x{}", atlas.width, atlas.height);

        self.atlas_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("ticker sdf sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
        self.bind_group = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() {
            return;
        }

        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(atlas_view) = self.atlas_view.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };

        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ticker text bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(atlas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        }));
    }
}

/// Interleaves every line's positions, UVs and color into `out`.
fn build_vertices(draws: &[TextDraw<'_>], out: &mut Vec<TextVertex>) {
    out.clear();
    for draw in draws {
        let color = draw.color.to_array();
        out.extend(
            draw.geometry
                .vertices
                .iter()
                .zip(&draw.geometry.uvs)
                .map(|(pos, uv)| TextVertex {
                    pos: pos.to_array(),
                    uv: uv.to_array(),
                    color,
                }),
        );
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Vertex layout (32 bytes):
///
///  offset  0  pos    [f32; 2]   loc 0
///  offset  8  uv     [f32; 2]   loc 1
///  offset 16  color  [f32; 4]   loc 2
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct TextVertex {
    pos: [f32; 2],
    uv: [f32; 2],
    color: [f32; 4],
}

impl TextVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2, // uv
        2 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TextVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    fn quad(x: f32) -> TextGeometry {
        let corners = [
            Vec2::new(x, 1.0),
            Vec2::new(x + 1.0, 1.0),
            Vec2::new(x, 0.0),
            Vec2::new(x, 0.0),
            Vec2::new(x + 1.0, 1.0),
            Vec2::new(x + 1.0, 0.0),
        ];
        TextGeometry { vertices: corners.to_vec(), uvs: corners.to_vec() }
    }

    #[test]
    fn vertex_layout_is_32_bytes() {
        assert_eq!(std::mem::size_of::<TextVertex>(), 32);
    }

    #[test]
    fn build_vertices_interleaves_lines_with_their_colors() {
        let a = quad(0.0);
        let b = quad(2.0);
        let red = ColorRgba::new(1.0, 0.0, 0.0, 0.7);
        let draws = [
            TextDraw { geometry: &a, color: ColorRgba::black() },
            TextDraw { geometry: &b, color: red },
        ];

        let mut out = vec![TextVertex::zeroed()];
        build_vertices(&draws, &mut out);

        assert_eq!(out.len(), 12);
        assert_eq!(out[0].color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(out[6].color, red.to_array());
        assert_eq!(out[7].pos, [3.0, 1.0]);
        assert_eq!(out[7].uv, [3.0, 1.0]);
    }

    #[test]
    fn atlas_image_rejects_wrong_length() {
        assert!(AtlasImage::new(2, 2, vec![0; 15]).is_err());
        assert!(AtlasImage::new(0, 2, Vec::new()).is_err());
        assert!(AtlasImage::new(2, 2, vec![0; 16]).is_ok());
    }
}
