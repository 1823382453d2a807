/// One acquired swapchain frame.
///
/// Short-lived: holding the surface texture blocks acquisition of the next
/// frame. Presentation happens when [`Gpu::submit`](super::Gpu::submit) drops it.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
