use anyhow::{Context, Result};
use web_sys::HtmlCanvasElement;

use super::utils::{DEPTH_FORMAT, create_surface_static, msaa_sample_count, request_adapter, request_device};

pub struct SurfaceContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    /// sRGB view of the surface format; what the pipeline renders into.
    pub view_format: wgpu::TextureFormat,
    /// 4 when both the view and depth formats can be multisampled, else 1.
    pub sample_count: u32,
}

impl SurfaceContext {
    pub async fn new_async(canvas: &HtmlCanvasElement) -> Result<Self> {
        let instance = wgpu::Instance::default();
        let surface = create_surface_static(&instance, canvas)?;

        let adapter = request_adapter(&instance, &surface).await?;
        let (device, queue) = request_device(&adapter).await?;
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = *surface_caps
            .formats
            .first()
            .context("surface reports no supported formats")?;

        // canvases are usually non-sRGB; render through an sRGB view instead
        let view_format = surface_format.add_srgb_suffix();
        let sample_count = msaa_sample_count(
            adapter.get_texture_format_features(view_format).flags,
            adapter.get_texture_format_features(DEPTH_FORMAT).flags,
        );

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: canvas.width().max(1),
            height: canvas.height().max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: wgpu::CompositeAlphaMode::Opaque,
            view_formats: if view_format == surface_format { vec![] } else { vec![view_format] },
        };
        surface.configure(&device, &config);

        log::info!(
            "surface {}x{} {:?} via {:?}, {}x msaa",
            config.width,
            config.height,
            surface_format,
            adapter.get_info().backend,
            sample_count
        );

        Ok(SurfaceContext {
            surface,
            device,
            queue,
            config,
            view_format,
            sample_count,
        })
    }

    /// Returns false when the size is unchanged or zero.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        if width == self.config.width && height == self.config.height {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
        true
    }

    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }
}
