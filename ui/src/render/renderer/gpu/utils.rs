use std::num::NonZeroU64;

use anyhow::{Context, Result};
use wgpu::util::DeviceExt;
use web_sys::HtmlCanvasElement;

use crate::assets::model::TextureImage;
use crate::render::renderer::uniform::{CameraUniform, LightsUniform, MaterialUniform};

macro_rules! simple_ubo_layout_entry {
  ($b:expr, $vis:expr, $ty:ty) => {
    wgpu::BindGroupLayoutEntry {
        binding: $b,
        visibility: $vis,
        ty: wgpu::BindingType::Buffer {
            ty:                wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size:  NonZeroU64::new(std::mem::size_of::<$ty>() as u64),
        },
        count: None
    }
  };
}

pub async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
    adapter.request_device(&wgpu::DeviceDescriptor {
        label: None,
        required_features: wgpu::Features::empty(),
        required_limits: if cfg!(target_arch = "wasm32") {
            wgpu::Limits::downlevel_webgl2_defaults()
        } else {
            wgpu::Limits::default()
        }
        .using_resolution(adapter.limits()),
        memory_hints: wgpu::MemoryHints::default(),
        trace: wgpu::Trace::Off,
    }).await.context("Failed to request device")
}

#[cfg(target_arch = "wasm32")]
pub fn create_surface_static(
    instance: &wgpu::Instance,
    canvas: &HtmlCanvasElement,
) -> Result<wgpu::Surface<'static>> {
    let target = wgpu::SurfaceTarget::Canvas(canvas.clone());
    instance
        .create_surface(target)
        .context("webgpu surface init failed")
}

#[cfg(not(target_arch = "wasm32"))]
pub fn create_surface_static(
    _instance: &wgpu::Instance,
    _canvas: &HtmlCanvasElement,
) -> Result<wgpu::Surface<'static>> {
    anyhow::bail!("canvas surfaces are only available on the web")
}

pub async fn request_adapter(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'static>,
) -> Result<wgpu::Adapter> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await
        .context("Failed to request a GPU adapter")?;

    Ok(adapter)
}

pub fn create_ubo<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, value: &T) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label:    Some(label),
        contents: bytemuck::bytes_of(value),
        usage:    wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

/// Group 0: per-frame data shared by every draw.
pub fn frame_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Frame Bind Group Layout"),
        entries: &[
            simple_ubo_layout_entry!(0, wgpu::ShaderStages::VERTEX_FRAGMENT, CameraUniform),
            simple_ubo_layout_entry!(1, wgpu::ShaderStages::FRAGMENT, LightsUniform),
        ],
    })
}

/// Group 1: one per material.
pub fn material_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Material Bind Group Layout"),
        entries: &[
            simple_ubo_layout_entry!(0, wgpu::ShaderStages::FRAGMENT, MaterialUniform),
            wgpu::BindGroupLayoutEntry {
                binding:    1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type:     wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension:  wgpu::TextureViewDimension::D2,
                    multisampled:    false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding:    2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

pub fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Base Color Sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

/// Upload decoded pixels as an sRGB texture.
pub fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    image: &TextureImage,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width),
            rows_per_image: Some(image.height),
        },
        size,
    );

    texture.create_view(&Default::default())
}

/// 1x1 white, bound wherever a material has no texture.
pub fn white_texture(device: &wgpu::Device, queue: &wgpu::Queue) -> wgpu::TextureView {
    let white = TextureImage {
        width: 1,
        height: 1,
        rgba: vec![255; 4],
    };
    upload_texture(device, queue, "White Texture", &white)
}

pub const MSAA_SAMPLES: u32 = 4;

/// Color must support 4x and resolve, depth must support 4x.
pub fn msaa_sample_count(
    color: wgpu::TextureFormatFeatureFlags,
    depth: wgpu::TextureFormatFeatureFlags,
) -> u32 {
    let resolvable = color.contains(wgpu::TextureFormatFeatureFlags::MULTISAMPLE_RESOLVE);
    if resolvable && color.sample_count_supported(MSAA_SAMPLES) && depth.sample_count_supported(MSAA_SAMPLES) {
        MSAA_SAMPLES
    } else {
        1
    }
}

/// Multisampled color target resolved into the surface; `None` without MSAA.
pub fn create_msaa_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    format: wgpu::TextureFormat,
    sample_count: u32,
) -> Option<wgpu::TextureView> {
    if sample_count <= 1 {
        return None;
    }
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("msaa_color_texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
}

pub fn create_depth_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: config.width,
        height: config.height,
        depth_or_array_layers: 1,
    };
    let desc = wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size,
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    };
    let texture = device.create_texture(&desc);
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormatFeatureFlags as Flags;

    #[test]
    fn msaa_needs_x4_and_resolve() {
        let color = Flags::MULTISAMPLE_X4 | Flags::MULTISAMPLE_RESOLVE;
        let depth = Flags::MULTISAMPLE_X4;
        assert_eq!(msaa_sample_count(color, depth), 4);

        assert_eq!(msaa_sample_count(Flags::MULTISAMPLE_X4, depth), 1);
        assert_eq!(msaa_sample_count(Flags::MULTISAMPLE_X2 | Flags::MULTISAMPLE_RESOLVE, depth), 1);
        assert_eq!(msaa_sample_count(color, Flags::empty()), 1);
        assert_eq!(msaa_sample_count(Flags::empty(), Flags::empty()), 1);
    }
}
