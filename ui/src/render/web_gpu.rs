use anyhow::Result;
use web_sys::HtmlCanvasElement;

use crate::render::renderer::gpu::utils::{DEPTH_FORMAT, create_depth_view, create_msaa_view};
use crate::render::renderer::vertex::Vertex;

use super::renderer::gpu::GpuState;
use super::renderer::gpu::resource_context::ResourceContext;
use super::renderer::gpu::surface_context::SurfaceContext;

static MODEL_SHADER: &str = include_str!("./renderer/shaders/model.wgsl");

pub fn create_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    sample_count: u32,
    pipeline_layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("Model Pipeline"),
        layout: Some(pipeline_layout),
        vertex: wgpu::VertexState {
            compilation_options: Default::default(),
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
        },
        fragment: Some(wgpu::FragmentState {
            compilation_options: Default::default(),
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            // node transforms can mirror geometry, so draw both sides
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less, // passes if new depth < old
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: sample_count,
            ..Default::default()
        },
        multiview: None,
    })
}

pub async fn init_wgpu(canvas: &HtmlCanvasElement) -> Result<GpuState> {
    let sc = SurfaceContext::new_async(canvas).await?;
    let rc = ResourceContext::new(&sc);

    let shader = sc.device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Model Shader"),
        source: wgpu::ShaderSource::Wgsl(MODEL_SHADER.into()),
    });

    let pipeline = create_pipeline(
        &sc.device,
        sc.view_format,
        sc.sample_count,
        &rc.pipeline_layout(&sc.device),
        &shader,
    );
    let depth_view = create_depth_view(&sc.device, &sc.config, sc.sample_count);
    let msaa_view = create_msaa_view(&sc.device, &sc.config, sc.view_format, sc.sample_count);

    Ok(GpuState {
        surface_context: sc,
        resource_context: rc,
        pipeline,
        depth_view,
        msaa_view,

        meshes: Vec::new(),
        synced_revision: None,
    })
}
