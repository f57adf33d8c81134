use bytemuck::Zeroable;

use super::surface_context::SurfaceContext;
use super::utils::{create_sampler, create_ubo, frame_bind_group_layout, material_bind_group_layout, white_texture};
use crate::render::renderer::uniform::{CameraUniform, LightsUniform, MaterialUniform};

pub struct Group {
    pub group: wgpu::BindGroup,
    pub layout: wgpu::BindGroupLayout,
}

pub struct ResourceContext {
    pub camera_ubo: wgpu::Buffer,
    pub lights_ubo: wgpu::Buffer,

    pub white_view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,

    pub frame_bind_group: Group,
    pub material_layout: wgpu::BindGroupLayout,
}

impl ResourceContext {
    pub fn pipeline_layout(&self, device: &wgpu::Device) -> wgpu::PipelineLayout {
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Pipeline Layout"),
            bind_group_layouts: &[
                &self.frame_bind_group.layout,
                &self.material_layout,
            ],
            push_constant_ranges: &[],
        })
    }

    pub fn new(sc: &SurfaceContext) -> Self {
        let device = &sc.device;

        let camera_ubo = create_ubo(device, "Camera UBO", &CameraUniform::zeroed());
        let lights_ubo = create_ubo(device, "Lights UBO", &LightsUniform::zeroed());

        let frame_layout = frame_bind_group_layout(device);
        let frame_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_ubo.as_entire_binding(),
                },
            ],
        });

        ResourceContext {
            camera_ubo,
            lights_ubo,

            white_view: white_texture(device, &sc.queue),
            sampler: create_sampler(device),

            frame_bind_group: Group {
                group: frame_group,
                layout: frame_layout,
            },
            material_layout: material_bind_group_layout(device),
        }
    }

    /// Bind group for one material; `texture` falls back to white.
    pub fn material_group(
        &self,
        device: &wgpu::Device,
        base_color: [f32; 4],
        texture: Option<&wgpu::TextureView>,
    ) -> wgpu::BindGroup {
        let ubo = create_ubo(device, "Material UBO", &MaterialUniform { base_color });
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Bind Group"),
            layout: &self.material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(texture.unwrap_or(&self.white_view)),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }
}
