use anyhow::{Context, Result};
use wgpu::{CommandEncoder, StoreOp, TextureView};

use crate::meshes;
use crate::render::renderer::camera::Camera;
use crate::render::renderer::mesh::GpuMesh;
use crate::render::renderer::uniform::{CameraUniform, LightsUniform};
use crate::scene::{Primitive, Scene, SceneObject};

use super::{resource_context::ResourceContext, surface_context::SurfaceContext, utils::{create_depth_view, create_msaa_view, upload_texture}};

pub struct GpuState {
    pub surface_context: SurfaceContext,
    pub resource_context: ResourceContext,

    pub pipeline: wgpu::RenderPipeline,
    pub depth_view: wgpu::TextureView,
    pub msaa_view: Option<wgpu::TextureView>,

    pub meshes: Vec<GpuMesh>,
    /// Scene revision the meshes were built from.
    pub synced_revision: Option<u64>,
}

impl GpuState {
    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.surface_context.resize(width, height) {
            return;
        }
        let sc = &self.surface_context;
        self.depth_view = create_depth_view(&sc.device, &sc.config, sc.sample_count);
        self.msaa_view = create_msaa_view(&sc.device, &sc.config, sc.view_format, sc.sample_count);
    }

    /// Re-upload meshes and lights if the scene changed since the last call.
    pub fn sync_scene(&mut self, scene: &Scene) {
        if self.synced_revision == Some(scene.revision()) {
            return;
        }

        let sc = &self.surface_context;
        let rc = &self.resource_context;

        sc.queue.write_buffer(
            &rc.lights_ubo,
            0,
            bytemuck::bytes_of(&LightsUniform::from_lights(&scene.lights)),
        );

        let mut uploaded = Vec::new();
        for object in scene.objects() {
            match object {
                SceneObject::Model(model) => {
                    let textures: Vec<Option<wgpu::TextureView>> = model
                        .images
                        .iter()
                        .enumerate()
                        .map(|(i, img)| {
                            img.as_ref()
                                .map(|img| upload_texture(&sc.device, &sc.queue, &format!("Model Texture {i}"), img))
                        })
                        .collect();

                    for primitive in &model.primitives {
                        let material = model.material(primitive);
                        let texture = material
                            .base_color_texture
                            .and_then(|i| textures.get(i))
                            .and_then(Option::as_ref);
                        let group = rc.material_group(&sc.device, material.base_color, texture);
                        uploaded.push(GpuMesh::new(&sc.device, &primitive.vertices, &primitive.indices, group));
                    }
                }
                SceneObject::Fallback(Primitive::Cube { size, color }) => {
                    let (vertices, indices) = meshes::cube::cube(*size);
                    let [r, g, b] = color.to_linear();
                    let group = rc.material_group(&sc.device, [r, g, b, 1.0], None);
                    uploaded.push(GpuMesh::new(&sc.device, &vertices, &indices, group));
                }
            }
        }

        log::debug!("uploaded {} meshes for scene revision {}", uploaded.len(), scene.revision());
        self.meshes = uploaded;
        self.synced_revision = Some(scene.revision());
    }

    fn render_pass(&self, encoder: &mut CommandEncoder, view: &TextureView, clear: wgpu::Color) {
        // draw into the multisampled target and resolve into the frame
        let (target, resolve_target) = match &self.msaa_view {
            Some(msaa) => (msaa, Some(view)),
            None => (view, None),
        };

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: StoreOp::Store,
                }),
                stencil_ops: None,
            }),

            occlusion_query_set: None,
            timestamp_writes: None,
        });
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.resource_context.frame_bind_group.group, &[]);

        for mesh in &self.meshes {
            mesh.draw(&mut rpass);
        }
    }

    pub fn render(&mut self, camera: &Camera, scene: &Scene) -> Result<()> {
        self.sync_scene(scene);

        let frame = match self.surface_context.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // skip this frame, the next one gets a fresh surface
                self.surface_context.reconfigure();
                return Ok(());
            }
            Err(e) => return Err(e).context("failed to acquire surface texture"),
        };
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.surface_context.view_format),
            ..Default::default()
        });

        self.surface_context.queue.write_buffer(
            &self.resource_context.camera_ubo,
            0,
            bytemuck::bytes_of(&CameraUniform::from_camera(camera)),
        );

        let [r, g, b] = scene.background.to_linear();
        let clear = wgpu::Color { r: r as f64, g: g as f64, b: b as f64, a: 1.0 };

        let mut encoder = self.surface_context.device.create_command_encoder(&Default::default());
        self.render_pass(&mut encoder, &view, clear);

        self.surface_context.queue.submit(Some(encoder.finish()));
        frame.present();

        Ok(())
    }
}
