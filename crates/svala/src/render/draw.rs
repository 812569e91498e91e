//! Per-frame draw orchestration.
//!
//! [`RenderState`] owns every long-lived GPU resource and turns a scene
//! into one render-pass submission per frame:
//!
//! 1. acquire the surface texture;
//! 2. write the camera and light uniforms from the scene;
//! 3. collect a draw call per shape-bearing node (world matrix × unit-mesh
//!    scale), sorted by material to minimize bind-group changes;
//! 4. write all model matrices into the dynamic uniform buffer;
//! 5. record the pass, draw indexed per object, submit, present.
//!
//! Surface errors propagate to the driver, which recovers `Lost`/`Outdated`
//! by reconfiguring — a frame can fail, the loop never stops for it.

use wgpu::util::DeviceExt;

use super::gpu::GpuContext;
use super::mesh::{MeshHandle, MeshStore};
use super::pipeline::MeshRenderer;
use super::texture::{TextureHandle, TextureStore};
use super::vertex::{
    CameraUniform, LightUniform, MaterialUniform, ModelUniform, PointLightData, MAX_POINT_LIGHTS,
};
use super::shape::ShapeKind;
use super::ClearColor;
use crate::scene::{Light, Scene};

/// One draw command, ready for the render pass.
struct DrawCall {
    mesh: MeshHandle,
    material: MaterialUniform,
    texture: TextureHandle,
    model: ModelUniform,
}

/// A run of consecutive draw calls sharing one material bind group.
struct MaterialGroup {
    bind_group: wgpu::BindGroup,
    start: usize,
    end: usize,
}

/// All GPU-side state needed to render scenes.
pub struct RenderState {
    renderer: MeshRenderer,
    meshes: MeshStore,
    textures: TextureStore,
}

impl RenderState {
    pub fn new(gpu: &GpuContext) -> Self {
        Self {
            renderer: MeshRenderer::new(gpu),
            meshes: MeshStore::new(gpu),
            textures: TextureStore::new(gpu),
        }
    }

    /// Recreate size-dependent resources after a surface resize.
    pub fn resize(&mut self, gpu: &GpuContext) {
        let (w, h) = gpu.surface_size();
        self.renderer.resize_depth_if_needed(&gpu.device, w, h);
    }

    /// Render one frame of the scene.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        scene: &Scene,
        clear: ClearColor,
    ) -> Result<(), wgpu::SurfaceError> {
        let output = gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });

        let (sw, sh) = gpu.surface_size();
        self.renderer.resize_depth_if_needed(&gpu.device, sw, sh);

        // ── Per-frame uniforms ──────────────────────────────────────────
        let camera_uniform = collect_camera(scene);
        gpu.queue.write_buffer(
            &self.renderer.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniform]),
        );

        let light_uniform = collect_lights(scene);
        gpu.queue.write_buffer(
            &self.renderer.light_buffer,
            0,
            bytemuck::cast_slice(&[light_uniform]),
        );

        // ── Draw calls ──────────────────────────────────────────────────
        let draw_calls = self.collect_draw_calls(gpu, scene);

        let model_stride = if draw_calls.is_empty() {
            0
        } else {
            let stride = self
                .renderer
                .ensure_model_capacity(&gpu.device, draw_calls.len());
            let mut model_data = vec![0u8; stride as usize * draw_calls.len()];
            for (i, call) in draw_calls.iter().enumerate() {
                let offset = i * stride as usize;
                let bytes = bytemuck::bytes_of(&call.model);
                model_data[offset..offset + bytes.len()].copy_from_slice(bytes);
            }
            gpu.queue
                .write_buffer(&self.renderer.model_buffer, 0, &model_data);
            stride
        };

        let material_groups = self.create_material_groups(gpu, &draw_calls);

        // ── Render pass ─────────────────────────────────────────────────
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.0[0],
                            g: clear.0[1],
                            b: clear.0[2],
                            a: clear.0[3],
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.renderer.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if !draw_calls.is_empty() {
                pass.set_pipeline(&self.renderer.pipeline);
                pass.set_bind_group(0, &self.renderer.camera_bind_group, &[]);
                pass.set_bind_group(1, &self.renderer.light_bind_group, &[]);

                for group in &material_groups {
                    pass.set_bind_group(2, &group.bind_group, &[]);
                    for i in group.start..group.end {
                        let call = &draw_calls[i];
                        let dynamic_offset = i as u32 * model_stride;
                        pass.set_bind_group(3, &self.renderer.model_bind_group, &[dynamic_offset]);

                        let gpu_mesh = self.meshes.get(call.mesh);
                        pass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));
                        pass.set_index_buffer(
                            gpu_mesh.index_buffer.slice(..),
                            wgpu::IndexFormat::Uint32,
                        );
                        pass.draw_indexed(0..gpu_mesh.index_count, 0, 0..1);
                    }
                }
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Collect a draw call per visible shape, sorted by material so
    /// consecutive calls share bind groups.
    fn collect_draw_calls(&mut self, gpu: &GpuContext, scene: &Scene) -> Vec<DrawCall> {
        let mut calls = Vec::new();

        for (_, node) in scene.iter() {
            let Some(shape) = &node.shape else { continue };

            let model = node.world * glam::Mat4::from_scale(shape.mesh_scale());
            let normal_matrix = model.inverse().transpose();

            let mesh = match shape.kind {
                ShapeKind::Sphere { .. } => MeshStore::SPHERE,
                ShapeKind::Cuboid { .. } => MeshStore::CUBE,
                ShapeKind::Cylinder { .. } => MeshStore::CYLINDER,
                ShapeKind::Plane { .. } => MeshStore::PLANE,
                ShapeKind::Torus { radius, tube } => self.meshes.torus(gpu, radius, tube),
            };

            let texture = match &shape.texture {
                Some(path) => self.textures.load(gpu, path),
                None => self.textures.placeholder(),
            };

            calls.push(DrawCall {
                mesh,
                material: MaterialUniform {
                    base_color: shape.base_color,
                    emissive: shape.emissive,
                    shininess: shape.shininess,
                },
                texture,
                model: ModelUniform {
                    model: model.to_cols_array_2d(),
                    normal_matrix: normal_matrix.to_cols_array_2d(),
                },
            });
        }

        calls.sort_by(|a, b| material_sort_key(a).cmp(&material_sort_key(b)));
        calls
    }

    /// Build one material bind group per run of identical materials.
    fn create_material_groups(
        &self,
        gpu: &GpuContext,
        draw_calls: &[DrawCall],
    ) -> Vec<MaterialGroup> {
        let mut groups: Vec<MaterialGroup> = Vec::new();

        for (i, call) in draw_calls.iter().enumerate() {
            let matches_last = groups.last().map_or(false, |last| {
                let prev = &draw_calls[last.start];
                prev.texture == call.texture
                    && bytemuck::bytes_of(&prev.material) == bytemuck::bytes_of(&call.material)
            });

            if matches_last {
                groups.last_mut().unwrap().end = i + 1;
                continue;
            }

            let material_buffer =
                gpu.device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("material buffer"),
                        contents: bytemuck::cast_slice(&[call.material]),
                        usage: wgpu::BufferUsages::UNIFORM,
                    });

            let texture_entry = self.textures.get(call.texture);

            let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("material bind group"),
                layout: &self.renderer.material_bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: material_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&texture_entry.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&self.renderer.sampler),
                    },
                ],
            });

            groups.push(MaterialGroup {
                bind_group,
                start: i,
                end: i + 1,
            });
        }

        groups
    }
}

/// Camera uniform from the scene camera.
fn collect_camera(scene: &Scene) -> CameraUniform {
    CameraUniform {
        view_proj: scene.camera.view_projection().to_cols_array_2d(),
        camera_pos: scene.camera.transform.translation.to_array(),
        _padding: 0.0,
    }
}

/// Light uniform from the scene's lights.
fn collect_lights(scene: &Scene) -> LightUniform {
    let mut uniform = LightUniform {
        dir_direction: [0.0, -1.0, 0.0],
        dir_intensity: 0.0,
        dir_color: [1.0, 1.0, 1.0],
        _pad0: 0.0,
        ambient_color: scene.ambient.color,
        ambient_intensity: scene.ambient.intensity,
        point_lights: [bytemuck::Zeroable::zeroed(); MAX_POINT_LIGHTS],
        point_light_count: 0,
        _pad1: [0; 3],
    };

    let mut point_count = 0usize;
    for light in &scene.lights {
        match *light {
            // First directional light wins; the shader supports one.
            Light::Directional {
                direction,
                color,
                intensity,
            } => {
                if uniform.dir_intensity == 0.0 {
                    uniform.dir_direction = direction.to_array();
                    uniform.dir_color = color;
                    uniform.dir_intensity = intensity;
                }
            }
            Light::Point {
                position,
                color,
                intensity,
                radius,
            } => {
                if point_count < MAX_POINT_LIGHTS {
                    uniform.point_lights[point_count] = PointLightData {
                        position: position.to_array(),
                        radius,
                        color,
                        intensity,
                    };
                    point_count += 1;
                }
            }
        }
    }
    uniform.point_light_count = point_count as u32;

    uniform
}

/// Sort key grouping draw calls that can share a material bind group.
fn material_sort_key(call: &DrawCall) -> (TextureHandle, [u8; 32]) {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(bytemuck::bytes_of(&call.material));
    (call.texture, bytes)
}
