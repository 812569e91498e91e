//! GPU mesh storage.
//!
//! Uploaded meshes are referenced by [`MeshHandle`] — a cheap, copyable
//! index — never by raw GPU buffers. The store pre-uploads the unit
//! primitives (cube, plane, sphere, cylinder); torus meshes depend on the
//! ring/tube ratio, so they are generated on demand and cached per
//! dimension pair.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use super::gpu::GpuContext;
use super::shapes;
use super::vertex::MeshVertex;

/// Handle to a mesh in the [`MeshStore`]. Lightweight and `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(usize);

/// A mesh uploaded to GPU buffers.
pub(crate) struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

/// Stores all uploaded meshes, pre-populated with the unit primitives.
pub(crate) struct MeshStore {
    meshes: Vec<GpuMesh>,
    /// (radius bits, tube bits) → handle for generated torus meshes.
    torus_cache: HashMap<(u32, u32), MeshHandle>,
}

impl MeshStore {
    /// Built-in handles: cube(0), plane(1), sphere(2), cylinder(3).
    pub const CUBE: MeshHandle = MeshHandle(0);
    pub const PLANE: MeshHandle = MeshHandle(1);
    pub const SPHERE: MeshHandle = MeshHandle(2);
    pub const CYLINDER: MeshHandle = MeshHandle(3);

    pub fn new(gpu: &GpuContext) -> Self {
        let mut store = Self {
            meshes: Vec::new(),
            torus_cache: HashMap::new(),
        };

        let (v, i) = shapes::cube();
        store.upload(gpu, &v, &i);
        let (v, i) = shapes::plane();
        store.upload(gpu, &v, &i);
        let (v, i) = shapes::sphere(32, 16);
        store.upload(gpu, &v, &i);
        let (v, i) = shapes::cylinder(0.5, 0.5, 32);
        store.upload(gpu, &v, &i);

        store
    }

    /// Upload mesh data and return its handle.
    pub fn upload(
        &mut self,
        gpu: &GpuContext,
        vertices: &[MeshVertex],
        indices: &[u32],
    ) -> MeshHandle {
        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh vertex buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh index buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        let handle = MeshHandle(self.meshes.len());
        self.meshes.push(GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        });
        handle
    }

    /// Handle for a torus with the given dimensions, generating and
    /// uploading it on first request.
    pub fn torus(&mut self, gpu: &GpuContext, radius: f32, tube: f32) -> MeshHandle {
        let key = (radius.to_bits(), tube.to_bits());
        if let Some(&handle) = self.torus_cache.get(&key) {
            return handle;
        }
        let (v, i) = shapes::torus(radius, tube, 48, 24);
        let handle = self.upload(gpu, &v, &i);
        self.torus_cache.insert(key, handle);
        handle
    }

    /// The GPU mesh for a handle.
    pub fn get(&self, handle: MeshHandle) -> &GpuMesh {
        &self.meshes[handle.0]
    }
}
