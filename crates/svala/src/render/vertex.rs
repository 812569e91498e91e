//! Vertex and uniform buffer layouts.
//!
//! Uniforms are split into four bind groups ordered by change frequency:
//! camera (per frame), lights (per frame), material (per shape appearance),
//! and model (per object, via dynamic offsets into one large buffer). The
//! Rust structs here must match the WGSL structs in `shader.wgsl`
//! byte-for-byte; the padding fields exist to satisfy WGSL's 16-byte
//! alignment rules for `vec3`.

use bytemuck::{Pod, Zeroable};

/// Per-vertex data: position, surface normal, and texture UV. 32 bytes.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position: vec3<f32>
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal: vec3<f32>
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv: vec2<f32>
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };
}

/// Camera uniform: view-projection matrix plus world-space position (needed
/// for the specular term). 80 bytes.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub _padding: f32,
}

/// One point light, packed for GPU upload. 32 bytes.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct PointLightData {
    pub position: [f32; 3],
    pub radius: f32,
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Maximum point lights per frame. A fixed array keeps the uniform buffer
/// layout static.
pub(crate) const MAX_POINT_LIGHTS: usize = 8;

/// All lighting data in one buffer: directional + ambient + point lights.
/// 320 bytes.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct LightUniform {
    pub dir_direction: [f32; 3],
    pub dir_intensity: f32,
    pub dir_color: [f32; 3],
    pub _pad0: f32,

    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,

    pub point_lights: [PointLightData; MAX_POINT_LIGHTS],

    pub point_light_count: u32,
    pub _pad1: [u32; 3],
}

/// Material uniform: base color, emissive, and specular exponent. 32 bytes.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct MaterialUniform {
    pub base_color: [f32; 4],
    pub emissive: [f32; 3],
    pub shininess: f32,
}

/// Model uniform: transform + normal matrix, per object. The normal matrix
/// is mathematically 3x3 but stored as mat4x4 to sidestep WGSL's mat3x3
/// column padding. 128 bytes.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 32);
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
        assert_eq!(std::mem::size_of::<PointLightData>(), 32);
        assert_eq!(std::mem::size_of::<LightUniform>(), 320);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 32);
        assert_eq!(std::mem::size_of::<ModelUniform>(), 128);
    }
}
