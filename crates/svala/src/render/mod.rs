//! Rendering subsystem — wgpu forward renderer.
//!
//! One render pass per frame: a Blinn-Phong pipeline with a directional
//! light, ambient light, up to eight point lights, and per-object
//! dynamic-offset model uniforms. Built-in unit meshes cover every shape the
//! demos draw; textures fall back to a 1×1 white placeholder when a file is
//! missing or unreadable, so a failed load never stops the loop.

pub mod draw;
pub mod gpu;
pub(crate) mod mesh;
pub(crate) mod pipeline;
pub mod shape;
pub(crate) mod shapes;
pub(crate) mod texture;
pub(crate) mod vertex;

pub use draw::RenderState;
pub use gpu::GpuContext;
pub use shape::{Shape, ShapeKind};

/// The clear color. Set it on the [`App`](crate::app::App) to change the
/// background.
#[derive(Debug, Clone, Copy)]
pub struct ClearColor(pub [f64; 4]);

impl Default for ClearColor {
    fn default() -> Self {
        // A dark night-sky blue.
        Self([0.1, 0.1, 0.15, 1.0])
    }
}
