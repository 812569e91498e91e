//! Texture storage with placeholder fallback.
//!
//! Entry 0 is always a single white pixel. When a shape has no texture, the
//! placeholder is bound and the shader's sample multiplies to the base
//! color unchanged — no branching. When a texture file is missing or
//! unreadable, loading logs a warning and returns the placeholder handle,
//! so an absent asset shows up as a plain-colored shape rather than a
//! stopped render loop.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use super::gpu::GpuContext;

/// Handle to a loaded texture in the [`TextureStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureHandle(usize);

/// A loaded GPU texture.
pub(crate) struct TextureEntry {
    pub view: wgpu::TextureView,
}

/// Stores all loaded GPU textures, keyed for reuse by path.
pub(crate) struct TextureStore {
    entries: Vec<TextureEntry>,
    path_cache: HashMap<String, TextureHandle>,
}

impl TextureStore {
    /// Create the store with the 1×1 white placeholder at index 0.
    pub fn new(gpu: &GpuContext) -> Self {
        let mut store = Self {
            entries: Vec::new(),
            path_cache: HashMap::new(),
        };
        store.upload_rgba8(gpu, "white 1x1", 1, 1, &[255, 255, 255, 255]);
        store
    }

    /// The placeholder texture handle.
    pub fn placeholder(&self) -> TextureHandle {
        TextureHandle(0)
    }

    pub fn get(&self, handle: TextureHandle) -> &TextureEntry {
        &self.entries[handle.0]
    }

    /// Upload raw RGBA8 data and return its handle.
    pub fn upload_rgba8(
        &mut self,
        gpu: &GpuContext,
        label: &str,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> TextureHandle {
        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let handle = TextureHandle(self.entries.len());
        self.entries.push(TextureEntry { view });
        handle
    }

    /// Load a texture from disk, deduplicating by path. A failed load falls
    /// back to the placeholder handle — the failure is logged, not
    /// propagated, and is cached so the same broken path is not retried
    /// every frame.
    pub fn load(&mut self, gpu: &GpuContext, path: &str) -> TextureHandle {
        if let Some(&handle) = self.path_cache.get(path) {
            return handle;
        }

        let handle = match image::open(path) {
            Ok(img) => {
                let img = img.to_rgba8();
                let (width, height) = img.dimensions();
                self.upload_rgba8(gpu, path, width, height, &img.into_raw())
            }
            Err(e) => {
                log::warn!("Failed to load texture '{path}': {e}. Using placeholder.");
                self.placeholder()
            }
        };

        self.path_cache.insert(path.to_owned(), handle);
        handle
    }
}
