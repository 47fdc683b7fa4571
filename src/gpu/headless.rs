use super::{GpuDevice, PixelBuffer, PixelFormat};
use crate::model::Vertex;

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessTexture {
    pub id: u32,
    pub label: String,
    pub width: u32,
    pub height: u32,
    /// `None` for placeholders, which never received pixel data.
    pub format: Option<PixelFormat>,
    pub mip_levels: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessBuffers {
    pub id: u32,
    pub label: String,
    pub vertex_bytes: usize,
    pub index_count: u32,
}

/// A device that keeps only resource metadata. Used when no adapter is
/// available and for tests.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    textures_created: u32,
    buffers_created: u32,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn textures_created(&self) -> u32 {
        self.textures_created
    }

    pub fn buffers_created(&self) -> u32 {
        self.buffers_created
    }

    fn next_texture_id(&mut self) -> u32 {
        self.textures_created += 1;
        self.textures_created
    }
}

impl GpuDevice for HeadlessDevice {
    type Texture = HeadlessTexture;
    type Buffers = HeadlessBuffers;

    fn create_texture(&mut self, pixels: &PixelBuffer, label: &str) -> HeadlessTexture {
        HeadlessTexture {
            id: self.next_texture_id(),
            label: label.to_string(),
            width: pixels.width,
            height: pixels.height,
            format: Some(pixels.format),
            mip_levels: pixels.mip_level_count(),
        }
    }

    fn create_placeholder_texture(&mut self, label: &str) -> HeadlessTexture {
        HeadlessTexture {
            id: self.next_texture_id(),
            label: label.to_string(),
            width: 1,
            height: 1,
            format: None,
            mip_levels: 1,
        }
    }

    fn create_mesh_buffers(&mut self, vertices: &[Vertex], indices: &[u32], label: &str) -> HeadlessBuffers {
        self.buffers_created += 1;
        HeadlessBuffers {
            id: self.buffers_created,
            label: label.to_string(),
            vertex_bytes: std::mem::size_of_val(vertices),
            index_count: indices.len() as u32,
        }
    }
}
