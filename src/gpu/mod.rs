//! Seams to the graphics device, the image decoder and the shader's uniform
//! interface. The model code only talks to these traits.

mod frame;
mod headless;
mod pixels;
mod wgpu_device;

pub use frame::{FrameCommand, FrameRecorder};
pub use headless::{HeadlessBuffers, HeadlessDevice, HeadlessTexture};
pub use pixels::{FileImageDecoder, ImageDecoder, ImageError, PixelBuffer, PixelFormat};
pub use wgpu_device::{GpuMeshBuffers, GpuTexture, WgpuDevice};

use glam::{Mat4, Vec3, Vec4};

use crate::model::Vertex;

/// Allocates and uploads GPU resources during ingestion.
pub trait GpuDevice {
    type Texture;
    type Buffers;

    /// Uploads pixels with a full mip chain, repeat wrapping and trilinear filtering.
    fn create_texture(&mut self, pixels: &PixelBuffer, label: &str) -> Self::Texture;

    /// Stand-in for an image that could not be decoded.
    fn create_placeholder_texture(&mut self, label: &str) -> Self::Texture;

    fn create_mesh_buffers(&mut self, vertices: &[Vertex], indices: &[u32], label: &str) -> Self::Buffers;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Bool(bool),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

/// Receives shader uniforms by their fully qualified name,
/// e.g. `bulbs[2].base.atten.linear`.
pub trait UniformSink {
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    fn set_int(&mut self, name: &str, value: i32) {
        self.set_uniform(name, UniformValue::Int(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.set_uniform(name, UniformValue::Bool(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.set_uniform(name, UniformValue::Vec3(value));
    }

    fn set_vec4(&mut self, name: &str, value: Vec4) {
        self.set_uniform(name, UniformValue::Vec4(value));
    }

    fn set_mat4(&mut self, name: &str, value: Mat4) {
        self.set_uniform(name, UniformValue::Mat4(value));
    }
}

/// Per-frame draw interface. Resources are borrowed for `'a`, the same way a
/// render pass borrows the buffers it draws from.
pub trait DrawContext<'a, G: GpuDevice>: UniformSink {
    fn bind_texture(&mut self, unit: u32, sampler: &str, texture: &'a G::Texture);

    fn set_blending(&mut self, enabled: bool);

    fn draw_indexed(&mut self, buffers: &'a G::Buffers);
}
