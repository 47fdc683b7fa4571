use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::gpu::{GpuDevice, ImageDecoder, PixelBuffer};

/// Semantic role of a texture, which decides the shader sampler it binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
    Normal,
    Height,
}

impl TextureKind {
    /// Sampler name without the per-kind counter, e.g. `texture_diffuse` for `texture_diffuse1`.
    pub fn sampler_prefix(self) -> &'static str {
        match self {
            TextureKind::Diffuse => "texture_diffuse",
            TextureKind::Specular => "texture_specular",
            TextureKind::Normal => "texture_normal",
            TextureKind::Height => "texture_height",
        }
    }
}

pub struct Texture<G: GpuDevice> {
    pub handle: Arc<G::Texture>,
    pub kind: TextureKind,
    pub path: String,
}

impl<G: GpuDevice> Clone for Texture<G> {
    fn clone(&self) -> Self {
        Self {
            handle: Arc::clone(&self.handle),
            kind: self.kind,
            path: self.path.clone(),
        }
    }
}

impl<G: GpuDevice> Texture<G> {
    pub fn shares_handle(&self, other: &Texture<G>) -> bool {
        Arc::ptr_eq(&self.handle, &other.handle)
    }
}

/// Where texture paths are looked up: images the importer already decoded
/// first, then files relative to the model's directory.
pub struct TextureSource<'s> {
    pub directory: &'s Path,
    pub embedded: &'s HashMap<String, PixelBuffer>,
    pub decoder: &'s dyn ImageDecoder,
}

/// Every texture one model has uploaded, in load order. At most one GPU
/// texture exists per distinct path.
pub struct TextureCache<G: GpuDevice> {
    loaded: Vec<Texture<G>>,
}

impl<G: GpuDevice> Default for TextureCache<G> {
    fn default() -> Self {
        Self { loaded: Vec::new() }
    }
}

impl<G: GpuDevice> TextureCache<G> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the texture for `path`, uploading it on first use. A path that
    /// fails to decode gets a placeholder, which is cached like any other texture.
    pub fn resolve(&mut self, path: &str, kind: TextureKind, source: &TextureSource, device: &mut G) -> Texture<G> {
        if let Some(loaded) = self.loaded.iter().find(|texture| texture.path == path) {
            return Texture {
                handle: Arc::clone(&loaded.handle),
                kind,
                path: loaded.path.clone(),
            };
        }

        let handle = match source.embedded.get(path) {
            Some(pixels) => device.create_texture(pixels, path),
            None => match source.decoder.decode(&source.directory.join(path)) {
                Ok(pixels) => device.create_texture(&pixels, path),
                Err(e) => {
                    log::warn!("Texture failed to load at path: {} ({})", path, e);
                    device.create_placeholder_texture(path)
                }
            },
        };

        let texture = Texture {
            handle: Arc::new(handle),
            kind,
            path: path.to_string(),
        };
        self.loaded.push(texture.clone());
        texture
    }

    pub fn loaded(&self) -> &[Texture<G>] {
        &self.loaded
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}
