//! Decoded scene files. Everything here is plain owned data addressed by
//! integer index; the model code walks it read-only.

mod gltf;
mod obj;
mod tangents;

pub use self::gltf::import_gltf;
pub use self::obj::import_obj;
pub use self::tangents::compute_tangent_space;

use std::collections::HashMap;
use std::path::Path;

use glam::Mat4;

use crate::gpu::PixelBuffer;

pub const DEFAULT_MATERIAL_NAME: &str = "DefaultMaterial";

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load glTF file: {0}")]
    Gltf(#[from] ::gltf::Error),

    #[error("Failed to load OBJ file: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("Unsupported model format: {0}")]
    UnsupportedFormat(String),

    #[error("Incomplete scene: {0}")]
    Incomplete(String),
}

/// Texture slots as the scene file declares them. Which slot feeds which
/// shader sampler is decided by the material code, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Diffuse,
    Specular,
    Ambient,
    Emissive,
    Height,
    Normals,
    Lightmap,
}

#[derive(Debug, Clone, Default)]
pub struct SceneNode {
    pub name: String,
    pub meshes: Vec<usize>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn mesh_reference_count(&self) -> usize {
        self.meshes.len() + self.children.iter().map(SceneNode::mesh_reference_count).sum::<usize>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexWeight {
    pub vertex_id: u32,
    pub weight: f32,
}

#[derive(Debug, Clone)]
pub struct RawBone {
    pub name: String,
    /// Inverse bind pose.
    pub offset: Mat4,
    pub weights: Vec<VertexWeight>,
}

#[derive(Debug, Clone, Default)]
pub struct RawMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub tex_coords: Option<Vec<[f32; 2]>>,
    pub tangents: Option<Vec<[f32; 3]>>,
    pub bitangents: Option<Vec<[f32; 3]>>,
    pub faces: Vec<Vec<u32>>,
    pub bones: Vec<RawBone>,
    pub material_index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RawMaterial {
    pub name: String,
    pub ambient: Option<[f32; 3]>,
    pub diffuse: Option<[f32; 3]>,
    pub specular: Option<[f32; 3]>,
    pub shininess: Option<f32>,
    pub transparency: Option<f32>,
    pub textures: HashMap<TextureSlot, Vec<String>>,
}

impl RawMaterial {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn textures(&self, slot: TextureSlot) -> &[String] {
        self.textures.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn add_texture(&mut self, slot: TextureSlot, path: impl Into<String>) {
        self.textures.entry(slot).or_default().push(path.into());
    }
}

#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    pub root: SceneNode,
    pub meshes: Vec<RawMesh>,
    pub materials: Vec<RawMaterial>,
    /// Images the importer already decoded, keyed by the path materials use.
    pub embedded_textures: HashMap<String, PixelBuffer>,
}

impl SceneGraph {
    /// Rejects scenes the flattener cannot walk safely.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.meshes.is_empty() {
            return Err(SceneError::Incomplete("scene contains no meshes".to_string()));
        }

        for (index, mesh) in self.meshes.iter().enumerate() {
            if mesh.material_index >= self.materials.len() {
                return Err(SceneError::Incomplete(format!(
                    "mesh {} references missing material {}",
                    index, mesh.material_index
                )));
            }
        }

        check_node(&self.root, self.meshes.len())
    }
}

fn check_node(node: &SceneNode, mesh_count: usize) -> Result<(), SceneError> {
    if let Some(&missing) = node.meshes.iter().find(|&&index| index >= mesh_count) {
        return Err(SceneError::Incomplete(format!(
            "node '{}' references missing mesh {}",
            node.name, missing
        )));
    }
    node.children.iter().try_for_each(|child| check_node(child, mesh_count))
}

/// Parses a scene file, picking the importer from the file extension.
pub fn import_scene(path: &Path) -> Result<SceneGraph, SceneError> {
    let extension = path.extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("");

    let scene = match extension.to_lowercase().as_str() {
        "glb" | "gltf" => import_gltf(path)?,
        "obj" => import_obj(path)?,
        _ => return Err(SceneError::UnsupportedFormat(extension.to_string())),
    };

    scene.validate()?;
    Ok(scene)
}
