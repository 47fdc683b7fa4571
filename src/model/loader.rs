use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use super::bones::{BoneInfo, BoneRegistry};
use super::classify::NamingConvention;
use super::light::Bulb;
use super::mesh::{IngestContext, Mesh};
use super::texture::{Texture, TextureCache, TextureSource};
use crate::gpu::{DrawContext, GpuDevice, ImageDecoder};
use crate::scene::{import_scene, SceneGraph, SceneNode};

/// Counts logged after ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModelSummary {
    pub meshes: usize,
    pub bulbs: usize,
    pub point_bulbs: usize,
    pub bones: usize,
    pub textures: usize,
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} meshes, {} bulbs, {} point bulbs, {} bones, {} textures",
            self.meshes, self.bulbs, self.point_bulbs, self.bones, self.textures
        )
    }
}

/// A scene flattened into draw units, with the lights found along the way.
/// An empty model means the scene could not be loaded.
pub struct Model<G: GpuDevice> {
    meshes: Vec<Mesh<G>>,
    bulbs: Vec<Bulb>,
    point_bulbs: Vec<Bulb>,
    textures: TextureCache<G>,
    bones: BoneRegistry,
    directory: PathBuf,
}

impl<G: GpuDevice> Model<G> {
    pub fn empty() -> Self {
        Self {
            meshes: Vec::new(),
            bulbs: Vec::new(),
            point_bulbs: Vec::new(),
            textures: TextureCache::new(),
            bones: BoneRegistry::new(),
            directory: PathBuf::new(),
        }
    }

    /// Imports the scene at `path` and ingests it. Import failures are logged
    /// and produce an empty model. Texture paths resolve against the file's directory.
    pub fn load<P: AsRef<Path>>(
        path: P,
        device: &mut G,
        decoder: &dyn ImageDecoder,
        convention: &NamingConvention,
    ) -> Self {
        let path = path.as_ref();
        let directory = path.parent().unwrap_or(Path::new(""));

        match import_scene(path) {
            Ok(scene) => Self::from_scene(&scene, directory, device, decoder, convention),
            Err(e) => {
                log::error!("Failed to load model {}: {}", path.display(), e);
                Self::empty()
            }
        }
    }

    pub fn from_scene(
        scene: &SceneGraph,
        directory: &Path,
        device: &mut G,
        decoder: &dyn ImageDecoder,
        convention: &NamingConvention,
    ) -> Self {
        if let Err(e) = scene.validate() {
            log::error!("Refusing to ingest scene '{}': {}", scene.root.name, e);
            return Self::empty();
        }

        let mut model = Self {
            directory: directory.to_path_buf(),
            ..Self::empty()
        };

        let mut ingest = IngestContext {
            device,
            textures: &mut model.textures,
            bones: &mut model.bones,
            source: TextureSource {
                directory,
                embedded: &scene.embedded_textures,
                decoder,
            },
            convention,
        };

        let mut flat = Flattened::default();
        flat.process_node(&scene.root, scene, &mut ingest);

        model.meshes = flat.meshes;
        model.bulbs = flat.bulbs;
        model.point_bulbs = flat.point_bulbs;

        log::info!("Loaded model '{}': {}", scene.root.name, model.summary());
        model
    }

    /// Uploads every light, then draws each unit in flattening order. The
    /// environment map, when given, goes to texture unit 0 as `skybox`.
    pub fn draw<'a, D: DrawContext<'a, G>>(
        &'a self,
        ctx: &mut D,
        lighting: bool,
        environment: Option<&'a G::Texture>,
    ) {
        if let Some(environment) = environment {
            ctx.bind_texture(0, "skybox", environment);
        }

        if lighting {
            ctx.set_int("numBulbs", self.bulbs.len() as i32);
            for (i, bulb) in self.bulbs.iter().enumerate() {
                bulb.write_spot(ctx, i);
            }

            ctx.set_int("numpBulbs", self.point_bulbs.len() as i32);
            for (i, bulb) in self.point_bulbs.iter().enumerate() {
                bulb.write_point(ctx, i);
            }
        }

        for mesh in &self.meshes {
            mesh.draw(ctx, lighting);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn meshes(&self) -> &[Mesh<G>] {
        &self.meshes
    }

    pub fn bulbs(&self) -> &[Bulb] {
        &self.bulbs
    }

    pub fn point_bulbs(&self) -> &[Bulb] {
        &self.point_bulbs
    }

    pub fn textures_loaded(&self) -> &[Texture<G>] {
        self.textures.loaded()
    }

    pub fn bone_info(&self, name: &str) -> Option<&BoneInfo> {
        self.bones.get(name)
    }

    /// Bone name to id and offset, as the animation player consumes it.
    pub fn bone_info_map(&self) -> &HashMap<String, BoneInfo> {
        self.bones.bone_info_map()
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            meshes: self.meshes.len(),
            bulbs: self.bulbs.len(),
            point_bulbs: self.point_bulbs.len(),
            bones: self.bones.len(),
            textures: self.textures.len(),
        }
    }
}

struct Flattened<G: GpuDevice> {
    meshes: Vec<Mesh<G>>,
    bulbs: Vec<Bulb>,
    point_bulbs: Vec<Bulb>,
}

impl<G: GpuDevice> Default for Flattened<G> {
    fn default() -> Self {
        Self {
            meshes: Vec::new(),
            bulbs: Vec::new(),
            point_bulbs: Vec::new(),
        }
    }
}

impl<G: GpuDevice> Flattened<G> {
    /// Pre-order: the node's own meshes in order, then each child.
    fn process_node(&mut self, node: &SceneNode, scene: &SceneGraph, ingest: &mut IngestContext<G>) {
        for &index in &node.meshes {
            let raw = &scene.meshes[index];
            let material = &scene.materials[raw.material_index];

            let (mesh, bulb) = Mesh::build(raw, material, ingest);
            match bulb {
                Some(bulb) if bulb.is_point() => self.point_bulbs.push(bulb),
                Some(bulb) => self.bulbs.push(bulb),
                None => {}
            }
            self.meshes.push(mesh);
        }

        for child in &node.children {
            self.process_node(child, scene, ingest);
        }
    }
}
