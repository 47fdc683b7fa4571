use std::collections::HashMap;

use glam::Vec3;

use super::bones::BoneRegistry;
use super::classify::{Classification, NamingConvention};
use super::light::Bulb;
use super::material::{resolve_material, Material};
use super::texture::{Texture, TextureCache, TextureKind, TextureSource};
use super::vertex::Vertex;
use crate::gpu::{DrawContext, GpuDevice};
use crate::scene::{RawMaterial, RawMesh};

/// Shared state threaded through one model's ingestion.
pub(crate) struct IngestContext<'s, G: GpuDevice> {
    pub device: &'s mut G,
    pub textures: &'s mut TextureCache<G>,
    pub bones: &'s mut BoneRegistry,
    pub source: TextureSource<'s>,
    pub convention: &'s NamingConvention,
}

/// One draw unit: its own buffers, material and textures.
pub struct Mesh<G: GpuDevice> {
    /// Name of the source material, which is also the classification key.
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub textures: Vec<Texture<G>>,
    pub material: Material,
    pub classification: Classification,
    pub buffers: G::Buffers,
}

impl<G: GpuDevice> Mesh<G> {
    /// Converts a scene mesh into a draw unit, plus the light it emits when
    /// its material names a light fixture.
    pub(crate) fn build(raw: &RawMesh, raw_material: &RawMaterial, ingest: &mut IngestContext<G>) -> (Self, Option<Bulb>) {
        let mut vertices = build_vertices(raw);

        let indices: Vec<u32> = raw.faces.iter().flatten().copied().collect();

        let name = raw_material.name.clone();
        let classification = ingest.convention.classify(&name);

        let (material, textures) = resolve_material(
            raw_material,
            classification,
            ingest.textures,
            &ingest.source,
            ingest.device,
        );

        let bulb = match classification {
            Classification::Light(kind) => {
                let position = vertices.first().map(|v| Vec3::from(v.position)).unwrap_or(Vec3::ZERO);
                Some(Bulb::from_preset(kind, &ingest.convention.preset(kind), position))
            }
            _ => None,
        };

        ingest.bones.apply(&raw.bones, &mut vertices);

        let buffers = ingest.device.create_mesh_buffers(&vertices, &indices, &name);

        let mesh = Self {
            name,
            vertices,
            indices,
            textures,
            material,
            classification,
            buffers,
        };
        (mesh, bulb)
    }

    pub fn is_bulb(&self) -> bool {
        self.classification.is_light()
    }

    pub fn is_glass(&self) -> bool {
        self.classification.is_glass()
    }

    pub fn is_water(&self) -> bool {
        self.classification.is_water()
    }

    pub fn num_elements(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Binds textures from unit 1 upwards as `texture_<kind>N`, counting N
    /// per kind from 1. Glass blends while lighting is on, and only for its own draw.
    pub fn draw<'a, D: DrawContext<'a, G>>(&'a self, ctx: &mut D, lighting: bool) {
        let blend = lighting && self.is_glass();
        if blend {
            ctx.set_blending(true);
        }

        if lighting {
            self.material.write(ctx);
        }

        let mut counters: HashMap<TextureKind, u32> = HashMap::new();
        for (unit, texture) in (1u32..).zip(&self.textures) {
            let number = counters.entry(texture.kind).or_insert(0);
            *number += 1;
            let sampler = format!("{}{}", texture.kind.sampler_prefix(), number);
            ctx.bind_texture(unit, &sampler, &*texture.handle);
        }

        if lighting {
            ctx.set_bool("isBulb", self.is_bulb());
            ctx.set_bool("isGlass", self.is_glass());
            ctx.set_bool("isWater", self.is_water());
        }

        ctx.draw_indexed(&self.buffers);

        if blend {
            ctx.set_blending(false);
        }
    }
}

/// Positions and normals always; UVs and tangent frames only when the mesh
/// has texture coordinates. Bone slots start empty.
fn build_vertices(raw: &RawMesh) -> Vec<Vertex> {
    let attribute = |values: &Option<Vec<[f32; 3]>>, i: usize| {
        values.as_ref().and_then(|values| values.get(i)).copied()
    };

    raw.positions
        .iter()
        .enumerate()
        .map(|(i, position)| {
            let mut vertex = Vertex {
                position: *position,
                ..Default::default()
            };
            if let Some(normal) = attribute(&raw.normals, i) {
                vertex.normal = normal;
            }
            if let Some(uv) = raw.tex_coords.as_ref().and_then(|uvs| uvs.get(i)) {
                vertex.tex_coords = *uv;
                vertex.tangent = attribute(&raw.tangents, i).unwrap_or_default();
                vertex.bitangent = attribute(&raw.bitangents, i).unwrap_or_default();
            }
            vertex
        })
        .collect()
}
