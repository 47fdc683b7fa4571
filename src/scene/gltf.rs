use std::path::Path;

use glam::{Mat4, Vec3};

use super::{
    compute_tangent_space, RawBone, RawMaterial, RawMesh, SceneError, SceneGraph, SceneNode, TextureSlot,
    VertexWeight, DEFAULT_MATERIAL_NAME,
};
use crate::gpu::{PixelBuffer, PixelFormat};

/// JOINTS_0 / WEIGHTS_0 of one primitive, kept until the owning node's skin is known.
struct SkinAttributes {
    joints: Vec<[u16; 4]>,
    weights: Vec<[f32; 4]>,
}

/// Loads a glTF or GLB file. Every primitive becomes its own mesh; the default
/// scene's root nodes hang off a synthetic root.
pub fn import_gltf(path: &Path) -> Result<SceneGraph, SceneError> {
    let base = path.parent().unwrap_or(Path::new(""));
    let gltf::Gltf { document, blob } = gltf::Gltf::open(path)?;
    let buffers = gltf::import_buffers(&document, Some(base), blob)?;

    let mut scene = SceneGraph::default();
    scene.root.name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("").to_string();

    // External files are left to the texture cache's decoder.
    for image in document.images().filter(|image| !is_external(image)) {
        match gltf::image::Data::from_source(image.source(), Some(base), &buffers) {
            Ok(data) => match convert_image(&data) {
                Some(pixels) => {
                    scene.embedded_textures.insert(image_key(&image), pixels);
                }
                None => log::warn!("Skipping image {} with unsupported format {:?}", image.index(), data.format),
            },
            Err(e) => log::warn!("Failed to decode embedded image {}: {}", image.index(), e),
        }
    }

    scene.materials = document.materials().map(|material| convert_material(&material)).collect();
    let mut default_material = None;

    // glTF mesh index -> indices of the meshes made from its primitives
    let mut mesh_primitives = Vec::with_capacity(document.meshes().len());
    let mut skin_attributes = Vec::new();

    for mesh in document.meshes() {
        let mut primitives = Vec::new();
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "Skipping non-triangle primitive {} of mesh '{}'",
                    primitive.index(),
                    mesh.name().unwrap_or("")
                );
                continue;
            }

            let material_index = match primitive.material().index() {
                Some(index) => index,
                None => *default_material.get_or_insert_with(|| {
                    scene.materials.push(RawMaterial::named(DEFAULT_MATERIAL_NAME));
                    scene.materials.len() - 1
                }),
            };

            let (raw, skin) = convert_primitive(&mesh, &primitive, &buffers, material_index)?;
            primitives.push(scene.meshes.len());
            scene.meshes.push(raw);
            skin_attributes.push(skin);
        }
        mesh_primitives.push(primitives);
    }

    let mut skinned = Vec::new();
    if let Some(gltf_scene) = document.default_scene().or_else(|| document.scenes().next()) {
        for node in gltf_scene.nodes() {
            scene.root.children.push(convert_node(&node, &mesh_primitives, &mut skinned));
        }
    }

    for (skin, meshes) in skinned {
        for index in meshes {
            let (Some(attributes), true) = (&skin_attributes[index], scene.meshes[index].bones.is_empty()) else {
                continue;
            };
            scene.meshes[index].bones = convert_skin(&skin, &buffers, attributes);
        }
    }

    Ok(scene)
}

fn convert_node<'a>(
    node: &gltf::Node<'a>,
    mesh_primitives: &[Vec<usize>],
    skinned: &mut Vec<(gltf::Skin<'a>, Vec<usize>)>,
) -> SceneNode {
    let meshes = node.mesh()
        .map(|mesh| mesh_primitives[mesh.index()].clone())
        .unwrap_or_default();

    if let Some(skin) = node.skin() {
        if !meshes.is_empty() {
            skinned.push((skin, meshes.clone()));
        }
    }

    SceneNode {
        name: node.name().map(str::to_string).unwrap_or_else(|| format!("node_{}", node.index())),
        meshes,
        children: node.children()
            .map(|child| convert_node(&child, mesh_primitives, skinned))
            .collect(),
    }
}

fn convert_primitive(
    mesh: &gltf::Mesh,
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    material_index: usize,
) -> Result<(RawMesh, Option<SkinAttributes>), SceneError> {
    let name = mesh.name().unwrap_or("").to_string();
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or_else(|| SceneError::Incomplete(format!("mesh '{}' has no position data", name)))?
        .collect();

    let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|iter| iter.collect());

    let tex_coords: Option<Vec<[f32; 2]>> = reader
        .read_tex_coords(0)
        .map(|iter| iter.into_f32().collect());

    let indices: Vec<u32> = reader
        .read_indices()
        .map(|iter| iter.into_u32().collect())
        .unwrap_or_else(|| (0..positions.len() as u32).collect());
    let faces: Vec<Vec<u32>> = indices.chunks_exact(3).map(<[u32]>::to_vec).collect();

    let (tangents, bitangents) = match (&tex_coords, reader.read_tangents()) {
        (Some(_), Some(tangents)) => {
            let tangents: Vec<[f32; 4]> = tangents.collect();
            let bitangents = tangents
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    let normal = normals.as_ref()
                        .and_then(|normals| normals.get(i))
                        .map(|n| Vec3::from(*n))
                        .unwrap_or(Vec3::Z);
                    // w carries the handedness of the bitangent
                    (normal.cross(Vec3::new(t[0], t[1], t[2])) * t[3]).to_array()
                })
                .collect();
            (Some(tangents.iter().map(|t| [t[0], t[1], t[2]]).collect()), Some(bitangents))
        }
        (Some(uvs), None) => {
            let (tangents, bitangents) = compute_tangent_space(&positions, uvs, &faces);
            (Some(tangents), Some(bitangents))
        }
        (None, _) => (None, None),
    };

    let skin = match (reader.read_joints(0), reader.read_weights(0)) {
        (Some(joints), Some(weights)) => Some(SkinAttributes {
            joints: joints.into_u16().collect(),
            weights: weights.into_f32().collect(),
        }),
        _ => None,
    };

    let raw = RawMesh {
        name,
        positions,
        normals,
        tex_coords,
        tangents,
        bitangents,
        faces,
        bones: Vec::new(),
        material_index,
    };

    Ok((raw, skin))
}

/// One bone per joint, carrying every vertex that names the joint with a non-zero weight.
fn convert_skin(skin: &gltf::Skin, buffers: &[gltf::buffer::Data], attributes: &SkinAttributes) -> Vec<RawBone> {
    let reader = skin.reader(|buffer| Some(&buffers[buffer.index()]));
    let inverse_bind: Vec<Mat4> = reader
        .read_inverse_bind_matrices()
        .map(|iter| iter.map(|m| Mat4::from_cols_array_2d(&m)).collect())
        .unwrap_or_default();

    skin.joints()
        .enumerate()
        .map(|(slot, joint)| {
            let weights = attributes.joints
                .iter()
                .zip(&attributes.weights)
                .enumerate()
                .flat_map(|(vertex, (joints, weights))| {
                    (0..4)
                        .filter(move |&lane| joints[lane] as usize == slot && weights[lane] > 0.0)
                        .map(move |lane| VertexWeight {
                            vertex_id: vertex as u32,
                            weight: weights[lane],
                        })
                })
                .collect();

            RawBone {
                name: joint.name().map(str::to_string).unwrap_or_else(|| format!("joint_{}", joint.index())),
                offset: inverse_bind.get(slot).copied().unwrap_or(Mat4::IDENTITY),
                weights,
            }
        })
        .collect()
}

fn convert_material(material: &gltf::Material) -> RawMaterial {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, _] = pbr.base_color_factor();

    let name = match (material.name(), material.index()) {
        (Some(name), _) => name.to_string(),
        (None, Some(index)) => format!("material_{}", index),
        (None, None) => DEFAULT_MATERIAL_NAME.to_string(),
    };

    let mut raw = RawMaterial {
        name,
        diffuse: Some([r, g, b]),
        ..Default::default()
    };

    if let Some(info) = pbr.base_color_texture() {
        raw.add_texture(TextureSlot::Diffuse, image_key(&info.texture().source()));
    }
    if let Some(normal) = material.normal_texture() {
        raw.add_texture(TextureSlot::Normals, image_key(&normal.texture().source()));
    }
    if let Some(occlusion) = material.occlusion_texture() {
        raw.add_texture(TextureSlot::Lightmap, image_key(&occlusion.texture().source()));
    }
    if let Some(emissive) = material.emissive_texture() {
        raw.add_texture(TextureSlot::Emissive, image_key(&emissive.texture().source()));
    }

    raw
}

fn is_external(image: &gltf::Image) -> bool {
    matches!(image.source(), gltf::image::Source::Uri { uri, .. } if !uri.starts_with("data:"))
}

/// External images keep their URI; data URIs and buffer views become `*N`.
fn image_key(image: &gltf::Image) -> String {
    match image.source() {
        gltf::image::Source::Uri { uri, .. } if !uri.starts_with("data:") => uri.to_string(),
        _ => format!("*{}", image.index()),
    }
}

fn convert_image(data: &gltf::image::Data) -> Option<PixelBuffer> {
    let format = match data.format {
        gltf::image::Format::R8 => PixelFormat::Gray,
        gltf::image::Format::R8G8B8 => PixelFormat::Rgb,
        gltf::image::Format::R8G8B8A8 => PixelFormat::Rgba,
        _ => return None,
    };
    PixelBuffer::new(data.width, data.height, format, data.pixels.clone()).ok()
}
