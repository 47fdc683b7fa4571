use std::path::Path;

use super::{
    compute_tangent_space, RawMaterial, RawMesh, SceneError, SceneGraph, SceneNode, TextureSlot,
    DEFAULT_MATERIAL_NAME,
};

/// Loads a Wavefront OBJ file and its MTL library. Faces are triangulated and
/// every object becomes one child node of the root holding one mesh.
pub fn import_obj(path: &Path) -> Result<SceneGraph, SceneError> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )?;

    let mut materials: Vec<RawMaterial> = match materials {
        Ok(materials) => materials.iter().map(convert_material).collect(),
        Err(e) => {
            log::warn!("No material library for {}: {}", path.display(), e);
            Vec::new()
        }
    };

    let mut scene = SceneGraph {
        root: SceneNode {
            name: path.file_stem().and_then(|s| s.to_str()).unwrap_or("").to_string(),
            ..Default::default()
        },
        ..Default::default()
    };

    let mut default_material = None;
    for model in &models {
        let material_index = match model.mesh.material_id {
            Some(id) if id < materials.len() => id,
            _ => *default_material.get_or_insert_with(|| {
                materials.push(RawMaterial::named(DEFAULT_MATERIAL_NAME));
                materials.len() - 1
            }),
        };

        scene.root.children.push(SceneNode {
            name: model.name.clone(),
            meshes: vec![scene.meshes.len()],
            children: Vec::new(),
        });
        scene.meshes.push(convert_mesh(model, material_index));
    }

    scene.materials = materials;
    Ok(scene)
}

fn convert_mesh(model: &tobj::Model, material_index: usize) -> RawMesh {
    let mesh = &model.mesh;

    let positions: Vec<[f32; 3]> = mesh.positions
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    let vertex_count = positions.len();

    let normals = (mesh.normals.len() == vertex_count * 3 && vertex_count > 0).then(|| {
        mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]).collect()
    });

    let tex_coords: Option<Vec<[f32; 2]>> = (mesh.texcoords.len() == vertex_count * 2 && vertex_count > 0).then(|| {
        mesh.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]).collect()
    });

    let faces: Vec<Vec<u32>> = mesh.indices.chunks_exact(3).map(<[u32]>::to_vec).collect();

    let (tangents, bitangents) = match &tex_coords {
        Some(uvs) => {
            let (tangents, bitangents) = compute_tangent_space(&positions, uvs, &faces);
            (Some(tangents), Some(bitangents))
        }
        None => (None, None),
    };

    RawMesh {
        name: model.name.clone(),
        positions,
        normals,
        tex_coords,
        tangents,
        bitangents,
        faces,
        bones: Vec::new(),
        material_index,
    }
}

fn convert_material(mtl: &tobj::Material) -> RawMaterial {
    let mut material = RawMaterial {
        name: mtl.name.clone(),
        ambient: mtl.ambient,
        diffuse: mtl.diffuse,
        specular: mtl.specular,
        shininess: mtl.shininess,
        transparency: transmission_filter(mtl),
        ..Default::default()
    };

    // bump maps land in the height slot, ambient maps in the ambient slot
    let textures = [
        (TextureSlot::Diffuse, &mtl.diffuse_texture),
        (TextureSlot::Specular, &mtl.specular_texture),
        (TextureSlot::Height, &mtl.normal_texture),
        (TextureSlot::Ambient, &mtl.ambient_texture),
    ];
    for (slot, texture) in textures {
        if let Some(path) = texture {
            material.add_texture(slot, path.clone());
        }
    }

    material
}

/// First component of the `Tf` statement.
fn transmission_filter(mtl: &tobj::Material) -> Option<f32> {
    mtl.unknown_param
        .get("Tf")
        .and_then(|value| value.split_whitespace().next())
        .and_then(|first| first.parse().ok())
}
