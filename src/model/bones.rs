use std::collections::HashMap;

use glam::Mat4;

use super::vertex::Vertex;
use crate::gpu::UniformSink;
use crate::scene::RawBone;

/// Length of the `finalBonesMatrices` uniform array.
pub const MAX_BONES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneInfo {
    pub id: i32,
    /// Inverse bind pose.
    pub offset: Mat4,
}

/// Names every bone seen while ingesting one model with a dense id, in
/// first-seen order. Ids are never reused.
#[derive(Debug, Default)]
pub struct BoneRegistry {
    bones: HashMap<String, BoneInfo>,
    next_id: i32,
}

impl BoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `name`, assigning the next one (and recording `offset`) on first sight.
    pub fn register(&mut self, name: &str, offset: Mat4) -> i32 {
        if let Some(info) = self.bones.get(name) {
            return info.id;
        }

        let id = self.next_id;
        self.bones.insert(name.to_string(), BoneInfo { id, offset });
        self.next_id += 1;
        id
    }

    /// Registers the bone and writes `(id, weight)` into the vertex's first free
    /// slot. A vertex that already has four influences keeps them.
    pub fn register_influence(
        &mut self,
        name: &str,
        offset: Mat4,
        vertex_id: u32,
        weight: f32,
        vertices: &mut [Vertex],
    ) -> i32 {
        let id = self.register(name, offset);
        match vertices.get_mut(vertex_id as usize) {
            Some(vertex) => {
                vertex.add_bone_influence(id, weight);
            }
            None => log::warn!(
                "Bone '{}' weights vertex {} but the mesh has {} vertices",
                name,
                vertex_id,
                vertices.len()
            ),
        }
        id
    }

    pub fn apply(&mut self, bones: &[RawBone], vertices: &mut [Vertex]) {
        for bone in bones {
            let id = self.register(&bone.name, bone.offset);
            if bone.weights.is_empty() {
                log::trace!("Bone '{}' ({}) has no weights", bone.name, id);
            }
            for weight in &bone.weights {
                self.register_influence(&bone.name, bone.offset, weight.vertex_id, weight.weight, vertices);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&BoneInfo> {
        self.bones.get(name)
    }

    pub fn bone_info_map(&self) -> &HashMap<String, BoneInfo> {
        &self.bones
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}

/// Uploads the animation pose as `finalBonesMatrices[i]`. Matrices past
/// [`MAX_BONES`] are not uploaded.
pub fn set_final_bone_matrices<S: UniformSink + ?Sized>(sink: &mut S, matrices: &[Mat4]) {
    if matrices.len() > MAX_BONES {
        log::warn!("Pose has {} bone matrices, uploading the first {}", matrices.len(), MAX_BONES);
    }
    for (i, matrix) in matrices.iter().take(MAX_BONES).enumerate() {
        sink.set_mat4(&format!("finalBonesMatrices[{}]", i), *matrix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::{FrameRecorder, HeadlessDevice, UniformValue};
    use crate::model::vertex::NO_BONE;
    use crate::scene::VertexWeight;

    fn bone(name: &str, weights: &[(u32, f32)]) -> RawBone {
        RawBone {
            name: name.to_string(),
            offset: Mat4::from_scale(glam::Vec3::splat(2.0)),
            weights: weights
                .iter()
                .map(|&(vertex_id, weight)| VertexWeight { vertex_id, weight })
                .collect(),
        }
    }

    #[test]
    fn test_ids_are_dense_in_first_seen_order() {
        let mut registry = BoneRegistry::new();
        assert_eq!(registry.register("hip", Mat4::IDENTITY), 0);
        assert_eq!(registry.register("knee", Mat4::IDENTITY), 1);
        assert_eq!(registry.register("hip", Mat4::ZERO), 0);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("hip").unwrap().offset, Mat4::IDENTITY);
    }

    #[test]
    fn test_influences_fill_slots_without_holes() {
        let mut registry = BoneRegistry::new();
        let mut vertices = vec![Vertex::default(); 2];
        let bones: Vec<RawBone> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|name| bone(name, &[(0, 0.2)]))
            .collect();

        registry.apply(&bones, &mut vertices);

        assert_eq!(vertices[0].bone_ids, [0, 1, 2, 3]);
        assert_eq!(vertices[0].bone_weights, [0.2; 4]);
        assert_eq!(vertices[1].bone_ids, [NO_BONE; 4]);
        assert_eq!(registry.len(), 5, "overflowing bone is still registered");
    }

    #[test_log::test]
    fn test_out_of_range_vertex_is_skipped() {
        let mut registry = BoneRegistry::new();
        let mut vertices = vec![Vertex::default()];
        registry.apply(&[bone("hip", &[(0, 1.0), (9, 1.0)])], &mut vertices);
        assert_eq!(vertices[0].bone_ids[0], 0);
        assert_eq!(vertices[0].influence_count(), 1);
    }

    #[test]
    fn test_final_bone_matrices_are_capped() {
        let mut frame = FrameRecorder::<HeadlessDevice>::new();
        let pose = vec![Mat4::IDENTITY; MAX_BONES + 5];
        set_final_bone_matrices(&mut frame, &pose);

        assert_eq!(
            frame.uniform("finalBonesMatrices[99]"),
            Some(UniformValue::Mat4(Mat4::IDENTITY))
        );
        assert_eq!(frame.uniform("finalBonesMatrices[100]"), None);
        assert_eq!(frame.uniforms().len(), MAX_BONES);
    }
}
