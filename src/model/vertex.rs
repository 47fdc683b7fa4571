pub const MAX_BONE_INFLUENCE: usize = 4;

/// Bone id stored in a slot that no bone has claimed yet.
pub const NO_BONE: i32 = -1;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
    pub bone_ids: [i32; MAX_BONE_INFLUENCE],
    pub bone_weights: [f32; MAX_BONE_INFLUENCE],
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            normal: [0.0; 3],
            tex_coords: [0.0; 2],
            tangent: [0.0; 3],
            bitangent: [0.0; 3],
            bone_ids: [NO_BONE; MAX_BONE_INFLUENCE],
            bone_weights: [0.0; MAX_BONE_INFLUENCE],
        }
    }
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
        0 => Float32x3,  // position
        1 => Float32x3,  // normal
        2 => Float32x2,  // tex_coords
        3 => Float32x3,  // tangent
        4 => Float32x3,  // bitangent
        5 => Sint32x4,   // bone ids
        6 => Float32x4,  // bone weights
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Writes into the first free slot. Returns false when all slots are taken
    /// and the influence was dropped.
    pub fn add_bone_influence(&mut self, bone_id: i32, weight: f32) -> bool {
        match self.bone_ids.iter().position(|&id| id < 0) {
            Some(slot) => {
                self.bone_ids[slot] = bone_id;
                self.bone_weights[slot] = weight;
                true
            }
            None => false,
        }
    }

    pub fn influence_count(&self) -> usize {
        self.bone_ids.iter().filter(|&&id| id >= 0).count()
    }
}
