mod bones;
mod classify;
mod light;
mod loader;
mod material;
mod mesh;
mod texture;
mod vertex;

pub use bones::{set_final_bone_matrices, BoneInfo, BoneRegistry, MAX_BONES};
pub use classify::{Classification, LightKind, LightPreset, NamingConvention};
pub use light::{Attenuation, Bulb};
pub use loader::{Model, ModelSummary};
pub use material::{resolve_material, Material, GLASS_TRANSPARENCY, TEXTURE_SLOTS};
pub use mesh::Mesh;
pub use texture::{Texture, TextureCache, TextureKind, TextureSource};
pub use vertex::{Vertex, MAX_BONE_INFLUENCE, NO_BONE};
