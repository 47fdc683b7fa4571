//! Turns a scene file into GPU-ready draw units: meshes with resolved
//! materials, shared textures, bone weights and the lights their names imply.

pub mod gpu;
pub mod lighting;
pub mod model;
pub mod scene;

pub use gpu::{DrawContext, GpuDevice, UniformSink, UniformValue};
pub use lighting::SunLight;
pub use model::{Mesh, Model, ModelSummary, NamingConvention};
pub use scene::{import_scene, SceneError, SceneGraph};
