use glam::{Vec3, Vec4};

use super::classify::Classification;
use super::texture::{Texture, TextureCache, TextureKind, TextureSource};
use crate::gpu::{GpuDevice, UniformSink};
use crate::scene::{RawMaterial, TextureSlot};

/// Transparency every glass mesh renders with, whatever its material says.
pub const GLASS_TRANSPARENCY: f32 = 0.5;

/// Scene slot read for each texture kind, in binding order. The `Normals`,
/// `Lightmap` and `Emissive` slots are never bound, so glTF normal maps go unused.
pub const TEXTURE_SLOTS: [(TextureKind, TextureSlot); 4] = [
    (TextureKind::Diffuse, TextureSlot::Diffuse),
    (TextureKind::Specular, TextureSlot::Specular),
    (TextureKind::Normal, TextureSlot::Height),
    (TextureKind::Height, TextureSlot::Ambient),
];

/// Colours carry the transparency in their alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Material {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub shininess: f32,
    pub transparency: f32,
    pub has_texture: bool,
}

impl Material {
    /// Missing properties read as zero.
    pub fn from_raw(raw: &RawMaterial, classification: Classification) -> Self {
        let transparency = if classification.is_glass() {
            GLASS_TRANSPARENCY
        } else {
            raw.transparency.unwrap_or_default()
        };
        let color = |rgb: Option<[f32; 3]>| Vec3::from(rgb.unwrap_or_default()).extend(transparency);

        Self {
            ambient: color(raw.ambient),
            diffuse: color(raw.diffuse),
            specular: color(raw.specular),
            shininess: raw.shininess.unwrap_or_default(),
            transparency,
            has_texture: !raw.textures(TextureSlot::Diffuse).is_empty(),
        }
    }

    pub(crate) fn write<S: UniformSink + ?Sized>(&self, sink: &mut S) {
        sink.set_vec4("material.ambient", self.ambient);
        sink.set_vec4("material.diffuse", self.diffuse);
        sink.set_vec4("material.specular", self.specular);
        sink.set_float("material.shininess", self.shininess);
        sink.set_bool("material.hasTexture", self.has_texture);
    }
}

/// Builds the material of a mesh and loads its textures through the cache,
/// diffuse first, then specular, normal and height.
pub fn resolve_material<G: GpuDevice>(
    raw: &RawMaterial,
    classification: Classification,
    cache: &mut TextureCache<G>,
    source: &TextureSource,
    device: &mut G,
) -> (Material, Vec<Texture<G>>) {
    let material = Material::from_raw(raw, classification);

    let textures = TEXTURE_SLOTS
        .iter()
        .flat_map(|&(kind, slot)| raw.textures(slot).iter().map(move |path| (kind, path)))
        .map(|(kind, path)| cache.resolve(path, kind, source, device))
        .collect();

    (material, textures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::{FileImageDecoder, HeadlessDevice};
    use std::collections::HashMap;

    fn brick() -> RawMaterial {
        let mut raw = RawMaterial {
            name: "brick".to_string(),
            ambient: Some([0.1, 0.1, 0.1]),
            diffuse: Some([0.6, 0.3, 0.2]),
            shininess: Some(32.0),
            transparency: Some(0.9),
            ..Default::default()
        };
        raw.add_texture(TextureSlot::Ambient, "ao.png");
        raw.add_texture(TextureSlot::Height, "bump.png");
        raw.add_texture(TextureSlot::Diffuse, "brick.png");
        raw.add_texture(TextureSlot::Diffuse, "moss.png");
        raw.add_texture(TextureSlot::Normals, "ignored.png");
        raw
    }

    #[test]
    fn test_colours_carry_transparency() {
        let material = Material::from_raw(&brick(), Classification::Ordinary);
        assert_eq!(material.diffuse, Vec4::new(0.6, 0.3, 0.2, 0.9));
        assert_eq!(material.ambient.w, 0.9);
        assert_eq!(material.specular, Vec4::new(0.0, 0.0, 0.0, 0.9));
        assert_eq!(material.shininess, 32.0);
        assert!(material.has_texture);
    }

    #[test]
    fn test_glass_overrides_transparency() {
        let material = Material::from_raw(&brick(), Classification::Glass);
        assert_eq!(material.transparency, GLASS_TRANSPARENCY);
        assert_eq!(material.diffuse.w, GLASS_TRANSPARENCY);
    }

    #[test]
    fn test_empty_material_is_zeroed() {
        let material = Material::from_raw(&RawMaterial::named("bare"), Classification::Ordinary);
        assert_eq!(material, Material::default());
    }

    #[test_log::test]
    fn test_textures_follow_kind_order() {
        let temp = assert_fs::TempDir::new().unwrap();
        let decoder = FileImageDecoder::default();
        let embedded = HashMap::new();
        let source = TextureSource {
            directory: temp.path(),
            embedded: &embedded,
            decoder: &decoder,
        };
        let mut device = HeadlessDevice::new();
        let mut cache = TextureCache::new();

        let (_, textures) = resolve_material(&brick(), Classification::Ordinary, &mut cache, &source, &mut device);

        let loaded: Vec<(TextureKind, &str)> = textures.iter().map(|t| (t.kind, t.path.as_str())).collect();
        assert_eq!(
            loaded,
            vec![
                (TextureKind::Diffuse, "brick.png"),
                (TextureKind::Diffuse, "moss.png"),
                (TextureKind::Normal, "bump.png"),
                (TextureKind::Height, "ao.png"),
            ]
        );
        assert_eq!(device.textures_created(), 4);
    }
}
