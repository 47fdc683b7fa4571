//! Naming convention that marks special meshes. Scene authors tag light
//! fixtures, glass and water by giving their material an agreed name.

use std::collections::HashMap;

use glam::Vec3;

use super::light::Attenuation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKind {
    Lightbulb,
    Spotlight,
    LampLight,
    FloorLight,
    WallLight,
    Point,
}

impl LightKind {
    pub fn is_point(self) -> bool {
        matches!(self, LightKind::Point)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Classification {
    #[default]
    Ordinary,
    Light(LightKind),
    Glass,
    Water,
}

impl Classification {
    pub fn is_light(self) -> bool {
        matches!(self, Classification::Light(_))
    }

    pub fn is_glass(self) -> bool {
        self == Classification::Glass
    }

    pub fn is_water(self) -> bool {
        self == Classification::Water
    }
}

/// Everything a light emitter takes from its kind; only the position comes
/// from the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LightPreset {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub direction: Vec3,
    /// Cone half-angle in degrees.
    pub cone_angle: f32,
    pub attenuation: Attenuation,
}

const BULB_AMBIENT: Vec3 = Vec3::new(0.24725, 0.1995, 0.0745);
const BULB_DIFFUSE: Vec3 = Vec3::new(0.75164, 0.60648, 0.22648);
const BULB_SPECULAR: Vec3 = Vec3::new(0.628281, 0.555802, 0.366065);

impl LightPreset {
    const fn gold(direction: Vec3, cone_angle: f32, attenuation: Attenuation) -> Self {
        Self {
            ambient: BULB_AMBIENT,
            diffuse: BULB_DIFFUSE,
            specular: BULB_SPECULAR,
            direction,
            cone_angle,
            attenuation,
        }
    }
}

/// Exact, case-sensitive name lookup plus a preset per light kind.
#[derive(Debug, Clone)]
pub struct NamingConvention {
    names: HashMap<String, Classification>,
    presets: HashMap<LightKind, LightPreset>,
}

impl NamingConvention {
    /// A convention that classifies everything as ordinary.
    pub fn empty() -> Self {
        Self {
            names: HashMap::new(),
            presets: HashMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>, classification: Classification) -> Self {
        self.names.insert(name.into(), classification);
        self
    }

    pub fn with_preset(mut self, kind: LightKind, preset: LightPreset) -> Self {
        self.presets.insert(kind, preset);
        self
    }

    pub fn classify(&self, name: &str) -> Classification {
        self.names.get(name).copied().unwrap_or_default()
    }

    /// Preset for `kind`; kinds without an entry get an all-zero preset.
    pub fn preset(&self, kind: LightKind) -> LightPreset {
        self.presets.get(&kind).copied().unwrap_or_default()
    }
}

impl Default for NamingConvention {
    fn default() -> Self {
        use Classification::*;
        use LightKind::*;

        NamingConvention::empty()
            .with_name("Lightbulb", Light(Lightbulb))
            .with_name("spotlight", Light(Spotlight))
            .with_name("lampLight", Light(LampLight))
            .with_name("floorLight", Light(FloorLight))
            .with_name("wallLight", Light(WallLight))
            .with_name("light", Light(Point))
            .with_name("glass", Glass)
            .with_name("water", Water)
            .with_preset(
                Lightbulb,
                LightPreset::gold(Vec3::new(0.0, -7.0, 0.0), 10.0, Attenuation::new(1.0, 0.5, 0.8)),
            )
            .with_preset(
                Spotlight,
                LightPreset::gold(Vec3::new(10.0, -1.0, -1.0), 10.0, Attenuation::new(1.0, 0.5, 0.8)),
            )
            .with_preset(
                LampLight,
                LightPreset::gold(Vec3::new(0.0, -7.0, 0.0), 4.0, Attenuation::new(1.0, 0.0, 0.08)),
            )
            // floor lights are placed but never lit
            .with_preset(FloorLight, LightPreset::gold(Vec3::ZERO, 0.0, Attenuation::default()))
            .with_preset(
                WallLight,
                LightPreset::gold(Vec3::new(0.0, 1.0, 0.0), 10.0, Attenuation::new(1.0, 0.4, 0.8)),
            )
            .with_preset(Point, LightPreset::gold(Vec3::ZERO, 0.0, Attenuation::new(1.0, 0.01, 0.08)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary() {
        let convention = NamingConvention::default();
        assert_eq!(convention.classify("Lightbulb"), Classification::Light(LightKind::Lightbulb));
        assert_eq!(convention.classify("light"), Classification::Light(LightKind::Point));
        assert_eq!(convention.classify("glass"), Classification::Glass);
        assert_eq!(convention.classify("water"), Classification::Water);
        assert_eq!(convention.classify("wall"), Classification::Ordinary);
    }

    #[test]
    fn test_matching_is_exact() {
        let convention = NamingConvention::default();
        assert_eq!(convention.classify("Glass"), Classification::Ordinary);
        assert_eq!(convention.classify("lightbulb"), Classification::Ordinary);
        assert_eq!(convention.classify("water "), Classification::Ordinary);
    }

    #[test]
    fn test_custom_convention() {
        let preset = LightPreset {
            cone_angle: 30.0,
            ..Default::default()
        };
        let convention = NamingConvention::empty()
            .with_name("neon", Classification::Light(LightKind::Spotlight))
            .with_preset(LightKind::Spotlight, preset);

        assert_eq!(convention.classify("neon"), Classification::Light(LightKind::Spotlight));
        assert_eq!(convention.classify("glass"), Classification::Ordinary);
        assert_eq!(convention.preset(LightKind::Spotlight).cone_angle, 30.0);
        assert_eq!(convention.preset(LightKind::Point), LightPreset::default());
    }
}
