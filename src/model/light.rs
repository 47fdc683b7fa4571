use glam::Vec3;

use super::classify::{LightKind, LightPreset};
use crate::gpu::UniformSink;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub exp: f32,
}

impl Attenuation {
    pub const fn new(constant: f32, linear: f32, exp: f32) -> Self {
        Self { constant, linear, exp }
    }
}

/// A light emitter discovered in the model. Spot-like bulbs use every field;
/// point bulbs ignore `direction` and `cone_angle`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bulb {
    pub kind: LightKind,
    pub position: Vec3,
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    /// Half-angle of the cone in degrees.
    pub cone_angle: f32,
    pub attenuation: Attenuation,
}

impl Bulb {
    pub fn from_preset(kind: LightKind, preset: &LightPreset, position: Vec3) -> Self {
        Self {
            kind,
            position,
            direction: preset.direction,
            ambient: preset.ambient,
            diffuse: preset.diffuse,
            specular: preset.specular,
            cone_angle: preset.cone_angle,
            attenuation: preset.attenuation,
        }
    }

    pub fn is_point(&self) -> bool {
        self.kind.is_point()
    }

    /// Cosine of the cone half-angle, as the shader compares against it.
    pub fn cutoff(&self) -> f32 {
        self.cone_angle.to_radians().cos()
    }

    pub(crate) fn write_spot<S: UniformSink + ?Sized>(&self, sink: &mut S, index: usize) {
        let prefix = format!("bulbs[{}]", index);
        sink.set_vec3(&format!("{}.base.position", prefix), self.position);
        sink.set_vec3(&format!("{}.base.base.ambient", prefix), self.ambient);
        sink.set_vec3(&format!("{}.base.base.diffuse", prefix), self.diffuse);
        sink.set_vec3(&format!("{}.base.base.specular", prefix), self.specular);
        sink.set_float(&format!("{}.base.atten.constant", prefix), self.attenuation.constant);
        sink.set_float(&format!("{}.base.atten.linear", prefix), self.attenuation.linear);
        sink.set_float(&format!("{}.base.atten.exp", prefix), self.attenuation.exp);
        sink.set_float(&format!("{}.cutoff", prefix), self.cutoff());
        sink.set_vec3(&format!("{}.direction", prefix), self.direction);
    }

    pub(crate) fn write_point<S: UniformSink + ?Sized>(&self, sink: &mut S, index: usize) {
        let prefix = format!("pointBulbs[{}]", index);
        sink.set_vec3(&format!("{}.position", prefix), self.position);
        sink.set_vec3(&format!("{}.base.ambient", prefix), self.ambient);
        sink.set_vec3(&format!("{}.base.diffuse", prefix), self.diffuse);
        sink.set_vec3(&format!("{}.base.specular", prefix), self.specular);
        sink.set_float(&format!("{}.atten.constant", prefix), self.attenuation.constant);
        sink.set_float(&format!("{}.atten.linear", prefix), self.attenuation.linear);
        sink.set_float(&format!("{}.atten.exp", prefix), self.attenuation.exp);
    }
}
