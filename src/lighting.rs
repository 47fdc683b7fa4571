use glam::Vec3;

use crate::gpu::UniformSink;

/// Range of the position sliders on the debug overlay.
pub const SUN_POSITION_LIMIT: f32 = 400.0;

/// The scene-wide directional light. Its values come from the debug overlay,
/// so setters clamp to the ranges the overlay offers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunLight {
    position: Vec3,
    direction: Vec3,
    color: Vec3,
}

impl Default for SunLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 200.0, 100.0),
            direction: Vec3::ONE,
            color: Vec3::ONE,
        }
    }
}

impl SunLight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn color(&self) -> Vec3 {
        self.color
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position.clamp(Vec3::splat(-SUN_POSITION_LIMIT), Vec3::splat(SUN_POSITION_LIMIT));
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction;
    }

    pub fn set_color(&mut self, color: Vec3) {
        self.color = color.clamp(Vec3::ZERO, Vec3::ONE);
    }

    pub fn ambient(&self) -> Vec3 {
        self.color * 0.25
    }

    pub fn diffuse(&self) -> Vec3 {
        self.color * 0.55
    }

    pub fn write<S: UniformSink + ?Sized>(&self, sink: &mut S) {
        sink.set_vec3("sunLight.position", self.position);
        sink.set_vec3("sunLight.direction", self.direction);
        sink.set_vec3("sunLight.base.ambient", self.ambient());
        sink.set_vec3("sunLight.base.diffuse", self.diffuse());
        sink.set_vec3("sunLight.base.specular", Vec3::ZERO);
    }
}
