use std::collections::HashMap;

use super::{DrawContext, GpuDevice, UniformSink, UniformValue};

pub enum FrameCommand<'a, G: GpuDevice> {
    SetUniform { name: String, value: UniformValue },
    BindTexture { unit: u32, sampler: String, texture: &'a G::Texture },
    SetBlending(bool),
    Draw { buffers: &'a G::Buffers },
}

/// Records everything a frame asks of the device, in order, and keeps the
/// latest value of every uniform.
pub struct FrameRecorder<'a, G: GpuDevice> {
    uniforms: HashMap<String, UniformValue>,
    commands: Vec<FrameCommand<'a, G>>,
    blending: bool,
}

impl<'a, G: GpuDevice> Default for FrameRecorder<'a, G> {
    fn default() -> Self {
        Self {
            uniforms: HashMap::new(),
            commands: Vec::new(),
            blending: false,
        }
    }
}

impl<'a, G: GpuDevice> FrameRecorder<'a, G> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name).copied()
    }

    pub fn uniforms(&self) -> &HashMap<String, UniformValue> {
        &self.uniforms
    }

    pub fn commands(&self) -> &[FrameCommand<'a, G>] {
        &self.commands
    }

    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, FrameCommand::Draw { .. }))
            .count()
    }

    pub fn blending_enabled(&self) -> bool {
        self.blending
    }

    /// Value of `name` as it stood when the `draw`-th draw call (0-based) was issued.
    pub fn uniform_at_draw(&self, draw: usize, name: &str) -> Option<UniformValue> {
        let mut value = None;
        let mut draws_seen = 0;
        for command in &self.commands {
            match command {
                FrameCommand::SetUniform { name: set, value: v } if set == name => value = Some(*v),
                FrameCommand::Draw { .. } => {
                    if draws_seen == draw {
                        return value;
                    }
                    draws_seen += 1;
                }
                _ => {}
            }
        }
        None
    }

    /// Whether blending was on for the `draw`-th draw call.
    pub fn blending_at_draw(&self, draw: usize) -> Option<bool> {
        let mut blending = false;
        let mut draws_seen = 0;
        for command in &self.commands {
            match command {
                FrameCommand::SetBlending(enabled) => blending = *enabled,
                FrameCommand::Draw { .. } => {
                    if draws_seen == draw {
                        return Some(blending);
                    }
                    draws_seen += 1;
                }
                _ => {}
            }
        }
        None
    }

    /// Sampler names bound since the previous draw, for the `draw`-th draw call.
    pub fn samplers_at_draw(&self, draw: usize) -> Vec<(u32, &str)> {
        let mut bound = Vec::new();
        let mut draws_seen = 0;
        for command in &self.commands {
            match command {
                FrameCommand::BindTexture { unit, sampler, .. } => bound.push((*unit, sampler.as_str())),
                FrameCommand::Draw { .. } => {
                    if draws_seen == draw {
                        return bound;
                    }
                    draws_seen += 1;
                    bound.clear();
                }
                _ => {}
            }
        }
        Vec::new()
    }
}

impl<'a, G: GpuDevice> UniformSink for FrameRecorder<'a, G> {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.uniforms.insert(name.to_string(), value);
        self.commands.push(FrameCommand::SetUniform {
            name: name.to_string(),
            value,
        });
    }
}

impl<'a, G: GpuDevice> DrawContext<'a, G> for FrameRecorder<'a, G> {
    fn bind_texture(&mut self, unit: u32, sampler: &str, texture: &'a G::Texture) {
        self.commands.push(FrameCommand::BindTexture {
            unit,
            sampler: sampler.to_string(),
            texture,
        });
    }

    fn set_blending(&mut self, enabled: bool) {
        self.blending = enabled;
        self.commands.push(FrameCommand::SetBlending(enabled));
    }

    fn draw_indexed(&mut self, buffers: &'a G::Buffers) {
        self.commands.push(FrameCommand::Draw { buffers });
    }
}
