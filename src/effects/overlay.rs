/// The surface effects draw on, kept as plain state for the renderer.

use crate::entities::EffectKind;

use super::particles::{Particle, ParticleId};

#[derive(Clone, Debug, Default)]
pub struct Overlay {
    effect: Option<EffectKind>,
    particles: Vec<Particle>,
    shaking: bool,
    wind_offset: i32,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effect-scoped styling, `None` when no session is running.
    pub fn effect(&self) -> Option<EffectKind> {
        self.effect
    }

    pub fn set_effect(&mut self, effect: Option<EffectKind>) {
        self.effect = effect;
    }

    /// Style class string, e.g. `"effect-overlay storm"`.
    pub fn class_name(&self) -> String {
        match self.effect {
            Some(kind) => format!("effect-overlay {kind}"),
            None => "effect-overlay".to_string(),
        }
    }

    pub fn add(&mut self, particle: Particle) {
        if particle.is_bolt() {
            self.shaking = true;
        }
        self.particles.push(particle);
    }

    pub fn remove(&mut self, id: ParticleId) -> Option<Particle> {
        let index = self.particles.iter().position(|p| p.id == id)?;
        let particle = self.particles.remove(index);
        if particle.is_bolt() {
            self.shaking = false;
        }
        Some(particle)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_shaking(&self) -> bool {
        self.shaking
    }

    /// Horizontal displacement of the whole viewport, in pixels.
    pub fn wind_offset(&self) -> i32 {
        self.wind_offset
    }

    pub fn set_wind_offset(&mut self, px: i32) {
        self.wind_offset = px;
    }

    /// Remove every particle and reset viewport displacement.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.shaking = false;
        self.wind_offset = 0;
    }
}
