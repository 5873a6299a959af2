use serde::{Deserialize, Serialize};

use crate::render::{Color, Renderer};
use crate::vecmath::Vec2;

/// State of a single particle at snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleSnapshot {
    pub name: String,
    /// Top-left corner of the bounding square.
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f64,
    pub color: Color,
    pub kinetic_energy: f64,
    pub potential_energy: f64,
}

/// A snapshot of the simulation state at a specific tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Tick count at which the snapshot was taken.
    pub step: u64,
    /// Simulation time in seconds.
    pub time: f64,
    /// Sum of kinetic and potential energy over all particles.
    pub total_energy: f64,
    pub particles: Vec<ParticleSnapshot>,
}

impl Snapshot {
    /// Hands every particle to the renderer, in list order.
    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        for p in &self.particles {
            renderer.render(p.position, p.radius, p.color);
        }
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(|p| p.kinetic_energy).sum()
    }
}
