use serde::{Deserialize, Serialize};

use crate::vecmath::Vec2;

/// Simulation parameters derived from the configuration, read on every tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimParams {
    // Region
    pub world_width: f64,
    pub world_height: f64,
    /// Offset a particle is pushed back inside the region after touching a wall.
    pub wall_margin: f64,

    // Forces
    pub gravity: Vec2,

    // Time
    pub dt: f64,
    pub fps: u32, // only drives diagnostic cadence
}

impl Default for SimParams {
    fn default() -> Self {
        SimParams {
            world_width: 800.0,
            world_height: 600.0,
            wall_margin: 0.1,
            gravity: Vec2::new(0.0, 9.8),
            dt: 5.0 / 60.0,
            fps: 60,
        }
    }
}
