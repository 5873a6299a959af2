use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::render::Color;
use crate::sim_params::SimParams;
use crate::vecmath::Vec2;

// Bounds of the simulated region, in pixels. y grows downward.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RegionConfig {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_wall_margin")]
    pub wall_margin: f64,
}

/// Which integrator advances particle state.
/// `integrator = "rk4"` or `integrator = "euler"`
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegratorMethod {
    #[serde(rename = "rk4")] // Classical 4th-order Runge-Kutta
    #[default]
    Rk4,

    #[serde(rename = "euler")] // Semi-implicit Euler, one evaluation per tick
    Euler,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PhysicsConfig {
    #[serde(default = "default_gravity")]
    pub gravity: Vec2,
    #[serde(default)]
    pub integrator: IntegratorMethod,
}

// Configuration for timing
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Fixed timestep in seconds. Defaults to `5 / fps`.
    #[serde(default)]
    pub dt: Option<f64>,
    pub total_time: f64,
    /// Ticks between diagnostic reports. Defaults to `fps * 50`.
    #[serde(default)]
    pub report_interval_ticks: Option<u64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Bincode,
    MessagePack,
}

// Configuration for output settings
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    #[serde(default = "default_true")]
    pub save_snapshots: bool,
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval_ticks: u64,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_true")]
    pub save_final_state: bool,
}

/// Initial state of one particle.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ParticleConfig {
    pub name: String,
    pub mass: f64,
    pub radius: f64,
    /// Top-left corner of the particle's bounding square.
    pub position: Vec2,
    #[serde(default)]
    pub velocity: Vec2,
    /// Constant acceleration. Falls back to the configured gravity.
    #[serde(default)]
    pub acceleration: Option<Vec2>,
    #[serde(default = "default_restitution")]
    pub restitution: f64,
    /// CSS colour name or `#rrggbb`. A palette colour is chosen when absent.
    #[serde(default)]
    pub color: Option<String>,
}

impl ParticleConfig {
    pub fn new(name: impl Into<String>, mass: f64, radius: f64, position: Vec2) -> Self {
        ParticleConfig {
            name: name.into(),
            mass,
            radius,
            position,
            velocity: Vec2::zero(),
            acceleration: None,
            restitution: default_restitution(),
            color: None,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vec2) -> Self {
        self.acceleration = Some(acceleration);
        self
    }

    pub fn with_restitution(mut self, restitution: f64) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Rejects degenerate bodies before they reach the simulation.
    pub fn validate(&self) -> Result<()> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            bail!("Particle '{}': mass must be positive, got {}.", self.name, self.mass);
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            bail!("Particle '{}': radius must be positive, got {}.", self.name, self.radius);
        }
        Ok(())
    }

    /// Resolves the configured colour, or the palette colour for slot `index` of `count`.
    pub fn resolve_color(&self, index: usize, count: usize) -> Result<Color> {
        match &self.color {
            Some(name) => Color::parse(name)
                .with_context(|| format!("Particle '{}' has an invalid colour", self.name)),
            None => Ok(Color::from_palette(index, count)),
        }
    }
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SimulationConfig {
    #[serde(default)]
    pub region: RegionConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    pub timing: TimingConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub particles: Vec<ParticleConfig>,
}

impl Default for RegionConfig {
    fn default() -> Self {
        RegionConfig {
            width: default_width(),
            height: default_height(),
            wall_margin: default_wall_margin(),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity: default_gravity(),
            integrator: IntegratorMethod::default(),
        }
    }
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read config file '{}'", path_ref.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("Invalid config file '{}'", path_ref.display()))
    }

    /// Parses and validates a configuration held in memory.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: SimulationConfig =
            toml::from_str(config_str).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let region = &self.region;
        if !(region.width > 0.0 && region.height > 0.0) {
            bail!("Region width and height must be positive.");
        }
        if !(region.wall_margin >= 0.0 && region.wall_margin < region.width.min(region.height)) {
            bail!("wall_margin must lie in [0, min(width, height)).");
        }
        if self.timing.fps == 0 {
            bail!("fps must be greater than 0.");
        }
        if !(self.dt() > 0.0 && self.dt().is_finite()) {
            bail!("dt must be positive.");
        }
        if self.timing.total_time < 0.0 {
            bail!("total_time must not be negative.");
        }
        if self.output.snapshot_interval_ticks == 0 {
            bail!("snapshot_interval_ticks must be greater than 0.");
        }
        if self.particles.is_empty() {
            bail!("At least one [[particles]] entry is required.");
        }
        let count = self.particles.len();
        for (i, p) in self.particles.iter().enumerate() {
            p.validate()?;
            p.resolve_color(i, count)?;
        }
        Ok(())
    }

    /// Fixed timestep in seconds.
    pub fn dt(&self) -> f64 {
        self.timing.dt.unwrap_or(5.0 / self.timing.fps as f64)
    }

    pub fn total_steps(&self) -> u64 {
        (self.timing.total_time / self.dt()).ceil() as u64
    }

    pub fn report_interval_ticks(&self) -> u64 {
        self.timing
            .report_interval_ticks
            .unwrap_or(self.timing.fps as u64 * 50)
            .max(1)
    }

    /// Converts the configuration into simulation parameters used at runtime.
    pub fn get_sim_params(&self) -> SimParams {
        SimParams {
            world_width: self.region.width,
            world_height: self.region.height,
            wall_margin: self.region.wall_margin,
            gravity: self.physics.gravity,
            dt: self.dt(),
            fps: self.timing.fps,
        }
    }
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    600.0
}

fn default_wall_margin() -> f64 {
    0.1
}

fn default_gravity() -> Vec2 {
    Vec2::new(0.0, 9.8)
}

fn default_fps() -> u32 {
    60
}

fn default_restitution() -> f64 {
    1.0 // perfectly elastic
}

fn default_snapshot_interval() -> u64 {
    1
}

fn default_true() -> bool {
    true
}
