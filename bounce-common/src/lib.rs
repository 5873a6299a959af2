pub mod config;
pub mod render;
pub mod sim_params;
pub mod snapshot;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{
    IntegratorMethod, OutputConfig, OutputFormat, ParticleConfig, PhysicsConfig, RegionConfig,
    SimulationConfig, TimingConfig,
};
pub use render::{Color, Renderer};
pub use sim_params::SimParams;
pub use snapshot::{ParticleSnapshot, Snapshot};
pub use vecmath::Vec2;
