//! Discrete-time 2D physics for rigid discs: RK4 integration under a constant
//! acceleration field, elastic wall reflection and pairwise elastic
//! collisions.

pub mod collision;
pub mod diagnostics;
pub mod integrator;
pub mod particle;
pub mod simulation;
pub mod walls;

pub use collision::{resolve_all, resolve_pair};
pub use diagnostics::{DiagnosticsReporter, SnapshotRecorder};
pub use integrator::{AccelerationField, Derivative, UniformGravity};
pub use particle::{Bounds, Particle, State};
pub use simulation::{tick, Simulation, TickContext, TickObserver, TickReport};
pub use walls::WallHits;
