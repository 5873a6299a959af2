use anyhow::Result;
use bounce_common::{Color, IntegratorMethod, SimParams, SimulationConfig, Snapshot};
use log::{debug, trace};

use crate::collision;
use crate::integrator;
use crate::particle::Particle;

/// What one tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Sum of kinetic and potential energy over all particles after integration.
    pub total_energy: f64,
    /// Number of pair resolutions in the collision pass.
    pub collisions: usize,
}

/// Advances every particle by `dt`.
///
/// The full collision pass runs first over the current list, then each
/// particle is integrated on its own, then the total energy is summed.
pub fn tick(
    particles: &mut [Particle],
    t: f64,
    dt: f64,
    params: &SimParams,
    method: IntegratorMethod,
) -> TickReport {
    let collisions = collision::resolve_all(particles);

    for particle in particles.iter_mut() {
        integrator::integrate(particle, method, t, dt, params);
    }

    let total_energy = particles.iter().map(Particle::total_energy).sum();
    TickReport {
        total_energy,
        collisions,
    }
}

/// Read-only view handed to observers after each tick.
pub struct TickContext<'a> {
    /// Ticks completed so far, starting at 1 for the first tick.
    pub step: u64,
    /// Simulation time after the tick.
    pub time: f64,
    pub particles: &'a [Particle],
    pub colors: &'a [Color],
    pub report: TickReport,
}

impl TickContext<'_> {
    pub fn snapshot(&self) -> Snapshot {
        build_snapshot(self.step, self.time, self.report.total_energy, self.particles, self.colors)
    }
}

/// Optional collaborator notified after every tick (diagnostics, recording).
pub trait TickObserver {
    fn on_tick(&mut self, ctx: &TickContext<'_>) -> Result<()>;
}

/// Owns the particle list and the clock, and drives [`tick`].
pub struct Simulation {
    params: SimParams,
    method: IntegratorMethod,
    particles: Vec<Particle>,
    /// Render colour per particle, same order as `particles`.
    colors: Vec<Color>,
    time: f64,
    current_step: u64,
}

impl Simulation {
    /// Builds every configured particle. Fails on the first invalid one.
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        let params = config.get_sim_params();
        let count = config.particles.len();

        let mut particles = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);
        for (i, particle_config) in config.particles.iter().enumerate() {
            particles.push(Particle::new(particle_config, &params)?);
            colors.push(particle_config.resolve_color(i, count)?);
        }
        debug!("Built {} particles", particles.len());

        Ok(Self::from_parts(particles, colors, params, config.physics.integrator))
    }

    /// Wraps an already-built particle list. Missing colours are filled from
    /// the palette.
    pub fn from_parts(
        particles: Vec<Particle>,
        mut colors: Vec<Color>,
        params: SimParams,
        method: IntegratorMethod,
    ) -> Self {
        let count = particles.len();
        colors.truncate(count);
        for i in colors.len()..count {
            colors.push(Color::from_palette(i, count));
        }

        Simulation {
            params,
            method,
            particles,
            colors,
            time: 0.0,
            current_step: 0,
        }
    }

    /// Advances the simulation by one timestep without observers.
    pub fn step(&mut self) -> Result<TickReport> {
        self.step_observed(&mut [])
    }

    /// Advances the simulation by one timestep, then notifies `observers` in order.
    pub fn step_observed(&mut self, observers: &mut [&mut dyn TickObserver]) -> Result<TickReport> {
        let dt = self.params.dt;
        let report = tick(&mut self.particles, self.time, dt, &self.params, self.method);
        self.time += dt;
        self.current_step += 1;
        trace!(
            "Tick {} (t = {:.4}): {} collisions, total energy {:.4}",
            self.current_step,
            self.time,
            report.collisions,
            report.total_energy
        );

        let ctx = TickContext {
            step: self.current_step,
            time: self.time,
            particles: &self.particles,
            colors: &self.colors,
            report,
        };
        for observer in observers.iter_mut() {
            observer.on_tick(&ctx)?;
        }
        Ok(report)
    }

    /// Snapshot of the current state.
    pub fn snapshot(&self) -> Snapshot {
        build_snapshot(
            self.current_step,
            self.time,
            self.total_energy(),
            &self.particles,
            &self.colors,
        )
    }

    pub fn total_energy(&self) -> f64 {
        self.particles.iter().map(Particle::total_energy).sum()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn method(&self) -> IntegratorMethod {
        self.method
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn current_step(&self) -> u64 {
        self.current_step
    }
}

fn build_snapshot(
    step: u64,
    time: f64,
    total_energy: f64,
    particles: &[Particle],
    colors: &[Color],
) -> Snapshot {
    Snapshot {
        step,
        time,
        total_energy,
        particles: particles
            .iter()
            .zip(colors)
            .map(|(p, &color)| p.snapshot(color))
            .collect(),
    }
}
