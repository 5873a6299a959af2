//! Tick observers that sit outside the physics: periodic state reports and
//! snapshot recording.

use anyhow::Result;
use bounce_common::Snapshot;
use log::info;

use crate::simulation::{TickContext, TickObserver};

/// Logs every particle's state and the system energy after the first tick and
/// every `interval` ticks after that.
pub struct DiagnosticsReporter {
    interval: u64,
    reports: u64,
}

impl DiagnosticsReporter {
    pub fn new(interval: u64) -> Self {
        DiagnosticsReporter {
            interval: interval.max(1),
            reports: 0,
        }
    }

    /// How many reports have been written so far.
    pub fn reports(&self) -> u64 {
        self.reports
    }
}

impl TickObserver for DiagnosticsReporter {
    fn on_tick(&mut self, ctx: &TickContext<'_>) -> Result<()> {
        if ctx.step.saturating_sub(1) % self.interval != 0 {
            return Ok(());
        }
        self.reports += 1;

        info!("--- Tick {} (t = {:.3} s) ---", ctx.step, ctx.time);
        for p in ctx.particles {
            let s = p.state();
            info!("{}", p);
            info!(
                "   > position {} | velocity {} | momentum {} | acceleration {}",
                s.position, s.velocity, s.momentum, s.acceleration
            );
            info!(
                "   > kinetic {:.4} | potential {:.4} | total {:.4}",
                s.kinetic_energy, s.potential_energy, s.total_energy
            );
        }
        info!("Total Energy: {:.4}", ctx.report.total_energy);
        Ok(())
    }
}

/// Keeps a [`Snapshot`] every `interval` ticks.
pub struct SnapshotRecorder {
    interval: u64,
    snapshots: Vec<Snapshot>,
}

impl SnapshotRecorder {
    pub fn new(interval: u64) -> Self {
        SnapshotRecorder {
            interval: interval.max(1),
            snapshots: Vec::new(),
        }
    }

    /// Adds a snapshot taken outside the tick loop, e.g. the initial state.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn into_snapshots(self) -> Vec<Snapshot> {
        self.snapshots
    }
}

impl TickObserver for SnapshotRecorder {
    fn on_tick(&mut self, ctx: &TickContext<'_>) -> Result<()> {
        if ctx.step % self.interval == 0 {
            self.snapshots.push(ctx.snapshot());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Particle;
    use crate::simulation::Simulation;
    use bounce_common::{IntegratorMethod, ParticleConfig, SimParams, Vec2};

    fn lone_ball() -> Simulation {
        let params = SimParams::default();
        let config = ParticleConfig::new("solo", 1.0, 10.0, Vec2::new(300.0, 100.0))
            .with_velocity(Vec2::new(4.0, 0.0));
        let particles = vec![Particle::new(&config, &params).unwrap()];
        Simulation::from_parts(particles, Vec::new(), params, IntegratorMethod::Rk4)
    }

    #[test]
    fn reporter_fires_on_interval() {
        let mut sim = lone_ball();
        let mut reporter = DiagnosticsReporter::new(3);
        for _ in 0..10 {
            sim.step_observed(&mut [&mut reporter]).unwrap();
        }
        // ticks 1, 4, 7, 10
        assert_eq!(reporter.reports(), 4);
    }

    #[test]
    fn reporter_fires_after_first_tick() {
        let mut sim = lone_ball();
        let mut reporter = DiagnosticsReporter::new(3000);
        sim.step_observed(&mut [&mut reporter]).unwrap();
        assert_eq!(reporter.reports(), 1);
        for _ in 0..2999 {
            sim.step_observed(&mut [&mut reporter]).unwrap();
        }
        assert_eq!(reporter.reports(), 1);
        sim.step_observed(&mut [&mut reporter]).unwrap();
        assert_eq!(reporter.reports(), 2);
    }

    #[test]
    fn recorder_keeps_every_nth_snapshot() {
        let mut sim = lone_ball();
        let mut recorder = SnapshotRecorder::new(2);
        recorder.record(sim.snapshot());
        for _ in 0..5 {
            sim.step_observed(&mut [&mut recorder]).unwrap();
        }
        let steps: Vec<u64> = recorder.snapshots().iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![0, 2, 4]);

        let last = recorder.into_snapshots().pop().unwrap();
        assert_eq!(last.particles.len(), 1);
        assert_eq!(last.particles[0].name, "solo");
        assert!((last.time - 4.0 * SimParams::default().dt).abs() < 1e-12);
    }

    #[test]
    fn zero_interval_is_treated_as_every_tick() {
        let mut sim = lone_ball();
        let mut recorder = SnapshotRecorder::new(0);
        sim.step_observed(&mut [&mut recorder]).unwrap();
        sim.step_observed(&mut [&mut recorder]).unwrap();
        assert_eq!(recorder.snapshots().len(), 2);
    }
}
