use anyhow::Result;
use bounce_common::{Color, ParticleConfig, ParticleSnapshot, SimParams, Vec2};
use std::fmt;

/// Physical state of a particle, mutated every tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct State {
    pub position: Vec2,
    pub velocity: Vec2,
    pub momentum: Vec2,
    /// Held constant for the lifetime of the particle.
    pub acceleration: Vec2,
    pub kinetic_energy: f64,
    pub potential_energy: f64,
    pub total_energy: f64,
}

/// Extreme points of the particle's circle, derived from its position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub left: Vec2,
    pub right: Vec2,
    pub top: Vec2,
    pub bottom: Vec2,
    pub center: Vec2,
}

impl Bounds {
    /// `position` is the top-left corner of the bounding square.
    pub fn from_position(position: Vec2, radius: f64) -> Self {
        let diameter = radius * 2.0;
        Bounds {
            left: Vec2::new(position.x, position.y + radius),
            right: Vec2::new(position.x + diameter, position.y + radius),
            top: Vec2::new(position.x + radius, position.y),
            bottom: Vec2::new(position.x + radius, position.y + diameter),
            center: Vec2::new(position.x + radius, position.y + radius),
        }
    }
}

/// A rigid circular body.
///
/// Identity fields (`name`, `mass`, `radius`, `restitution`) never change after
/// construction. Everything in [`State`] other than position, velocity and
/// acceleration, plus the bounds and height, is derived and only ever written
/// by [`Particle::refresh`] and [`Particle::refresh_kinetics`].
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    name: String,
    mass: f64,
    radius: f64,
    diameter: f64,
    restitution: f64,
    state: State,
    bounds: Bounds,
    height: f64,
}

impl Particle {
    /// Builds a particle with every derived quantity already computed.
    ///
    /// Fails when mass or radius is not a positive finite number. A particle
    /// without an explicit acceleration falls under `params.gravity`.
    pub fn new(config: &ParticleConfig, params: &SimParams) -> Result<Self> {
        config.validate()?;

        let mut particle = Particle {
            name: config.name.clone(),
            mass: config.mass,
            radius: config.radius,
            diameter: config.radius * 2.0,
            restitution: config.restitution,
            state: State {
                position: config.position,
                velocity: config.velocity,
                acceleration: config.acceleration.unwrap_or(params.gravity),
                ..State::default()
            },
            bounds: Bounds::default(),
            height: 0.0,
        };
        particle.refresh(params);
        Ok(particle)
    }

    /// Recomputes height, momentum, energies and bounds from the current
    /// position and velocity.
    pub fn refresh(&mut self, params: &SimParams) {
        self.height = params.world_height - self.state.position.y - self.diameter;
        self.state.potential_energy = self.mass * params.gravity.y * self.height;
        self.refresh_kinetics();
        self.bounds = Bounds::from_position(self.state.position, self.radius);
    }

    /// Recomputes the velocity-dependent quantities only. Enough after a
    /// collision, which leaves position untouched.
    pub fn refresh_kinetics(&mut self) {
        let v = self.state.velocity;
        self.state.momentum = v * self.mass;
        self.state.kinetic_energy = 0.5 * self.mass * v.magnitude_squared();
        self.state.total_energy = self.state.kinetic_energy + self.state.potential_energy;
    }

    /// Distance between the two particles' centers.
    pub fn distance_to(&self, other: &Particle) -> f64 {
        self.bounds.center.distance_to(other.bounds.center)
    }

    /// True when the circles strictly overlap. Touching is not overlapping.
    pub fn overlapping(&self, other: &Particle) -> bool {
        self.distance_to(other) < self.radius + other.radius
    }

    pub fn snapshot(&self, color: Color) -> ParticleSnapshot {
        ParticleSnapshot {
            name: self.name.clone(),
            position: self.state.position,
            velocity: self.state.velocity,
            radius: self.radius,
            color,
            kinetic_energy: self.state.kinetic_energy,
            potential_energy: self.state.potential_energy,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn restitution(&self) -> f64 {
        self.restitution
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    // Callers must follow up with `refresh` or `refresh_kinetics`.
    pub(crate) fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    pub fn position(&self) -> Vec2 {
        self.state.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.state.velocity
    }

    pub fn acceleration(&self) -> Vec2 {
        self.state.acceleration
    }

    pub fn momentum(&self) -> Vec2 {
        self.state.momentum
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.state.kinetic_energy
    }

    pub fn potential_energy(&self) -> f64 {
        self.state.potential_energy
    }

    pub fn total_energy(&self) -> f64 {
        self.state.total_energy
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn left(&self) -> Vec2 {
        self.bounds.left
    }

    pub fn right(&self) -> Vec2 {
        self.bounds.right
    }

    pub fn top(&self) -> Vec2 {
        self.bounds.top
    }

    pub fn bottom(&self) -> Vec2 {
        self.bounds.bottom
    }

    pub fn center(&self) -> Vec2 {
        self.bounds.center
    }

    /// Gap between the bottom of the particle and the floor.
    pub fn height(&self) -> f64 {
        self.height
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Particle \"{}\" (mass {}, radius {}, center {})",
            self.name, self.mass, self.radius, self.bounds.center
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SimParams {
        SimParams::default()
    }

    #[test]
    fn construction_computes_derived_quantities() {
        let config = ParticleConfig::new("ball", 2.0, 10.0, Vec2::new(100.0, 200.0))
            .with_velocity(Vec2::new(3.0, 4.0))
            .with_restitution(0.9);
        let p = Particle::new(&config, &params()).unwrap();

        assert_eq!(p.diameter(), 20.0);
        assert_eq!(p.restitution(), 0.9);
        assert_eq!(p.acceleration(), Vec2::new(0.0, 9.8));
        assert_eq!(p.momentum(), Vec2::new(6.0, 8.0));
        assert_eq!(p.kinetic_energy(), 25.0);
        // 600 - 200 - 20
        assert_eq!(p.height(), 380.0);
        assert!((p.potential_energy() - 2.0 * 9.8 * 380.0).abs() < 1e-9);
        assert_eq!(p.total_energy(), p.kinetic_energy() + p.potential_energy());
    }

    #[test]
    fn bounds_follow_top_left_position() {
        let config = ParticleConfig::new("ball", 1.0, 10.0, Vec2::new(90.0, 50.0));
        let p = Particle::new(&config, &params()).unwrap();

        assert_eq!(p.left(), Vec2::new(90.0, 60.0));
        assert_eq!(p.right(), Vec2::new(110.0, 60.0));
        assert_eq!(p.top(), Vec2::new(100.0, 50.0));
        assert_eq!(p.bottom(), Vec2::new(100.0, 70.0));
        assert_eq!(p.center(), Vec2::new(100.0, 60.0));
    }

    #[test]
    fn explicit_acceleration_overrides_gravity() {
        let config = ParticleConfig::new("float", 1.0, 5.0, Vec2::new(10.0, 10.0))
            .with_acceleration(Vec2::zero());
        let p = Particle::new(&config, &params()).unwrap();
        assert_eq!(p.acceleration(), Vec2::zero());
    }

    #[test]
    fn rejects_non_positive_mass_or_radius() {
        let p = params();
        for (mass, radius) in [(0.0, 10.0), (-1.0, 10.0), (1.0, 0.0), (1.0, -3.0), (f64::NAN, 1.0)] {
            let config = ParticleConfig::new("bad", mass, radius, Vec2::zero());
            assert!(Particle::new(&config, &p).is_err(), "mass {} radius {}", mass, radius);
        }
    }

    #[test]
    fn tangency_is_not_overlap() {
        let p = params();
        let a = Particle::new(&ParticleConfig::new("a", 1.0, 10.0, Vec2::new(100.0, 100.0)), &p).unwrap();
        let touching = Particle::new(&ParticleConfig::new("b", 1.0, 10.0, Vec2::new(120.0, 100.0)), &p).unwrap();
        assert_eq!(a.distance_to(&touching), 20.0);
        assert!(!a.overlapping(&touching));

        let closer = Particle::new(&ParticleConfig::new("c", 1.0, 10.0, Vec2::new(120.0 - 1e-9, 100.0)), &p).unwrap();
        assert!(a.overlapping(&closer));
        assert!(closer.overlapping(&a));
    }

    #[test]
    fn refresh_kinetics_keeps_potential_energy() {
        let mut p = Particle::new(&ParticleConfig::new("a", 1.0, 10.0, Vec2::new(0.0, 0.0)), &params()).unwrap();
        let potential = p.potential_energy();
        p.state_mut().velocity = Vec2::new(2.0, 0.0);
        p.refresh_kinetics();
        assert_eq!(p.kinetic_energy(), 2.0);
        assert_eq!(p.potential_energy(), potential);
        assert_eq!(p.total_energy(), 2.0 + potential);
    }

    #[test]
    fn display_names_the_particle() {
        let p = Particle::new(&ParticleConfig::new("Test Particle 1", 1.0, 10.0, Vec2::zero()), &params()).unwrap();
        assert_eq!(
            p.to_string(),
            "Particle \"Test Particle 1\" (mass 1, radius 10, center (10, 10))"
        );
    }
}
