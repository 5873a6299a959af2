//! Fixed-step integrators for a single particle.
//!
//! Provides the classical four-stage Runge-Kutta step used by default and a
//! semi-implicit Euler step. Both apply wall reflection between the position
//! update and the velocity update, then recompute every derived quantity.

use bounce_common::{IntegratorMethod, SimParams, Vec2};

use crate::particle::{Particle, State};
use crate::walls;

/// Source of acceleration acting on a particle.
///
/// Receives time and the current kinematic state even though the only field in
/// use is uniform, so position- or velocity-dependent forces can slot in.
pub trait AccelerationField {
    fn acceleration(&self, t: f64, position: Vec2, velocity: Vec2) -> Vec2;
}

/// Constant acceleration everywhere, e.g. gravity `(0, 9.8)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformGravity(pub Vec2);

impl AccelerationField for UniformGravity {
    fn acceleration(&self, _t: f64, _position: Vec2, _velocity: Vec2) -> Vec2 {
        self.0
    }
}

/// Time derivative of `(position, velocity)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Derivative {
    pub dpos: Vec2,
    pub dvel: Vec2,
}

/// Advances `initial` by `dt` along derivative `d`, then samples the
/// derivative at the resulting state and time `t + dt`.
pub fn evaluate<F: AccelerationField + ?Sized>(
    initial: &State,
    t: f64,
    dt: f64,
    d: &Derivative,
    field: &F,
) -> Derivative {
    let position = initial.position + d.dpos * dt;
    let velocity = initial.velocity + d.dvel * dt;

    Derivative {
        dpos: velocity,
        dvel: field.acceleration(t + dt, position, velocity),
    }
}

/// RK4-weighted derivative over `[t, t + dt]`.
pub fn rk4_derivative<F: AccelerationField + ?Sized>(
    state: &State,
    t: f64,
    dt: f64,
    field: &F,
) -> Derivative {
    let half_dt = 0.5 * dt;

    let k1 = evaluate(state, t, 0.0, &Derivative::default(), field);
    let k2 = evaluate(state, t, half_dt, &k1, field);
    let k3 = evaluate(state, t, half_dt, &k2, field);
    let k4 = evaluate(state, t, dt, &k3, field);

    Derivative {
        dpos: (k1.dpos + (k2.dpos + k3.dpos) * 2.0 + k4.dpos) / 6.0,
        dvel: (k1.dvel + (k2.dvel + k3.dvel) * 2.0 + k4.dvel) / 6.0,
    }
}

/// One RK4 step for `particle` under `field`.
///
/// Order matters: the position delta is applied first, walls are checked
/// against that new position (possibly flipping velocity), and only then is
/// the velocity delta added.
pub fn rk4_step<F: AccelerationField + ?Sized>(
    particle: &mut Particle,
    t: f64,
    dt: f64,
    field: &F,
    params: &SimParams,
) {
    let diameter = particle.diameter();
    let state = particle.state_mut();
    let derivative = rk4_derivative(state, t, dt, field);

    state.position += derivative.dpos * dt;
    walls::reflect(state, diameter, params);
    state.velocity += derivative.dvel * dt;

    particle.refresh(params);
}

/// Semi-implicit Euler step using the particle's own constant acceleration.
pub fn euler_step(particle: &mut Particle, dt: f64, params: &SimParams) {
    let diameter = particle.diameter();
    let state = particle.state_mut();

    state.position += state.velocity * dt;
    walls::reflect(state, diameter, params);
    state.velocity += state.acceleration * dt;

    particle.refresh(params);
}

/// Advances one particle with the configured method.
pub fn integrate(
    particle: &mut Particle,
    method: IntegratorMethod,
    t: f64,
    dt: f64,
    params: &SimParams,
) {
    match method {
        IntegratorMethod::Rk4 => rk4_step(particle, t, dt, &UniformGravity(params.gravity), params),
        IntegratorMethod::Euler => euler_step(particle, dt, params),
    }
}
