//! Runge-Kutta integration methods
//!
//! Both methods treat the state as `(x, v)` with derivative `(v, a(x, v, t))`.
//! Every stage samples the whole field set at its own trial position,
//! velocity and time.

use super::Integrator;
use crate::physics::fields::FieldSet;
use crate::physics::math::{Scalar, Vector};
use crate::physics::particle::ChargedParticle;

/// Field acceleration at a trial state
#[inline]
fn stage_acceleration(
    particle: &ChargedParticle,
    fields: &FieldSet,
    position: Vector,
    velocity: Vector,
    t: Scalar,
) -> Vector {
    fields.acceleration(&particle.probe(position, velocity), t)
}

/// Second-order Runge-Kutta method (Heun's method)
///
/// A predictor-corrector scheme: the slope at the start of the step predicts
/// the end state, and the two slopes are averaged.
///
/// ```text
/// k1 = f(t, y)
/// k2 = f(t + dt, y + k1*dt)
/// y_new = y + (k1 + k2) * dt/2
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RungeKuttaSecondOrder;

impl Integrator for RungeKuttaSecondOrder {
    fn clone_box(&self) -> Box<dyn Integrator> {
        Box::new(*self)
    }

    fn step(&self, particle: &mut ChargedParticle, fields: &FieldSet, t: Scalar, dt: Scalar) {
        let position = particle.position();
        let velocity = particle.velocity();

        // Stage 1: current state (predictor)
        let k1_x = velocity;
        let k1_v = fields.acceleration(particle, t);

        // Stage 2: predicted endpoint
        let k2_x = velocity + k1_v * dt;
        let k2_v = stage_acceleration(particle, fields, position + k1_x * dt, k2_x, t + dt);

        particle.set_acceleration(k1_v);
        particle.set_position(position + (k1_x + k2_x) * (dt * 0.5));
        particle.set_velocity(velocity + (k1_v + k2_v) * (dt * 0.5));
    }

    fn convergence_order(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "runge_kutta_second_order"
    }

    fn aliases(&self) -> Vec<&'static str> {
        vec!["rk2", "heun"]
    }
}

/// Fourth-order Runge-Kutta integrator (RK4)
///
/// ```text
/// k1 = f(t, y)
/// k2 = f(t + dt/2, y + k1*dt/2)
/// k3 = f(t + dt/2, y + k2*dt/2)
/// k4 = f(t + dt, y + k3*dt)
/// y(t+dt) = y(t) + dt/6 * (k1 + 2*k2 + 2*k3 + k4)
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RungeKuttaFourthOrder;

impl Integrator for RungeKuttaFourthOrder {
    fn clone_box(&self) -> Box<dyn Integrator> {
        Box::new(*self)
    }

    fn step(&self, particle: &mut ChargedParticle, fields: &FieldSet, t: Scalar, dt: Scalar) {
        let position = particle.position();
        let velocity = particle.velocity();
        let half_dt = dt * 0.5;

        // Stage 1: k1 at the current state
        let k1_x = velocity;
        let k1_v = fields.acceleration(particle, t);

        // Stage 2: k2 at the midpoint using k1
        let k2_x = velocity + k1_v * half_dt;
        let k2_v = stage_acceleration(particle, fields, position + k1_x * half_dt, k2_x, t + half_dt);

        // Stage 3: k3 at the midpoint using k2
        let k3_x = velocity + k2_v * half_dt;
        let k3_v = stage_acceleration(particle, fields, position + k2_x * half_dt, k3_x, t + half_dt);

        // Stage 4: k4 at the endpoint using k3
        let k4_x = velocity + k3_v * dt;
        let k4_v = stage_acceleration(particle, fields, position + k3_x * dt, k4_x, t + dt);

        particle.set_acceleration(k1_v);
        particle.set_position(position + (k1_x + k2_x * 2.0 + k3_x * 2.0 + k4_x) * (dt / 6.0));
        particle.set_velocity(velocity + (k1_v + k2_v * 2.0 + k3_v * 2.0 + k4_v) * (dt / 6.0));
    }

    fn convergence_order(&self) -> usize {
        4
    }

    fn name(&self) -> &'static str {
        "runge_kutta_fourth_order"
    }

    fn aliases(&self) -> Vec<&'static str> {
        vec!["rk4"]
    }
}
