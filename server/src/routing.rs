//! Default particle behaviour: a circular patrol around a fixed center.
//!
//! Each particle owns a [`Route`] whose target point slowly rotates on a
//! circle. Absent other influences the particle is pulled toward that target,
//! which gives the swarm purposeful motion instead of a uniform drift.

use crate::entity::Particle;
use crate::rng::Lcg;
use shared::config::{ROUTE_OMEGA_MAX, ROUTE_OMEGA_MIN, ROUTE_PULL, ROUTE_RADIUS_MAX, ROUTE_RADIUS_MIN};
use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Route {
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
    /// Current angle of the target on the circle, in radians.
    pub phase: f32,
    /// Signed angular velocity in radians per second.
    pub omega: f32,
}

impl Route {
    /// Draws radius, direction, speed and starting phase for a route centered
    /// on `(center_x, center_y)`.
    pub fn sample(rng: &mut Lcg, center_x: f32, center_y: f32) -> Self {
        let radius = rng.range(ROUTE_RADIUS_MIN, ROUTE_RADIUS_MAX);
        let mut omega = rng.range(ROUTE_OMEGA_MIN, ROUTE_OMEGA_MAX);
        if rng.coin() {
            omega = -omega;
        }
        let phase = rng.range(0.0, TAU);
        Route {
            center_x,
            center_y,
            radius,
            phase,
            omega,
        }
    }

    pub fn target(&self) -> (f32, f32) {
        (
            self.center_x + self.phase.cos() * self.radius,
            self.center_y + self.phase.sin() * self.radius,
        )
    }

    /// Rotates the target by one step and pulls the particle's velocity toward it.
    pub fn steer(&mut self, particle: &mut Particle, dt: f32) {
        self.phase += self.omega * dt;
        let (target_x, target_y) = self.target();
        particle.vx += (target_x - particle.x) * ROUTE_PULL * dt;
        particle.vy += (target_y - particle.y) * ROUTE_PULL * dt;
    }
}
