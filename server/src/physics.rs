use crate::entity::Particle;
use shared::config::{GLOBAL_DAMP, MAX_SPEED};

///Fixed rectangular play area with toroidal edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Arena { width, height }
    }

    ///Returns true if the point lies inside the arena grown by `pad` on every side.
    pub fn contains_padded(&self, x: f32, y: f32, pad: f32) -> bool {
        x >= -pad && x <= self.width + pad && y >= -pad && y <= self.height + pad
    }

    ///Wraps a particle that left through one edge back in through the opposite one.
    pub fn wrap(&self, particle: &mut Particle) {
        if particle.x < 0.0 {
            particle.x += self.width;
        } else if particle.x >= self.width {
            particle.x -= self.width;
        }
        if particle.y < 0.0 {
            particle.y += self.height;
        } else if particle.y >= self.height {
            particle.y -= self.height;
        }
    }
}

///Damps, speed-limits and moves a particle by one step, then wraps it.
pub fn integrate(particle: &mut Particle, arena: Arena, dt: f32) {
    particle.vx *= GLOBAL_DAMP;
    particle.vy *= GLOBAL_DAMP;

    // Clamp velocity to max speed
    let speed2 = particle.vx * particle.vx + particle.vy * particle.vy;
    if speed2 > MAX_SPEED * MAX_SPEED {
        let scale = MAX_SPEED / speed2.sqrt();
        particle.vx *= scale;
        particle.vy *= scale;
    }

    particle.x += particle.vx * dt;
    particle.y += particle.vy * dt;

    arena.wrap(particle);
}
