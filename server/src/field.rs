//! Per-particle influence from projectiles and from the player's barrier.
//!
//! Projectiles are evaluated in list order. Purple projectiles are lethal on
//! contact and stop the pass for that particle; Blue and Red apply a bounded
//! radial force. The barrier then damps, shakes and pushes out any particle
//! inside its radius.

use crate::entity::Particle;
use crate::projectile::Projectile;
use crate::rng::Lcg;
use shared::config::{
    BARRIER_JITTER_MIN, BARRIER_POWER_MIN, BARRIER_PUSH_MIN, BARRIER_RADIUS_MIN, EPS,
    PROJECTILE_FIELD_MAX, PROJECTILE_FIELD_MIN, PROJECTILE_RADIUS_PURPLE,
};
use shared::{InputFrame, Technique};

fn floored(value: f32, min: f32) -> f32 {
    if value.is_finite() {
        value.max(min)
    } else {
        min
    }
}

/// Player-centered damping field, with its inputs already floored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barrier {
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
    pub power: f32,
    pub jitter: f32,
    pub push: f32,
}

impl Barrier {
    /// Returns the barrier described by `input`, or `None` when it is switched off.
    pub fn from_input(input: &InputFrame) -> Option<Self> {
        if !input.barrier_enabled() {
            return None;
        }
        if !input.player_x.is_finite() || !input.player_y.is_finite() {
            return None;
        }
        Some(Barrier {
            center_x: input.player_x,
            center_y: input.player_y,
            radius: floored(input.inf_radius, BARRIER_RADIUS_MIN),
            power: floored(input.inf_power, BARRIER_POWER_MIN),
            jitter: floored(input.inf_jitter, BARRIER_JITTER_MIN),
            push: floored(input.inf_push, BARRIER_PUSH_MIN),
        })
    }

    /// Applies damping, inward-velocity removal, jitter and push-out to a
    /// particle. Returns false if the particle was outside the radius.
    pub fn apply(&self, particle: &mut Particle, rng: &mut Lcg, dt: f32) -> bool {
        let radius2 = self.radius * self.radius;
        let dx = particle.x - self.center_x;
        let dy = particle.y - self.center_y;
        let dist2 = dx * dx + dy * dy + EPS;
        if dist2 >= radius2 {
            return false;
        }

        let dist = dist2.sqrt();
        let nx = dx / dist;
        let ny = dy / dist;
        let t = dist / self.radius;

        let damp = t.powf(self.power);
        particle.vx *= damp;
        particle.vy *= damp;

        let radial = particle.vx * nx + particle.vy * ny;
        if radial < 0.0 {
            particle.vx -= radial * nx;
            particle.vy -= radial * ny;
        }

        // Strongest near the player, fades to nothing at the rim
        let jx = (rng.next01() - 0.5) * 2.0;
        let jy = (rng.next01() - 0.5) * 2.0;
        let jitter = (1.0 - t) * self.jitter;
        particle.x += jx * jitter;
        particle.y += jy * jitter;

        let dx = particle.x - self.center_x;
        let dy = particle.y - self.center_y;
        let dist2 = dx * dx + dy * dy + EPS;
        if dist2 < radius2 {
            let dist = dist2.sqrt();
            let penetration = self.radius - dist;
            let correction = (penetration * self.push * dt).min(penetration);
            particle.x += dx / dist * correction;
            particle.y += dy / dist * correction;
        }
        true
    }
}

/// Clamps the field-strength scale from input into its allowed range.
pub fn field_scale(input: &InputFrame) -> f32 {
    if input.projectile_field.is_finite() {
        input
            .projectile_field
            .clamp(PROJECTILE_FIELD_MIN, PROJECTILE_FIELD_MAX)
    } else {
        PROJECTILE_FIELD_MIN
    }
}

/// Smooth bounded falloff, 1 at the center and 1/2 at `radius`.
pub fn falloff(dist: f32, radius: f32) -> f32 {
    let scaled = dist / radius;
    1.0 / (1.0 + scaled * scaled)
}

/// Runs every projectile against one particle.
///
/// Returns the list slot of the first lethal projectile, if one hit. Once a
/// particle is hit no later projectile touches it this tick.
pub fn apply_projectiles(
    particle: &mut Particle,
    projectiles: &[Projectile],
    field_scale: f32,
    dt: f32,
) -> Option<usize> {
    const PURPLE_RADIUS2: f32 = PROJECTILE_RADIUS_PURPLE * PROJECTILE_RADIUS_PURPLE;

    for (slot, projectile) in projectiles.iter().enumerate() {
        let dx = projectile.x - particle.x;
        let dy = projectile.y - particle.y;
        let dist2 = dx * dx + dy * dy + EPS;

        let Some(force) = projectile.technique.force() else {
            if dist2 < PURPLE_RADIUS2 {
                return Some(slot);
            }
            continue;
        };

        let dist = dist2.sqrt();
        let direction = match projectile.technique {
            Technique::Red => -1.0,
            _ => 1.0,
        };
        let strength = force * falloff(dist, projectile.technique.radius()) * field_scale;
        particle.vx += direction * strength * dx / dist * dt;
        particle.vy += direction * strength * dy / dist * dt;
    }
    None
}
