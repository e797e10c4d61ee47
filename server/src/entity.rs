use crate::physics::Arena;
use crate::rng::Lcg;
use crate::routing::Route;
use shared::config::{DEAD_COORD, INIT_SPEED, RESPAWN_SPEED, SPAWN_MARGIN};

/// Kinematic state of one swarm particle
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

impl Particle {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32) -> Self {
        Particle { x, y, vx, vy }
    }

    /// Move to the off-screen dead coordinate and stop
    pub fn park(&mut self) {
        self.x = DEAD_COORD;
        self.y = DEAD_COORD;
        self.vx = 0.0;
        self.vy = 0.0;
    }

    pub fn is_parked(&self) -> bool {
        self.x == DEAD_COORD && self.y == DEAD_COORD
    }

    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }
}

/// Whether a particle is in play or sitting out a respawn cooldown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Liveness {
    Alive,
    Respawning { remaining: f32 },
}

impl Liveness {
    pub fn is_alive(&self) -> bool {
        matches!(self, Liveness::Alive)
    }

    pub fn remaining(&self) -> f32 {
        match self {
            Liveness::Alive => 0.0,
            Liveness::Respawning { remaining } => *remaining,
        }
    }

    /// Counts a cooldown down by `dt`. Returns true on the tick it runs out,
    /// after which the particle is alive again and must be respawned.
    pub fn advance(&mut self, dt: f32) -> bool {
        match *self {
            Liveness::Alive => false,
            Liveness::Respawning { remaining } => {
                let left = (remaining - dt).max(0.0);
                if left > 0.0 {
                    *self = Liveness::Respawning { remaining: left };
                    false
                } else {
                    *self = Liveness::Alive;
                    true
                }
            }
        }
    }
}

/// Place a particle anywhere in the arena with a small drift and a route around it
pub fn spawn_in_arena(rng: &mut Lcg, arena: Arena) -> (Particle, Route) {
    let x = rng.next01() * arena.width;
    let y = rng.next01() * arena.height;
    let vx = (rng.next01() - 0.5) * INIT_SPEED;
    let vy = (rng.next01() - 0.5) * INIT_SPEED;
    let route = Route::sample(rng, x, y);
    (Particle::new(x, y, vx, vy), route)
}

/// Place a particle just outside a random edge so it drifts back into view
pub fn spawn_at_edge(rng: &mut Lcg, arena: Arena) -> (Particle, Route) {
    let along_x = rng.next01() * arena.width;
    let along_y = rng.next01() * arena.height;
    let (x, y) = match rng.quadrant() {
        0 => (-SPAWN_MARGIN, along_y),
        1 => (arena.width + SPAWN_MARGIN, along_y),
        2 => (along_x, -SPAWN_MARGIN),
        _ => (along_x, arena.height + SPAWN_MARGIN),
    };
    let vx = (rng.next01() - 0.5) * RESPAWN_SPEED;
    let vy = (rng.next01() - 0.5) * RESPAWN_SPEED;
    let route = Route::sample(rng, x, y);
    (Particle::new(x, y, vx, vy), route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn arena() -> Arena {
        Arena::new(800.0, 600.0)
    }

    #[test]
    fn test_park() {
        let mut particle = Particle::new(10.0, 20.0, 3.0, -4.0);
        assert_approx_eq!(particle.speed(), 5.0);
        assert!(!particle.is_parked());

        particle.park();
        assert!(particle.is_parked());
        assert_eq!(particle.vx, 0.0);
        assert_eq!(particle.vy, 0.0);
    }

    #[test]
    fn test_liveness_countdown() {
        let mut liveness = Liveness::Respawning { remaining: 0.05 };
        assert!(!liveness.is_alive());

        assert!(!liveness.advance(0.02));
        assert_approx_eq!(liveness.remaining(), 0.03);
        assert!(!liveness.advance(0.02));
        assert!(liveness.advance(0.02));
        assert!(liveness.is_alive());
        assert_eq!(liveness.remaining(), 0.0);
    }

    #[test]
    fn test_alive_advance_is_noop() {
        let mut liveness = Liveness::Alive;
        assert!(!liveness.advance(1.0));
        assert_eq!(liveness, Liveness::Alive);
    }

    #[test]
    fn test_spawn_in_arena_bounds() {
        for index in 0..200 {
            let mut rng = Lcg::for_init(index);
            let (particle, route) = spawn_in_arena(&mut rng, arena());
            assert!(particle.x >= 0.0 && particle.x < 800.0);
            assert!(particle.y >= 0.0 && particle.y < 600.0);
            assert!(particle.vx.abs() <= INIT_SPEED / 2.0);
            assert!(particle.vy.abs() <= INIT_SPEED / 2.0);
            assert_eq!(route.center_x, particle.x);
            assert_eq!(route.center_y, particle.y);
        }
    }

    #[test]
    fn test_spawn_at_edge_is_outside() {
        for index in 0..200 {
            let mut rng = Lcg::for_respawn(index, 42);
            let (particle, route) = spawn_at_edge(&mut rng, arena());
            let on_vertical_edge = particle.x == -SPAWN_MARGIN || particle.x == 800.0 + SPAWN_MARGIN;
            let on_horizontal_edge =
                particle.y == -SPAWN_MARGIN || particle.y == 600.0 + SPAWN_MARGIN;
            assert!(on_vertical_edge || on_horizontal_edge);
            assert!(!particle.is_parked());
            assert_eq!(route.center_x, particle.x);
            assert_eq!(route.center_y, particle.y);
        }
    }
}
