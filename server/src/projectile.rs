//! Player projectiles: spawning from input, aging and culling.
//!
//! The live list is double-buffered. Each advance writes survivors into the
//! spare buffer and swaps, so culling never removes from the list being
//! iterated and both buffers keep their capacity across ticks.

use crate::physics::Arena;
use shared::config::{
    AIM_EPS, MAX_PROJECTILES, PROJECTILE_SPEED_SCALE_MAX, PROJECTILE_SPEED_SCALE_MIN,
};
use shared::{InputFrame, Technique};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Seconds since spawn.
    pub life: f32,
    pub technique: Technique,
}

impl Projectile {
    /// Moves and ages the projectile by one step. Returns whether it is still in play.
    fn advance(&mut self, arena: Arena, dt: f32) -> bool {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.life += dt;
        self.life < self.technique.max_life()
            && arena.contains_padded(self.x, self.y, self.technique.radius())
    }
}

/// Clamps the speed scale from input into its allowed range.
pub fn speed_scale(input: &InputFrame) -> f32 {
    if input.projectile_speed.is_finite() {
        input
            .projectile_speed
            .clamp(PROJECTILE_SPEED_SCALE_MIN, PROJECTILE_SPEED_SCALE_MAX)
    } else {
        PROJECTILE_SPEED_SCALE_MIN
    }
}

#[derive(Debug, Clone)]
pub struct ProjectileList {
    live: Vec<Projectile>,
    spare: Vec<Projectile>,
}

impl Default for ProjectileList {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectileList {
    pub fn new() -> Self {
        ProjectileList {
            live: Vec::with_capacity(MAX_PROJECTILES),
            spare: Vec::with_capacity(MAX_PROJECTILES),
        }
    }

    pub fn as_slice(&self) -> &[Projectile] {
        &self.live
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.live.len() >= MAX_PROJECTILES
    }

    /// Fires one projectile from the player position if the input asks for it
    /// and can be honoured. Returns the technique fired, if any.
    pub fn spawn(&mut self, input: &InputFrame) -> Option<Technique> {
        if !input.fires() || self.is_full() {
            return None;
        }
        let technique = input.technique()?;

        let (dir_x, dir_y) = (input.dir_x, input.dir_y);
        if !dir_x.is_finite() || !dir_y.is_finite() {
            return None;
        }
        let len = dir_x.hypot(dir_y);
        if len * len <= AIM_EPS {
            return None;
        }
        if !input.player_x.is_finite() || !input.player_y.is_finite() {
            return None;
        }

        // Rescale by the larger component so huge aims normalize without overflow
        let largest = dir_x.abs().max(dir_y.abs());
        let (sx, sy) = (dir_x / largest, dir_y / largest);
        let unit = sx.hypot(sy);
        let speed = technique.speed() * speed_scale(input);
        self.live.push(Projectile {
            x: input.player_x,
            y: input.player_y,
            vx: sx / unit * speed,
            vy: sy / unit * speed,
            life: 0.0,
            technique,
        });
        Some(technique)
    }

    /// Advances every projectile and keeps the survivors, in order.
    pub fn advance(&mut self, arena: Arena, dt: f32) {
        if self.live.is_empty() {
            return;
        }

        self.spare.clear();
        for projectile in &self.live {
            let mut next = *projectile;
            if next.advance(arena, dt) {
                self.spare.push(next);
            }
        }
        std::mem::swap(&mut self.live, &mut self.spare);
    }
}
