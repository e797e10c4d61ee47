//! Scripted player input for the headless driver

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::config::{
    PROJECTILE_FIELD_MAX, PROJECTILE_FIELD_MIN, PROJECTILE_SPEED_SCALE_MAX,
    PROJECTILE_SPEED_SCALE_MIN,
};
use shared::{InputFrame, Technique};
use std::f32::consts::TAU;

/// Player angular speed around the arena centre, radians per tick
const WALK_SPEED: f32 = 0.01;

/// Barrier and projectile settings sent with every input record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub radius: f32,
    pub power: f32,
    pub jitter: f32,
    pub push: f32,
    pub projectile_speed: f32,
    pub projectile_field: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            radius: 120.0,
            power: 2.0,
            jitter: 1.5,
            push: 1500.0,
            projectile_speed: 1.0,
            projectile_field: 1.0,
        }
    }
}

impl Tuning {
    /// Keeps every setting inside the range a player can dial in.
    pub fn clamped(self) -> Self {
        Self {
            radius: self.radius.clamp(20.0, 200.0),
            power: self.power.clamp(0.5, 6.0),
            jitter: self.jitter.clamp(0.0, 5.0),
            push: self.push.clamp(0.0, 5000.0),
            projectile_speed: self
                .projectile_speed
                .clamp(PROJECTILE_SPEED_SCALE_MIN, PROJECTILE_SPEED_SCALE_MAX),
            projectile_field: self
                .projectile_field
                .clamp(PROJECTILE_FIELD_MIN, PROJECTILE_FIELD_MAX),
        }
    }
}

/// Produces one input record per tick.
///
/// The player walks a slow circle around the arena centre, fires every
/// `fire_every` ticks in a random direction cycling Blue, Red, Purple, and
/// flips the barrier every `barrier_period` ticks.
pub struct InputScript {
    center_x: f32,
    center_y: f32,
    walk_radius: f32,
    tick: u64,
    fire_every: u64,
    barrier_period: u64,
    next_technique: Technique,
    barrier_on: bool,
    tuning: Tuning,
    rng: StdRng,
}

impl InputScript {
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        let (width, height) = (width as f32, height as f32);
        Self {
            center_x: width * 0.5,
            center_y: height * 0.5,
            walk_radius: width.min(height) * 0.25,
            tick: 0,
            fire_every: 20,
            barrier_period: 180,
            next_technique: Technique::Blue,
            barrier_on: false,
            tuning: Tuning::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning.clamped();
        self
    }

    /// Sets the firing and barrier cadence. Zero disables that action.
    pub fn with_cadence(mut self, fire_every: u64, barrier_period: u64) -> Self {
        self.fire_every = fire_every;
        self.barrier_period = barrier_period;
        self
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn next_frame(&mut self) -> InputFrame {
        let tick = self.tick;
        self.tick += 1;

        if self.barrier_period > 0 && tick > 0 && tick % self.barrier_period == 0 {
            self.barrier_on = !self.barrier_on;
            info!("Tick {}: barrier {}", tick, if self.barrier_on { "on" } else { "off" });
        }

        let angle = tick as f32 * WALK_SPEED;
        let mut frame = InputFrame {
            technique: self.next_technique.to_wire(),
            player_x: self.center_x + self.walk_radius * angle.cos(),
            player_y: self.center_y + self.walk_radius * angle.sin(),
            barrier_on: self.barrier_on as u32,
            inf_radius: self.tuning.radius,
            inf_power: self.tuning.power,
            inf_jitter: self.tuning.jitter,
            inf_push: self.tuning.push,
            projectile_speed: self.tuning.projectile_speed,
            projectile_field: self.tuning.projectile_field,
            ..Default::default()
        };

        if self.fire_every > 0 && tick % self.fire_every == 0 {
            let aim = self.rng.gen_range(0.0..TAU);
            frame.fire = 1;
            frame.dir_x = aim.cos();
            frame.dir_y = aim.sin();
            self.next_technique = self.next_technique.next();
        }

        frame
    }
}
