//! Wire records exchanged between the swarm server and its driver.
//!
//! Both request records are fixed-size and encoded field by field in declared
//! order as little-endian fixed-width scalars (bincode's default fixint
//! configuration), so their byte layout never depends on struct layout.
//! The response is a flat run of little-endian `f32`s whose length is implied
//! by the particle count agreed in the init record.

use crate::config::{
    DEAD_COORD, INIT_MAGIC, MAX_PROJECTILES, PROJECTILE_FORCE_BLUE, PROJECTILE_FORCE_RED,
    PROJECTILE_LIFE_BLUE, PROJECTILE_LIFE_PURPLE, PROJECTILE_LIFE_RED, PROJECTILE_RADIUS_BLUE,
    PROJECTILE_RADIUS_PURPLE, PROJECTILE_RADIUS_RED, PROJECTILE_SPEED_BLUE,
    PROJECTILE_SPEED_PURPLE, PROJECTILE_SPEED_RED,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const INIT_RECORD_SIZE: usize = 16;
pub const INPUT_RECORD_SIZE: usize = 52;

/// Projectile category chosen by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Technique {
    /// Attracts nearby particles.
    Blue,
    /// Repels nearby particles.
    Red,
    /// Kills particles it touches.
    Purple,
}

impl Technique {
    pub const ALL: [Technique; 3] = [Technique::Blue, Technique::Red, Technique::Purple];

    /// Maps a wire value to a technique; anything other than 1, 2 or 3 is rejected.
    pub fn from_wire(value: u32) -> Option<Self> {
        match value {
            1 => Some(Technique::Blue),
            2 => Some(Technique::Red),
            3 => Some(Technique::Purple),
            _ => None,
        }
    }

    pub fn to_wire(self) -> u32 {
        match self {
            Technique::Blue => 1,
            Technique::Red => 2,
            Technique::Purple => 3,
        }
    }

    pub fn speed(self) -> f32 {
        match self {
            Technique::Blue => PROJECTILE_SPEED_BLUE,
            Technique::Red => PROJECTILE_SPEED_RED,
            Technique::Purple => PROJECTILE_SPEED_PURPLE,
        }
    }

    /// Radius of effect, also used to pad the arena bounds when culling.
    pub fn radius(self) -> f32 {
        match self {
            Technique::Blue => PROJECTILE_RADIUS_BLUE,
            Technique::Red => PROJECTILE_RADIUS_RED,
            Technique::Purple => PROJECTILE_RADIUS_PURPLE,
        }
    }

    pub fn max_life(self) -> f32 {
        match self {
            Technique::Blue => PROJECTILE_LIFE_BLUE,
            Technique::Red => PROJECTILE_LIFE_RED,
            Technique::Purple => PROJECTILE_LIFE_PURPLE,
        }
    }

    /// Base field force, or `None` for the lethal technique.
    pub fn force(self) -> Option<f32> {
        match self {
            Technique::Blue => Some(PROJECTILE_FORCE_BLUE),
            Technique::Red => Some(PROJECTILE_FORCE_RED),
            Technique::Purple => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Technique::Blue => Technique::Red,
            Technique::Red => Technique::Purple,
            Technique::Purple => Technique::Blue,
        }
    }
}

/// Reasons a session is refused before the simulation starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandshakeError {
    #[error("bad init magic {found:#010x}, expected {expected:#010x}")]
    BadMagic { found: u32, expected: u32 },
    #[error("particle count must be positive")]
    NoParticles,
    #[error("particle count {requested} exceeds the limit of {limit}")]
    TooManyParticles { requested: u32, limit: u32 },
    #[error("arena must have a non-zero size, got {width}x{height}")]
    EmptyArena { width: u32, height: u32 },
}

/// Errors raised while splitting an output record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("output frame is {found} bytes, expected {expected}")]
    Length { expected: usize, found: usize },
}

/// Session handshake, sent once by the driver right after connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitMsg {
    pub magic: u32,
    pub width: u32,
    pub height: u32,
    pub num_particles: u32,
}

impl InitMsg {
    pub fn new(width: u32, height: u32, num_particles: u32) -> Self {
        Self {
            magic: INIT_MAGIC,
            width,
            height,
            num_particles,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    /// Checks the handshake against the server's limits.
    pub fn validate(&self, max_particles: u32) -> Result<(), HandshakeError> {
        if self.magic != INIT_MAGIC {
            return Err(HandshakeError::BadMagic {
                found: self.magic,
                expected: INIT_MAGIC,
            });
        }
        if self.num_particles == 0 {
            return Err(HandshakeError::NoParticles);
        }
        if self.num_particles > max_particles {
            return Err(HandshakeError::TooManyParticles {
                requested: self.num_particles,
                limit: max_particles,
            });
        }
        if self.width == 0 || self.height == 0 {
            return Err(HandshakeError::EmptyArena {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Per-tick player input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct InputFrame {
    pub technique: u32,
    pub player_x: f32,
    pub player_y: f32,
    pub fire: u32,
    pub dir_x: f32,
    pub dir_y: f32,
    pub barrier_on: u32,
    pub inf_radius: f32,
    pub inf_power: f32,
    pub inf_jitter: f32,
    pub inf_push: f32,
    pub projectile_speed: f32,
    pub projectile_field: f32,
}

impl InputFrame {
    /// A frame that neither fires nor raises the barrier.
    pub fn idle(player_x: f32, player_y: f32) -> Self {
        Self {
            technique: Technique::Blue.to_wire(),
            player_x,
            player_y,
            projectile_speed: 1.0,
            projectile_field: 1.0,
            ..Default::default()
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    pub fn technique(&self) -> Option<Technique> {
        Technique::from_wire(self.technique)
    }

    pub fn fires(&self) -> bool {
        self.fire != 0
    }

    pub fn barrier_enabled(&self) -> bool {
        self.barrier_on != 0
    }
}

/// Number of floats in one output record.
pub fn output_len(num_particles: usize) -> usize {
    num_particles * 2 + MAX_PROJECTILES * 3
}

/// Serializes an output buffer into `out`, reusing its allocation.
pub fn encode_frame(buffer: &[f32], out: &mut Vec<u8>) {
    out.clear();
    out.reserve(buffer.len() * 4);
    for value in buffer {
        out.extend_from_slice(&value.to_le_bytes());
    }
}

/// One projectile slot of an output record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSnapshot {
    pub x: f32,
    pub y: f32,
    pub technique: Technique,
}

/// Decoded view of one output record.
#[derive(Debug, Clone, Default)]
pub struct FrameView {
    pub particles: Vec<(f32, f32)>,
    /// Occupied projectile slots only, in slot order.
    pub projectiles: Vec<ProjectileSnapshot>,
}

impl FrameView {
    /// Particles not parked at the dead coordinate.
    pub fn live_particles(&self) -> usize {
        self.particles
            .iter()
            .filter(|(x, y)| *x != DEAD_COORD || *y != DEAD_COORD)
            .count()
    }
}

/// Splits an output record into particle positions and projectile snapshots.
pub fn decode_frame(bytes: &[u8], num_particles: usize) -> Result<FrameView, FrameError> {
    let expected = output_len(num_particles) * 4;
    if bytes.len() != expected {
        return Err(FrameError::Length {
            expected,
            found: bytes.len(),
        });
    }

    let floats: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    let (particle_part, projectile_part) = floats.split_at(num_particles * 2);

    let particles = particle_part.chunks_exact(2).map(|p| (p[0], p[1])).collect();
    let projectiles = projectile_part
        .chunks_exact(3)
        .filter_map(|slot| {
            Technique::from_wire(slot[2] as u32).map(|technique| ProjectileSnapshot {
                x: slot[0],
                y: slot[1],
                technique,
            })
        })
        .collect();

    Ok(FrameView {
        particles,
        projectiles,
    })
}
