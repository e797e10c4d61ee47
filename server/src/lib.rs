//! # Swarm Server Library
//!
//! This library provides the simulation engine and TCP transport for the
//! Limitless particle swarm. A driver connects, announces an arena and a
//! particle count, then exchanges one input record for one output record per
//! tick. The server owns the authoritative swarm state; the driver only
//! renders what it is sent.
//!
//! ## Core Responsibilities
//!
//! ### Swarm Simulation
//! Thousands of particles patrol circular routes, are pulled and pushed by
//! player projectiles, are slowed and shaken by the player's barrier, and
//! are killed by lethal projectiles before respawning at the arena edge.
//!
//! ### Output Packing
//! Every tick produces one flat `f32` buffer of fixed length: particle
//! positions followed by a fixed number of projectile slots. The layout never
//! changes during a session.
//!
//! ### Session Management
//! Each connection gets a fresh simulation. Sessions are counted and limited,
//! and a failed session never affects any other.
//!
//! ## Architecture Design
//!
//! ### One Tick Per Request
//! The server has no clock of its own. Each input record received advances
//! the simulation by exactly one fixed step and is answered by exactly one
//! output record, so the driver paces the simulation.
//!
//! ### Data-Parallel Particle Pass
//! Projectiles are spawned and advanced sequentially, then the particle
//! update runs across the rayon pool with one contiguous index range per
//! worker. Randomness is derived per particle from its index and the frame
//! counter, so results do not depend on the number of workers.
//!
//! ## Module Organization
//!
//! ### Simulation Module (`simulation`)
//! The frame driver and output packer.
//!
//! ### Entity, Routing and Physics Modules (`entity`, `routing`, `physics`)
//! Particle state and lifecycle, patrol routes, and integration with
//! toroidal wrapping.
//!
//! ### Projectile and Field Modules (`projectile`, `field`)
//! The bounded projectile list, the projectile force/kill pass and the
//! player barrier.
//!
//! ### Network and Session Modules (`network`, `session_manager`)
//! The TCP accept loop, per-connection handshake and tick exchange, and
//! session bookkeeping.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::bind("127.0.0.1:9999", ServerConfig::default()).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! The engine can also be driven directly:
//!
//! ```rust
//! use server::simulation::Simulation;
//! use shared::InputFrame;
//!
//! let mut swarm = Simulation::new(1000, 800.0, 600.0);
//! swarm.step(&InputFrame::idle(400.0, 300.0));
//! assert_eq!(swarm.render_buffer().len(), shared::output_len(1000));
//! ```

pub mod entity;
pub mod field;
pub mod network;
pub mod physics;
pub mod projectile;
pub mod rng;
pub mod routing;
pub mod session_manager;
pub mod simulation;
