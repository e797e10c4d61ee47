//! # Swarm Driver Library
//!
//! This library provides a headless driver for the swarm server. It plays the
//! part of a frontend without drawing anything: it opens a session, streams
//! one scripted input record per tick and decodes every frame it gets back.
//!
//! ## Architecture Overview
//!
//! The server has no clock of its own, so the driver sets the pace. Each call
//! to [`network::Client::step`] sends exactly one input record and waits for
//! exactly one output record before the next tick begins.
//!
//! ## Module Organization
//!
//! ### Script Module (`script`)
//! Produces the player's input:
//! - A slow circular walk around the arena centre
//! - Periodic shots cycling through the three techniques
//! - Periodic barrier toggling with clamped tuning values
//!
//! ### Network Module (`network`)
//! Manages the connection to the server:
//! - TCP connection with Nagle disabled and the init record
//! - Per-tick exchange with optional simulated latency
//! - Frame decoding and periodic FPS reporting
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::Client;
//! use client::script::InputScript;
//! use shared::InitMsg;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let script = InputScript::new(800, 600, 1);
//!     let mut client =
//!         Client::connect("127.0.0.1:9999", InitMsg::new(800, 600, 5000), script, 0).await?;
//!     client.run(600).await?;
//!     Ok(())
//! }
//! ```

pub mod network;
pub mod script;
