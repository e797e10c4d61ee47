//! Integration tests for the swarm server and driver
//!
//! These tests validate cross-component interactions and real network behavior.

use server::simulation::Simulation;
use shared::config::{
    DEAD_COORD, DT, EMPTY_PROJECTILE_SLOT, MAX_PROJECTILES, RESPAWN_MAX, SPAWN_MARGIN,
};
use shared::{decode_frame, encode_frame, output_len, InitMsg, InputFrame, Technique};

/// Shortest distance between two coordinates on a wrapping axis
fn toroidal_delta(a: f32, b: f32, size: f32) -> f32 {
    let d = (a - b).abs();
    d.min(size - d)
}

/// WIRE PROTOCOL TESTS
mod protocol_tests {
    use super::*;
    use shared::{HandshakeError, INIT_RECORD_SIZE, INPUT_RECORD_SIZE};

    /// The init record is four little-endian u32 words
    #[test]
    fn init_record_layout() {
        let bytes = InitMsg::new(800, 600, 5000).encode().unwrap();
        assert_eq!(bytes.len(), INIT_RECORD_SIZE);
        assert_eq!(&bytes[0..4], b"LMT1");
        assert_eq!(u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 800);
        assert_eq!(u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]), 600);
        assert_eq!(u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]), 5000);
    }

    /// The input record is thirteen little-endian 4-byte fields in wire order
    #[test]
    fn input_record_layout() {
        let input = InputFrame {
            technique: 3,
            player_x: 1.5,
            fire: 1,
            dir_y: -1.0,
            barrier_on: 1,
            projectile_field: 2.0,
            ..Default::default()
        };
        let bytes = input.encode().unwrap();
        assert_eq!(bytes.len(), INPUT_RECORD_SIZE);

        let word = |i: usize| [bytes[i * 4], bytes[i * 4 + 1], bytes[i * 4 + 2], bytes[i * 4 + 3]];
        assert_eq!(u32::from_le_bytes(word(0)), 3);
        assert_eq!(f32::from_le_bytes(word(1)), 1.5);
        assert_eq!(u32::from_le_bytes(word(3)), 1);
        assert_eq!(f32::from_le_bytes(word(5)), -1.0);
        assert_eq!(u32::from_le_bytes(word(6)), 1);
        assert_eq!(f32::from_le_bytes(word(12)), 2.0);
    }

    /// Handshakes are checked before any simulation is created
    #[test]
    fn handshake_validation() {
        assert!(InitMsg::new(800, 600, 1).validate(1000).is_ok());
        assert_eq!(
            InitMsg::new(800, 600, 0).validate(1000),
            Err(HandshakeError::NoParticles)
        );

        let mut bad = InitMsg::new(800, 600, 10);
        bad.magic = 0xDEAD_BEEF;
        assert!(matches!(bad.validate(1000), Err(HandshakeError::BadMagic { .. })));
    }

    /// An output record decodes back into positions and occupied slots
    #[test]
    fn simulation_frame_decodes() {
        let mut simulation = Simulation::with_workers(10, 500.0, 500.0, 2);
        let input = InputFrame {
            technique: Technique::Purple.to_wire(),
            fire: 1,
            dir_x: 0.0,
            dir_y: 1.0,
            ..InputFrame::idle(250.0, 250.0)
        };
        simulation.step(&input);

        let mut bytes = Vec::new();
        encode_frame(simulation.render_buffer(), &mut bytes);
        assert_eq!(bytes.len(), output_len(10) * 4);

        let view = decode_frame(&bytes, 10).unwrap();
        assert_eq!(view.particles.len(), 10);
        assert_eq!(view.projectiles.len(), 1);
        assert_eq!(view.projectiles[0].technique, Technique::Purple);
        assert!(decode_frame(&bytes[1..], 10).is_err());
    }
}

/// ENGINE SCENARIO TESTS
mod engine_tests {
    use super::*;

    /// A single particle drifts by a small amount on an idle tick
    #[test]
    fn idle_tick_moves_particle_slightly() {
        let mut simulation = Simulation::new(1, 100.0, 100.0);
        let before = *simulation.particle(0).unwrap();

        simulation.step(&InputFrame::idle(50.0, 50.0));

        let buffer = simulation.render_buffer();
        assert_eq!(buffer.len(), 2 + MAX_PROJECTILES * 3);
        assert!(toroidal_delta(buffer[0], before.x, 100.0) < 2.0);
        assert!(toroidal_delta(buffer[1], before.y, 100.0) < 2.0);
        assert!(buffer[0] >= 0.0 && buffer[0] < 100.0);
        assert!(buffer[1] >= 0.0 && buffer[1] < 100.0);
        for slot in buffer[2..].chunks_exact(3) {
            assert_eq!(slot, EMPTY_PROJECTILE_SLOT);
        }
    }

    /// A purple hit parks the particle, which returns within the cooldown
    #[test]
    fn purple_kill_then_respawn() {
        let mut simulation = Simulation::with_workers(1, 400.0, 400.0, 1);
        let target = *simulation.particle(0).unwrap();

        let shot = InputFrame {
            technique: Technique::Purple.to_wire(),
            fire: 1,
            dir_x: 1.0,
            projectile_speed: 2.0,
            ..InputFrame::idle(target.x, target.y)
        };
        simulation.step(&shot);
        assert_eq!(simulation.render_buffer()[0], DEAD_COORD);
        assert_eq!(simulation.render_buffer()[1], DEAD_COORD);
        assert_eq!(simulation.live_count(), 0);

        let max_ticks = (RESPAWN_MAX / DT).ceil() as usize + 1;
        let mut respawned_after = None;
        for tick in 1..=max_ticks {
            simulation.step(&InputFrame::idle(200.0, 200.0));
            if simulation.liveness(0).unwrap().is_alive() {
                respawned_after = Some(tick);
                break;
            }
            assert_eq!(simulation.render_buffer()[0], DEAD_COORD);
        }

        let ticks = respawned_after.expect("particle never respawned");
        assert!(ticks >= 14, "respawned too early: {}", ticks);
        assert!(simulation.projectiles().is_empty());
        let buffer = simulation.render_buffer();
        assert_ne!(buffer[0], DEAD_COORD);
        assert!(buffer[0] >= 0.0 && buffer[0] < 400.0);
        assert!(buffer[1] >= 0.0 && buffer[1] < 400.0);

        // Respawns just outside an edge, so after one step and a wrap one
        // coordinate sits about SPAWN_MARGIN from its nearest edge
        let gap_x = buffer[0].min(400.0 - buffer[0]);
        let gap_y = buffer[1].min(400.0 - buffer[1]);
        let near_edge = |gap: f32| (gap - SPAWN_MARGIN).abs() < 2.0;
        assert!(
            near_edge(gap_x) || near_edge(gap_y),
            "respawned at ({}, {}), away from every edge",
            buffer[0],
            buffer[1]
        );
    }

    /// Barrier settings have no effect while the barrier is off
    #[test]
    fn barrier_settings_ignored_when_off() {
        let mut plain = Simulation::new(200, 300.0, 300.0);
        let mut tuned = Simulation::new(200, 300.0, 300.0);

        for _ in 0..60 {
            plain.step(&InputFrame::idle(150.0, 150.0));
            tuned.step(&InputFrame {
                inf_radius: 250.0,
                inf_power: 6.0,
                inf_jitter: 5.0,
                inf_push: 5000.0,
                ..InputFrame::idle(150.0, 150.0)
            });
        }
        assert_eq!(plain.render_buffer(), tuned.render_buffer());
    }

    /// A raised barrier keeps particles near its rim or outside it
    #[test]
    fn barrier_clears_player_area() {
        let size = 2000.0;
        let mut simulation = Simulation::new(500, size, size);
        let (px, py) = (1000.0, 1000.0);
        let radius = 200.0;

        let input = InputFrame {
            barrier_on: 1,
            inf_radius: radius,
            inf_power: 0.5,
            inf_jitter: 0.0,
            inf_push: 5000.0,
            ..InputFrame::idle(px, py)
        };
        for _ in 0..10 {
            simulation.step(&input);
        }

        for pair in simulation.render_buffer()[..1000].chunks_exact(2) {
            let dx = toroidal_delta(pair[0], px, size);
            let dy = toroidal_delta(pair[1], py, size);
            assert!((dx * dx + dy * dy).sqrt() > radius - 5.0);
        }
    }

    /// Firing every tick never exceeds the projectile limit
    #[test]
    fn projectile_limit_respected() {
        let mut simulation = Simulation::new(20, 4000.0, 4000.0);
        for tick in 0..40 {
            simulation.step(&InputFrame {
                technique: Technique::ALL[tick % 3].to_wire(),
                fire: 1,
                dir_x: 0.0,
                dir_y: 1.0,
                projectile_speed: 0.2,
                ..InputFrame::idle(2000.0, 100.0)
            });
        }
        assert_eq!(simulation.projectiles().len(), MAX_PROJECTILES);

        let view = {
            let mut bytes = Vec::new();
            encode_frame(simulation.render_buffer(), &mut bytes);
            decode_frame(&bytes, 20).unwrap()
        };
        assert_eq!(view.projectiles.len(), MAX_PROJECTILES);
        assert_eq!(view.projectiles[0].technique, Technique::Blue);
        assert_eq!(view.projectiles[1].technique, Technique::Red);
    }

    /// Malformed input never fires or corrupts the swarm
    #[test]
    fn malformed_input_is_harmless() {
        let mut simulation = Simulation::new(50, 300.0, 300.0);
        let inputs = [
            InputFrame { technique: 9, fire: 1, dir_x: 1.0, ..InputFrame::idle(10.0, 10.0) },
            InputFrame { fire: 1, dir_x: f32::NAN, ..InputFrame::idle(10.0, 10.0) },
            InputFrame { fire: 1, ..InputFrame::idle(10.0, 10.0) },
            InputFrame { fire: 1, dir_x: 1.0, ..InputFrame::idle(f32::INFINITY, 10.0) },
        ];
        for input in &inputs {
            simulation.step(input);
        }

        assert!(simulation.projectiles().is_empty());
        assert!(simulation.render_buffer().iter().all(|v| v.is_finite()));
    }
}

/// NETWORK SESSION TESTS
mod session_tests {
    use super::*;
    use client::network::Client;
    use client::script::InputScript;
    use server::network::{Server, ServerConfig};
    use std::time::Duration;

    /// The driver runs a full scripted session against a real server
    #[tokio::test]
    async fn driver_session_against_server() {
        let config = ServerConfig {
            once: true,
            ..ServerConfig::default()
        };
        let server = Server::bind("127.0.0.1:0", config).await.unwrap();
        let addr = server.local_addr().unwrap().to_string();
        let handle = tokio::spawn(async move { server.run().await.is_ok() });

        {
            let script = InputScript::new(640, 480, 3).with_cadence(5, 30);
            let mut client = Client::connect(&addr, InitMsg::new(640, 480, 300), script, 0)
                .await
                .unwrap();
            let ticks = client.run(90).await.unwrap();
            assert_eq!(ticks, 90);

            let frame = client.step().await.unwrap().unwrap();
            assert_eq!(frame.particles.len(), 300);
            assert!(frame.projectiles.len() <= MAX_PROJECTILES);
            assert!(frame.live_particles() <= 300);
        }

        // A once-only server returns after its session ends
        let finished = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("server did not shut down")
            .unwrap();
        assert!(finished);
    }

    /// A rejected handshake ends the session before any frame is sent
    #[tokio::test]
    async fn oversized_session_rejected() {
        let config = ServerConfig {
            max_particles: 100,
            ..ServerConfig::default()
        };
        let server = Server::bind("127.0.0.1:0", config).await.unwrap();
        let addr = server.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let _ = server.run().await;
        });

        let script = InputScript::new(100, 100, 0);
        let mut client = Client::connect(&addr, InitMsg::new(100, 100, 101), script, 0)
            .await
            .unwrap();
        assert!(client.step().await.unwrap().is_none());
        assert_eq!(client.ticks(), 0);
    }
}
