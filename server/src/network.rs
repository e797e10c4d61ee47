//! Server network layer: TCP sessions that each drive one simulation

use crate::session_manager::SessionManager;
use crate::simulation::Simulation;
use log::{debug, error, info, warn};
use shared::{encode_frame, HandshakeError, InitMsg, InputFrame, INIT_RECORD_SIZE, INPUT_RECORD_SIZE};
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;

/// Ways a session can end early. All of them are fatal to that session only.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),
    #[error("handshake rejected: {0}")]
    Handshake(#[from] HandshakeError),
    #[error("malformed record: {0}")]
    Decode(#[from] bincode::Error),
    #[error("simulation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Limits applied to every connection
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    pub max_particles: u32,
    pub max_sessions: usize,
    /// Serve one session, then return from `run`
    pub once: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_particles: 1_000_000,
            max_sessions: 4,
            once: false,
        }
    }
}

/// Accepts driver connections and runs one simulation per connection
pub struct Server {
    listener: TcpListener,
    sessions: Arc<RwLock<SessionManager>>,
    config: ServerConfig,
}

impl Server {
    pub async fn bind(addr: &str, config: ServerConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Server {
            listener,
            sessions: Arc::new(RwLock::new(SessionManager::new(config.max_sessions))),
            config,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn sessions(&self) -> Arc<RwLock<SessionManager>> {
        Arc::clone(&self.sessions)
    }

    /// Accept loop. Returns after the first session when `once` is set,
    /// otherwise runs until the listener fails.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            let (stream, addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    continue;
                }
            };

            let session_id = {
                let mut sessions = self.sessions.write().await;
                sessions.add_session(addr)
            };
            let Some(session_id) = session_id else {
                warn!("Rejecting connection from {}: server full", addr);
                drop(stream);
                continue;
            };

            let sessions = Arc::clone(&self.sessions);
            let max_particles = self.config.max_particles;

            if self.config.once {
                run_session(stream, session_id, sessions, max_particles).await;
                info!("Single session finished, shutting down");
                return Ok(());
            }

            tokio::spawn(run_session(stream, session_id, sessions, max_particles));
        }
    }
}

/// Drives a session to completion and always releases its slot
async fn run_session(
    stream: TcpStream,
    session_id: u32,
    sessions: Arc<RwLock<SessionManager>>,
    max_particles: u32,
) {
    match serve_session(stream, session_id, &sessions, max_particles).await {
        Ok(()) => {}
        Err(SessionError::Handshake(e)) => warn!("Session {}: {}", session_id, e),
        Err(e) => error!("Session {} failed: {}", session_id, e),
    }

    let mut sessions = sessions.write().await;
    sessions.remove_session(session_id);
}

/// Reads the handshake, then exchanges one input record for one output record
/// until the driver hangs up.
async fn serve_session(
    mut stream: TcpStream,
    session_id: u32,
    sessions: &RwLock<SessionManager>,
    max_particles: u32,
) -> Result<(), SessionError> {
    stream.set_nodelay(true)?;

    let mut init_bytes = [0u8; INIT_RECORD_SIZE];
    stream.read_exact(&mut init_bytes).await?;
    let init = InitMsg::decode(&init_bytes)?;
    init.validate(max_particles)?;

    info!(
        "Session {}: {} particles in {}x{}",
        session_id, init.num_particles, init.width, init.height
    );
    sessions
        .write()
        .await
        .mark_handshake(session_id, init.num_particles);

    let mut simulation = tokio::task::spawn_blocking(move || {
        Simulation::new(
            init.num_particles as usize,
            init.width as f32,
            init.height as f32,
        )
    })
    .await?;

    let mut input_bytes = [0u8; INPUT_RECORD_SIZE];
    let mut output_bytes = Vec::new();

    loop {
        match stream.read_exact(&mut input_bytes).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                info!("Session {}: driver disconnected", session_id);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
        let input = InputFrame::decode(&input_bytes)?;

        let started = Instant::now();
        simulation = tokio::task::spawn_blocking(move || {
            simulation.step(&input);
            simulation
        })
        .await?;
        let step_time = started.elapsed();

        encode_frame(simulation.render_buffer(), &mut output_bytes);
        stream.write_all(&output_bytes).await?;

        let ticks = sessions.write().await.record_tick(session_id);

        // Periodic performance monitoring
        if ticks % 60 == 0 {
            debug!(
                "Session {} tick {}: step {:.2}ms, {} live particles, {} projectiles",
                session_id,
                ticks,
                step_time.as_secs_f64() * 1000.0,
                simulation.live_count(),
                simulation.projectiles().len()
            );
        }
    }
}
