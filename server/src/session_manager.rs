//! Bookkeeping for driver connections.
//!
//! Every accepted TCP connection becomes a session with its own simulation.
//! The manager assigns session IDs, enforces the concurrent session limit and
//! keeps per-session counters for monitoring. Simulation state itself is
//! owned by the connection task, never by the manager.

use log::info;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// A connected driver and its progress
#[derive(Debug)]
pub struct Session {
    /// Unique session identifier assigned by the server
    pub id: u32,
    /// Peer address of the driver
    pub addr: SocketAddr,
    /// When the connection was accepted
    pub started: Instant,
    /// Particle count agreed in the handshake, zero until it completes
    pub num_particles: u32,
    /// Ticks simulated and sent so far
    pub ticks: u64,
}

impl Session {
    pub fn new(id: u32, addr: SocketAddr) -> Self {
        Self {
            id,
            addr,
            started: Instant::now(),
            num_particles: 0,
            ticks: 0,
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Average tick rate since the session started
    pub fn tick_rate(&self) -> f64 {
        let secs = self.uptime().as_secs_f64();
        if secs > 0.0 {
            self.ticks as f64 / secs
        } else {
            0.0
        }
    }
}

/// Tracks every live session and enforces the capacity limit
pub struct SessionManager {
    sessions: HashMap<u32, Session>,
    next_session_id: u32,
    max_sessions: usize,
}

impl SessionManager {
    /// Creates an empty manager. Session IDs start from 1.
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            next_session_id: 1,
            max_sessions,
        }
    }

    /// Registers a new connection.
    ///
    /// Returns None if the server is already running `max_sessions` simulations.
    pub fn add_session(&mut self, addr: SocketAddr) -> Option<u32> {
        if self.sessions.len() >= self.max_sessions {
            return None;
        }

        let session_id = self.next_session_id;
        self.next_session_id += 1;

        info!("Session {} opened from {}", session_id, addr);
        self.sessions.insert(session_id, Session::new(session_id, addr));

        Some(session_id)
    }

    /// Removes a session, returning it so the caller can log a summary
    pub fn remove_session(&mut self, session_id: u32) -> Option<Session> {
        let session = self.sessions.remove(&session_id)?;
        info!(
            "Session {} closed after {} ticks ({:.1}s, {:.1} ticks/s)",
            session.id,
            session.ticks,
            session.uptime().as_secs_f32(),
            session.tick_rate()
        );
        Some(session)
    }

    /// Records the particle count of a completed handshake
    pub fn mark_handshake(&mut self, session_id: u32, num_particles: u32) {
        if let Some(session) = self.sessions.get_mut(&session_id) {
            session.num_particles = num_particles;
        }
    }

    /// Counts one completed tick. Returns the session's new tick total.
    pub fn record_tick(&mut self, session_id: u32) -> u64 {
        match self.sessions.get_mut(&session_id) {
            Some(session) => {
                session.ticks += 1;
                session.ticks
            }
            None => 0,
        }
    }

    /// Total particles being simulated across all sessions
    pub fn total_particles(&self) -> u64 {
        self.sessions
            .values()
            .map(|session| session.num_particles as u64)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_addr() -> SocketAddr {
        "127.0.0.1:9999".parse().unwrap()
    }

    fn test_addr2() -> SocketAddr {
        "127.0.0.1:10000".parse().unwrap()
    }

    #[test]
    fn test_session_creation() {
        let session = Session::new(1, test_addr());
        assert_eq!(session.id, 1);
        assert_eq!(session.addr, test_addr());
        assert_eq!(session.ticks, 0);
        assert_eq!(session.num_particles, 0);
    }

    #[test]
    fn test_add_sessions() {
        let mut manager = SessionManager::new(4);
        assert!(manager.is_empty());

        assert_eq!(manager.add_session(test_addr()), Some(1));
        assert_eq!(manager.add_session(test_addr2()), Some(2));
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_capacity_limit() {
        let mut manager = SessionManager::new(1);
        assert!(manager.add_session(test_addr()).is_some());
        assert_eq!(manager.add_session(test_addr2()), None);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_remove_frees_capacity() {
        let mut manager = SessionManager::new(1);
        let id = manager.add_session(test_addr()).unwrap();
        let removed = manager.remove_session(id).unwrap();
        assert_eq!(removed.id, id);
        assert!(manager.remove_session(id).is_none());

        // IDs are never reused
        assert_eq!(manager.add_session(test_addr2()), Some(id + 1));
    }

    #[test]
    fn test_tick_and_handshake_counters() {
        let mut manager = SessionManager::new(2);
        let a = manager.add_session(test_addr()).unwrap();
        let b = manager.add_session(test_addr2()).unwrap();

        manager.mark_handshake(a, 1000);
        manager.mark_handshake(b, 250);
        assert_eq!(manager.total_particles(), 1250);

        assert_eq!(manager.record_tick(a), 1);
        assert_eq!(manager.record_tick(a), 2);
        assert_eq!(manager.record_tick(b), 1);
        assert_eq!(manager.record_tick(99), 0);

        assert_eq!(manager.remove_session(a).unwrap().ticks, 2);
        assert_eq!(manager.total_particles(), 250);
    }
}
