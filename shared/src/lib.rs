//! Types shared by the swarm server, its driver client and the workspace tests:
//! engine constants and the binary wire records.

pub mod config;
pub mod protocol;

pub use protocol::{
    decode_frame, encode_frame, output_len, FrameError, FrameView, HandshakeError, InitMsg,
    InputFrame, ProjectileSnapshot, Technique, INIT_RECORD_SIZE, INPUT_RECORD_SIZE,
};
