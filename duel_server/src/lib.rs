//! `duel_server`
//!
//! Server-side systems:
//! - Two-slot registry and per-slot latest report
//! - Combat resolution over the shared health pool
//! - Restart vote arbitration
//! - UDP request/reply loop
//!
//! Networking model:
//! - UDP only: every inbound datagram is answered synchronously with at
//!   most one reply computed from the match state.

pub mod match_state;
pub mod server;

pub use match_state::{MatchPhase, MatchState};
pub use server::MatchServer;
