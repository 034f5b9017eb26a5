//! `duel_client`
//!
//! Client-side systems, network half only:
//! - Registration handshake over the unreliable channel
//! - Per-tick state report sending
//! - Non-blocking view polling with last-known-view retention
//! - Scripted sparring behavior for the headless demo binary
//!
//! Rendering and input capture live with the presentation layer, not
//! here; this crate stops at the datagram boundary.

pub mod client;
pub mod script;
pub mod view;

pub use client::MatchClient;
