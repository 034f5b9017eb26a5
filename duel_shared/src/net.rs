//! Networking primitives.
//!
//! Goals:
//! - One JSON message per datagram, explicit tagged variants.
//! - Reject anything that does not decode into a known shape.
//! - Keep serialization explicit and versionable.
//!
//! The transport is UDP only: the protocol is request/reply per datagram
//! and tolerates loss, so there is no reliable channel.

use anyhow::Context;
use bytes::Bytes;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::{net::UdpSocket, time};
use tracing::debug;

/// One of the two fixed player identities, bound to an endpoint for the
/// life of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot(pub u8);

impl Slot {
    pub const ZERO: Slot = Slot(0);
    pub const ONE: Slot = Slot(1);

    /// The other slot in a two-player match.
    pub fn opponent(self) -> Slot {
        Slot(1 - self.0)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One player's per-tick snapshot. Each report replaces the previous one
/// wholesale; the server keeps no history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateReport {
    pub x: i32,
    pub y: i32,
    pub is_jumping: bool,
    pub is_attacking: bool,
    /// Absent on the wire means not guarding.
    #[serde(default)]
    pub is_guarding: bool,
    pub moving: bool,
    /// Fractional animation frame; the receiver uses it mod sequence
    /// length.
    pub frame: f32,
}

/// The server-computed reply to one state report: the opponent's latest
/// state plus both healths and the derived outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentView {
    pub x: i32,
    pub y: i32,
    pub is_jumping: bool,
    pub is_attacking: bool,
    pub is_guarding: bool,
    pub moving: bool,
    pub frame: f32,
    /// Opponent's current health.
    pub health: i32,
    /// The recipient's own current health.
    pub my_health: i32,
    pub game_over: bool,
    /// 0 = undecided, 1 = slot 0 wins, 2 = slot 1 wins.
    pub winner: u8,
}

/// Client -> server datagrams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClientMsg {
    // ─── Handshake ───
    /// First-contact marker; requests a slot.
    Register,

    // ─── Match control ───
    /// Casts the sender's restart vote. Never answered.
    Restart,

    // ─── Gameplay ───
    /// Per-tick state snapshot.
    Report(StateReport),
}

/// Server -> client datagrams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ServerMsg {
    /// Reply to a registration: the assigned slot.
    Registered { slot: Slot },
    /// Reply to a state report once both slots have reported.
    View(OpponentView),
}

/// Client side of the unreliable channel.
#[derive(Debug)]
pub struct UnreliableConn {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl UnreliableConn {
    pub async fn connect(bind_addr: SocketAddr, peer: SocketAddr) -> anyhow::Result<Self> {
        let socket = UdpSocket::bind(bind_addr).await.context("udp bind")?;
        socket.connect(peer).await.context("udp connect")?;
        Ok(Self { socket, peer })
    }

    pub async fn send(&self, msg: &ClientMsg) -> anyhow::Result<()> {
        let payload = serde_json::to_vec(msg).context("serialize udp msg")?;
        self.socket.send(&payload).await.context("udp send")?;
        Ok(())
    }

    /// Receives a datagram within the given timeout.
    pub async fn recv_timeout(&self, timeout: Duration) -> anyhow::Result<Option<ServerMsg>> {
        let mut buf = vec![0u8; 64 * 1024];
        match time::timeout(timeout, self.socket.recv(&mut buf)).await {
            Ok(Ok(n)) => {
                let msg = serde_json::from_slice(&buf[..n]).context("deserialize udp msg")?;
                Ok(Some(msg))
            }
            Ok(Err(e)) => Err(e).context("udp recv")?,
            Err(_) => Ok(None),
        }
    }

    /// Non-blocking receive for the per-frame poll. Undecodable
    /// datagrams are dropped, not surfaced.
    pub fn try_recv(&self) -> anyhow::Result<Option<ServerMsg>> {
        let mut buf = vec![0u8; 64 * 1024];
        match self.socket.try_recv(&mut buf) {
            Ok(n) => match serde_json::from_slice(&buf[..n]) {
                Ok(msg) => Ok(Some(msg)),
                Err(e) => {
                    debug!(error = %e, "Dropping undecodable datagram");
                    Ok(None)
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e).context("udp recv")?,
        }
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}

/// Convenience codec helpers.
pub fn encode_to_bytes<T: Serialize>(msg: &T) -> anyhow::Result<Bytes> {
    let payload = serde_json::to_vec(msg).context("serialize")?;
    Ok(Bytes::from(payload))
}

pub fn decode_from_bytes<T: DeserializeOwned>(b: &[u8]) -> anyhow::Result<T> {
    serde_json::from_slice(b).context("deserialize")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> StateReport {
        StateReport {
            x: 120,
            y: 340,
            is_jumping: false,
            is_attacking: true,
            is_guarding: false,
            moving: true,
            frame: 2.5,
        }
    }

    #[test]
    fn client_msg_roundtrip_bytes() {
        let msg = ClientMsg::Report(sample_report());
        let bytes = encode_to_bytes(&msg).unwrap();
        let back: ClientMsg = decode_from_bytes(&bytes).unwrap();
        assert_eq!(msg, back);
    }

    #[test]
    fn report_uses_camel_case_keys() {
        let json = serde_json::to_string(&sample_report()).unwrap();
        assert!(json.contains("\"isJumping\""), "json: {json}");
        assert!(json.contains("\"isGuarding\""), "json: {json}");
        assert!(!json.contains("is_jumping"), "json: {json}");
    }

    #[test]
    fn guarding_defaults_to_false() {
        let json = r#"{"x":1,"y":2,"isJumping":false,"isAttacking":false,"moving":true,"frame":0.0}"#;
        let report: StateReport = decode_from_bytes(json.as_bytes()).unwrap();
        assert!(!report.is_guarding);
    }

    #[test]
    fn report_missing_required_key_is_rejected() {
        // No `x` field.
        let json = r#"{"Report":{"y":2,"isJumping":false,"isAttacking":false,"moving":true,"frame":0.0}}"#;
        assert!(decode_from_bytes::<ClientMsg>(json.as_bytes()).is_err());
    }

    #[test]
    fn arbitrary_json_is_rejected() {
        assert!(decode_from_bytes::<ClientMsg>(b"{\"hello\":1}").is_err());
        assert!(decode_from_bytes::<ClientMsg>(b"not json").is_err());
    }

    #[test]
    fn slot_opponent_flips() {
        assert_eq!(Slot::ZERO.opponent(), Slot::ONE);
        assert_eq!(Slot::ONE.opponent(), Slot::ZERO);
    }
}
