//! Server implementation.
//!
//! One UDP socket, one task: receive a datagram, decode it, feed it to
//! the owned [`MatchState`], send back whatever reply it produced. Each
//! datagram is fully processed before the next is read, so the match
//! state needs no locking.
//!
//! Malformed datagrams are dropped; nothing a peer sends can terminate
//! the loop.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::Context;
use duel_shared::{config::MatchConfig, net::ClientMsg};
use tokio::net::UdpSocket;
use tracing::debug;

use crate::match_state::MatchState;

/// UDP front end around the authoritative match state.
pub struct MatchServer {
    pub cfg: MatchConfig,
    udp: UdpSocket,
    state: MatchState,
}

impl MatchServer {
    /// Binds the server socket.
    pub async fn bind(cfg: MatchConfig) -> anyhow::Result<Self> {
        let addr: SocketAddr = cfg.server_addr.parse().context("parse server_addr")?;
        let udp = UdpSocket::bind(addr).await.context("udp bind")?;
        Ok(Self {
            cfg,
            udp,
            state: MatchState::new(),
        })
    }

    /// Returns the local address (after binding).
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.udp.local_addr()?)
    }

    /// Read-only view of the match state (status output, tests).
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Serves datagrams until the task is cancelled.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.process_one().await?;
        }
    }

    /// Receives and fully processes a single datagram: decode, mutate
    /// state, send at most one reply.
    pub async fn process_one(&mut self) -> anyhow::Result<()> {
        let mut buf = vec![0u8; 64 * 1024];
        let (n, from) = self.udp.recv_from(&mut buf).await.context("udp recv")?;

        let msg: ClientMsg = match serde_json::from_slice(&buf[..n]) {
            Ok(msg) => msg,
            Err(e) => {
                debug!(%from, error = %e, "Dropping undecodable datagram");
                return Ok(());
            }
        };

        if let Some(reply) = self.state.handle(from, msg) {
            let payload = serde_json::to_vec(&reply).context("serialize reply")?;
            // Reply delivery is best effort, like everything else here.
            let _ = self.udp.send_to(&payload, from).await;
        }
        Ok(())
    }
}

/// Helper for tests: bind to an ephemeral loopback port.
pub async fn bind_ephemeral() -> anyhow::Result<(MatchServer, MatchConfig)> {
    let cfg = MatchConfig {
        server_addr: format!("{}:{}", IpAddr::V4(Ipv4Addr::LOCALHOST), 0),
        ..Default::default()
    };
    let mut server = MatchServer::bind(cfg).await?;
    server.cfg.server_addr = server.local_addr()?.to_string();
    let cfg = server.cfg.clone();
    Ok((server, cfg))
}
