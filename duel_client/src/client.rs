//! Client implementation.
//!
//! The client owns a single unreliable datagram socket. It registers on
//! connect, then sends one state report per caller tick and polls
//! non-blockingly for opponent views, keeping the newest one so a
//! renderer can keep drawing through dropped replies. It never blocks
//! waiting on the network outside the initial registration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::Context;
use duel_shared::{
    config::MatchConfig,
    net::{ClientMsg, OpponentView, ServerMsg, Slot, StateReport, UnreliableConn},
};
use tracing::{debug, info};

use crate::view::ViewTracker;

/// Registration retries before giving up. Both the request and the
/// reply ride plain datagrams and can be lost.
const REGISTER_ATTEMPTS: u32 = 5;
const REGISTER_TIMEOUT: Duration = Duration::from_millis(250);

/// High-level match client.
pub struct MatchClient {
    /// Slot assigned by the server on registration.
    pub slot: Slot,
    pub views: ViewTracker,
    conn: UnreliableConn,
    tick: u32,
}

impl MatchClient {
    /// Binds an ephemeral socket and registers with the server.
    pub async fn connect(cfg: &MatchConfig) -> anyhow::Result<Self> {
        let server_addr: SocketAddr = cfg.server_addr.parse().context("parse server_addr")?;

        info!(server = %server_addr, "Connecting to server");

        let bind = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0);
        let conn = UnreliableConn::connect(bind, server_addr).await?;

        let slot = Self::register(&conn).await?;
        info!(slot = slot.0, "Registered with server");

        Ok(Self {
            slot,
            views: ViewTracker::default(),
            conn,
            tick: 0,
        })
    }

    async fn register(conn: &UnreliableConn) -> anyhow::Result<Slot> {
        for attempt in 1..=REGISTER_ATTEMPTS {
            conn.send(&ClientMsg::Register).await?;
            match conn.recv_timeout(REGISTER_TIMEOUT).await? {
                Some(ServerMsg::Registered { slot }) => return Ok(slot),
                Some(other) => debug!(?other, "Unexpected message during registration"),
                None => debug!(attempt, "No registration reply"),
            }
        }
        anyhow::bail!("no registration reply after {REGISTER_ATTEMPTS} attempts; match may be full")
    }

    /// Sends one state report for this tick. Does not wait for the
    /// reply; pair with [`MatchClient::poll_views`].
    pub async fn send_report(&mut self, report: StateReport) -> anyhow::Result<()> {
        self.conn.send(&ClientMsg::Report(report)).await?;
        self.tick += 1;
        Ok(())
    }

    /// Drains every pending datagram without blocking, keeping the
    /// newest view. Returns how many views arrived.
    pub fn poll_views(&mut self) -> anyhow::Result<usize> {
        let mut received = 0;
        while let Some(msg) = self.conn.try_recv()? {
            match msg {
                ServerMsg::View(view) => {
                    self.views.push(view);
                    received += 1;
                }
                other => debug!(?other, "Unexpected message outside handshake"),
            }
        }
        Ok(received)
    }

    /// Fire-and-forget restart vote; a reset happens only once the
    /// opponent votes too.
    pub async fn request_restart(&self) -> anyhow::Result<()> {
        self.conn.send(&ClientMsg::Restart).await?;
        Ok(())
    }

    /// The newest opponent view, possibly stale.
    pub fn latest_view(&self) -> Option<&OpponentView> {
        self.views.latest()
    }

    /// Reports sent since connect.
    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn server_peer(&self) -> SocketAddr {
        self.conn.peer_addr()
    }
}
