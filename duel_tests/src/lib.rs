//! Shared helpers for the integration suite.

use std::time::Duration;

use anyhow::Context;
use duel_shared::net::{decode_from_bytes, ServerMsg, StateReport};
use tokio::{net::UdpSocket, time};

/// Installs a test-friendly subscriber; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();
}

pub fn standing(x: i32) -> StateReport {
    StateReport {
        x,
        y: 400,
        is_jumping: false,
        is_attacking: false,
        is_guarding: false,
        moving: false,
        frame: 0.0,
    }
}

pub fn attacking(x: i32) -> StateReport {
    StateReport {
        is_attacking: true,
        ..standing(x)
    }
}

pub fn guarding(x: i32) -> StateReport {
    StateReport {
        is_guarding: true,
        ..standing(x)
    }
}

/// Receives and decodes one server message, failing after `timeout`.
pub async fn recv_server_msg(sock: &UdpSocket, timeout: Duration) -> anyhow::Result<ServerMsg> {
    let mut buf = vec![0u8; 64 * 1024];
    let (n, _) = time::timeout(timeout, sock.recv_from(&mut buf))
        .await
        .context("timed out waiting for a reply")??;
    decode_from_bytes(&buf[..n])
}
