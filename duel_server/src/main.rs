//! Standalone match server binary.
//!
//! Usage:
//!   cargo run -p duel_server -- [--addr 127.0.0.1:40100]
//!
//! The server answers every datagram synchronously: registrations get a
//! slot, state reports get an opponent view once both players have
//! reported, restart requests get silence.

use std::env;

use anyhow::Context;
use duel_server::MatchServer;
use duel_shared::config::MatchConfig;
use tracing::info;

fn parse_args() -> MatchConfig {
    let mut cfg = MatchConfig::default();
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--addr" if i + 1 < args.len() => {
                cfg.server_addr = args[i + 1].clone();
                i += 2;
            }
            _ => i += 1,
        }
    }
    cfg
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cfg = parse_args();
    info!(addr = %cfg.server_addr, "Starting match server");

    let mut server = MatchServer::bind(cfg).await.context("bind server")?;
    let local = server.local_addr()?;
    info!(%local, "Waiting for players");

    server.run().await
}
