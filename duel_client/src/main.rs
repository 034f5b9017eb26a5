//! Standalone headless client binary.
//!
//! Usage:
//!   cargo run -p duel_client -- [--addr 127.0.0.1:40100] [--name Ryu] [--start-x 100]
//!
//! Registers with the match server, then runs a scripted sparring loop:
//! one state report per tick, a non-blocking poll for the opponent view,
//! and a restart vote whenever the match concludes. Run two copies with
//! different `--start-x` values to watch a full duel in the logs.

use std::env;
use std::time::Duration;

use anyhow::Context;
use duel_client::script::SparringScript;
use duel_client::MatchClient;
use duel_shared::config::MatchConfig;
use tracing::info;

struct Args {
    cfg: MatchConfig,
    start_x: i32,
}

fn parse_args() -> Args {
    let mut cfg = MatchConfig::default();
    let mut start_x = 100;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--addr" if i + 1 < args.len() => {
                cfg.server_addr = args[i + 1].clone();
                i += 2;
            }
            "--name" if i + 1 < args.len() => {
                cfg.player_name = args[i + 1].clone();
                i += 2;
            }
            "--tick-hz" if i + 1 < args.len() => {
                cfg.tick_hz = args[i + 1].parse().unwrap_or(30);
                i += 2;
            }
            "--start-x" if i + 1 < args.len() => {
                start_x = args[i + 1].parse().unwrap_or(100);
                i += 2;
            }
            _ => i += 1,
        }
    }
    Args { cfg, start_x }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let Args { cfg, start_x } = parse_args();
    info!(server = %cfg.server_addr, name = %cfg.player_name, "Starting client");

    let mut client = MatchClient::connect(&cfg).await.context("connect")?;
    info!(slot = client.slot.0, "Entering the arena");

    let mut script = SparringScript::new(start_x, 400);
    let tick_interval = Duration::from_secs_f32(1.0 / cfg.tick_hz as f32);
    let mut voted_restart = false;

    loop {
        let opponent_x = client.latest_view().map(|v| v.x);
        let report = script.next_report(opponent_x);
        client.send_report(report).await?;
        client.poll_views()?;

        if let Some(view) = client.latest_view() {
            if view.game_over {
                if !voted_restart {
                    info!(
                        winner = view.winner,
                        my_health = view.my_health,
                        "Match over, voting to restart"
                    );
                    client.request_restart().await?;
                    voted_restart = true;
                }
            } else {
                voted_restart = false;
            }

            if client.tick() % cfg.tick_hz.max(1) == 0 {
                info!(
                    x = report.x,
                    opponent_x = view.x,
                    my_health = view.my_health,
                    opponent_health = view.health,
                    "Tick"
                );
            }
        }

        tokio::time::sleep(tick_interval).await;
    }
}
