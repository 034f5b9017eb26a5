//! Full socket-based integration tests for client ↔ server communication.

use std::time::Duration;

use duel_client::MatchClient;
use duel_server::server::bind_ephemeral;
use duel_shared::net::{OpponentView, Slot, StateReport};
use duel_tests::{attacking, guarding, init_tracing, standing};

/// Sends one report, then polls until a fresh view arrives or the
/// retries run out. `None` means the server withheld the reply.
async fn report_and_wait(
    client: &mut MatchClient,
    report: StateReport,
) -> anyhow::Result<Option<OpponentView>> {
    let seen = client.views.received();
    client.send_report(report).await?;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(5)).await;
        client.poll_views()?;
        if client.views.received() > seen {
            return Ok(client.latest_view().copied());
        }
    }
    Ok(None)
}

/// Full integration: two clients register, trade blows, and read the
/// per-recipient health fields from their views.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn two_clients_trade_blows() -> anyhow::Result<()> {
    init_tracing();

    let (mut server, cfg) = bind_ephemeral().await?;
    let server_task = tokio::spawn(async move { server.run().await });

    let mut first = MatchClient::connect(&cfg).await?;
    let mut second = MatchClient::connect(&cfg).await?;
    assert_eq!(first.slot, Slot(0));
    assert_eq!(second.slot, Slot(1));

    // Before the opponent has ever reported, reports get no reply.
    let early = report_and_wait(&mut first, standing(100)).await?;
    assert!(early.is_none(), "got a view before the opponent reported");

    // Once both have reported, views flow with full health.
    let view = report_and_wait(&mut second, standing(105))
        .await?
        .expect("second should get a view");
    assert_eq!(view.x, 100);
    assert_eq!(view.health, 100);
    assert_eq!(view.my_health, 100);
    assert!(!view.game_over);
    assert_eq!(view.winner, 0);

    // Unguarded hit: sprite centers 5 apart, inside the 10-unit range.
    let view = report_and_wait(&mut first, attacking(100))
        .await?
        .expect("attacker should get a view");
    assert_eq!(view.health, 95);
    assert_eq!(view.my_health, 100);

    // The defender sees the damage on its own side of the view.
    let view = report_and_wait(&mut second, guarding(105))
        .await?
        .expect("defender should get a view");
    assert_eq!(view.health, 100);
    assert_eq!(view.my_health, 95);

    // Guarded hit only chips.
    let view = report_and_wait(&mut first, attacking(100))
        .await?
        .expect("attacker should get a view");
    assert_eq!(view.health, 93);

    server_task.abort();
    Ok(())
}

/// Mutual restart: one vote changes nothing, the second resets health.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn mutual_restart_resets_health() -> anyhow::Result<()> {
    init_tracing();

    let (mut server, cfg) = bind_ephemeral().await?;
    let server_task = tokio::spawn(async move { server.run().await });

    let mut first = MatchClient::connect(&cfg).await?;
    let mut second = MatchClient::connect(&cfg).await?;

    report_and_wait(&mut first, standing(100)).await?;
    report_and_wait(&mut second, standing(105)).await?;
    let view = report_and_wait(&mut first, attacking(100))
        .await?
        .expect("attacker should get a view");
    assert_eq!(view.health, 95);

    // A single vote must not reset.
    first.request_restart().await?;
    tokio::time::sleep(Duration::from_millis(20)).await;
    let view = report_and_wait(&mut second, standing(105))
        .await?
        .expect("view after partial vote");
    assert_eq!(view.my_health, 95);

    // The second vote completes the agreement.
    second.request_restart().await?;
    tokio::time::sleep(Duration::from_millis(20)).await;
    let view = report_and_wait(&mut first, standing(100))
        .await?
        .expect("view after reset");
    assert_eq!(view.health, 100);
    assert_eq!(view.my_health, 100);

    server_task.abort();
    Ok(())
}

/// A third endpoint gets silence: registration times out.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn third_client_cannot_register() -> anyhow::Result<()> {
    init_tracing();

    let (mut server, cfg) = bind_ephemeral().await?;
    let server_task = tokio::spawn(async move { server.run().await });

    let _first = MatchClient::connect(&cfg).await?;
    let _second = MatchClient::connect(&cfg).await?;

    let third = MatchClient::connect(&cfg).await;
    assert!(third.is_err(), "third client should not get a slot");

    server_task.abort();
    Ok(())
}
