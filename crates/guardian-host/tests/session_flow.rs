use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc::UnboundedReceiver;

use guardian_core::net::messages::{OutcomeKind, OutcomeMsg, RoomMessage};
use guardian_core::net::protocol::{decode_room_message, encode_room_message};
use guardian_gamemode::config::RulesConfig;
use guardian_gamemode::outcome::RoundPhase;
use guardian_host::config::HostConfig;
use guardian_host::session_loop::{HostBroadcast, HostCommand, HostSession, LoopConfig, spawn_host_session};

fn host_config(gamemode: &str, authority: bool) -> HostConfig {
    HostConfig {
        gamemode: gamemode.to_string(),
        authority,
        tick_rate: 50.0,
        rng_seed: Some(11),
        ..HostConfig::default()
    }
}

fn session(config: &HostConfig) -> HostSession {
    HostSession::from_config(config, RulesConfig::default()).unwrap()
}

/// Wait for the next outcome message, skipping everything else.
async fn next_outcome(rx: &mut UnboundedReceiver<HostBroadcast>) -> RoomMessage {
    loop {
        let msg = tokio::time::timeout(Duration::from_millis(500), rx.recv())
            .await
            .expect("should receive a broadcast within timeout")
            .expect("channel open");
        if let HostBroadcast::EncodedMessage(data) = msg {
            let decoded = decode_room_message(&data).unwrap();
            if matches!(decoded, RoomMessage::Outcome { .. }) {
                return decoded;
            }
        }
    }
}

#[tokio::test]
async fn player_death_broadcasts_loss() {
    let config = host_config("Titans", true);
    let (cmd_tx, mut rx, handle) = spawn_host_session(session(&config), LoopConfig::from(&config));

    cmd_tx.send(HostCommand::PlayerKilled { player_id: 2 }).unwrap();
    assert_eq!(
        next_outcome(&mut rx).await,
        RoomMessage::Outcome {
            kind: OutcomeKind::Lose,
            msg: OutcomeMsg { score: 1, sender: 1 },
        }
    );

    cmd_tx.send(HostCommand::Stop).unwrap();
    let summary = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("loop should stop")
        .unwrap();
    assert_eq!(summary.ledger.titan, 1);
    assert_eq!(summary.ledger.human, 0);
    assert_eq!(summary.phase, RoundPhase::Losing);
}

#[tokio::test]
async fn remote_outcome_adopts_score() {
    let config = host_config("PvpAhss", false);
    let (cmd_tx, _rx, handle) = spawn_host_session(session(&config), LoopConfig::from(&config));

    let inbound = encode_room_message(&RoomMessage::Outcome {
        kind: OutcomeKind::Win,
        msg: OutcomeMsg { score: 7, sender: 2 },
    })
    .unwrap();
    cmd_tx
        .send(HostCommand::Inbound {
            from: 2,
            data: Bytes::from(inbound),
        })
        .unwrap();
    cmd_tx.send(HostCommand::Stop).unwrap();

    let summary = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("loop should stop")
        .unwrap();
    assert_eq!(summary.ledger.human, 7);
    assert_eq!(summary.phase, RoundPhase::Winning);
}

#[tokio::test]
async fn tick_limit_ends_session() {
    let config = HostConfig {
        max_ticks: Some(5),
        ..host_config("Titans", true)
    };
    let (_cmd_tx, mut rx, handle) = spawn_host_session(session(&config), LoopConfig::from(&config));

    let ended = tokio::time::timeout(Duration::from_secs(2), async {
        while let Some(msg) = rx.recv().await {
            if matches!(msg, HostBroadcast::SessionEnded) {
                return true;
            }
        }
        false
    })
    .await
    .expect("session should end within timeout");
    assert!(ended);

    let summary = handle.await.unwrap();
    assert_eq!(summary.ticks, 5);
    assert_eq!(summary.live_titans, 5);
}

#[tokio::test]
async fn dropping_commands_stops_loop() {
    let config = host_config("Endless", true);
    let (cmd_tx, _rx, handle) = spawn_host_session(session(&config), LoopConfig::from(&config));
    drop(cmd_tx);
    let summary = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("loop should stop")
        .unwrap();
    assert_eq!(summary.phase, RoundPhase::Idle);
}
