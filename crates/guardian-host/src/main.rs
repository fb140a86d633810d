use tracing_subscriber::EnvFilter;

use guardian_gamemode::config::RulesConfig;
use guardian_host::config::HostConfig;
use guardian_host::session_loop::{HostBroadcast, HostCommand, HostSession, LoopConfig, spawn_host_session};

#[tokio::main]
async fn main() {
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());
    if std::env::var("GUARDIAN_LOG_FORMAT").is_ok_and(|v| v == "json") {
        builder.json().init();
    } else {
        builder.init();
    }

    let config = HostConfig::load();
    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid host configuration");
        std::process::exit(1);
    }
    let session = match HostSession::from_config(&config, RulesConfig::load()) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build gamemode session");
            std::process::exit(1);
        },
    };

    tracing::info!(gamemode = %config.gamemode, tick_rate = config.tick_rate, "Guardian host starting");
    let (cmd_tx, mut broadcast_rx, handle) = spawn_host_session(session, LoopConfig::from(&config));

    let mut sent = 0usize;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown requested");
                let _ = cmd_tx.send(HostCommand::Stop);
                break;
            }
            msg = broadcast_rx.recv() => match msg {
                Some(HostBroadcast::EncodedMessage(data)) => {
                    sent += 1;
                    tracing::debug!(len = data.len(), "Room message ready");
                },
                Some(HostBroadcast::SessionEnded) | None => break,
            }
        }
    }

    match handle.await {
        Ok(summary) => tracing::info!(
            ticks = summary.ticks,
            human = summary.ledger.human,
            titan = summary.ledger.titan,
            phase = ?summary.phase,
            live_titans = summary.live_titans,
            sent,
            "Guardian host stopped"
        ),
        Err(e) => tracing::error!(error = %e, "Session task failed"),
    }
}
