use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use guardian_core::chat::{ChatInput, parse_chat_input};
use guardian_core::error::GuardianError;
use guardian_core::local::LocalWorld;
use guardian_core::net::messages::{ChatMessageMsg, RoomMessage};
use guardian_core::net::protocol::{decode_room_message, encode_room_message};
use guardian_core::player::{Player, PlayerId, PlayerState};
use guardian_core::session::{EntityRegistry, Hud, Network, SpawnPoint};
use guardian_core::titan::TitanType;
use guardian_gamemode::Gamemode;
use guardian_gamemode::config::RulesConfig;
use guardian_gamemode::ledger::ScoreLedger;
use guardian_gamemode::outcome::RoundPhase;
use guardian_gamemode::rules::CaptureSide;
use guardian_gamemode::spawner::TitanSource;

use crate::config::HostConfig;

/// Commands sent to the session tick loop.
#[derive(Debug)]
pub enum HostCommand {
    PlayerKilled {
        player_id: PlayerId,
    },
    /// A titan died in the scene.
    TitanKilled {
        name: String,
    },
    /// A racer crossed the finish line.
    PlayerFinished {
        player_id: PlayerId,
    },
    /// A capture point paid out for one side.
    PointsScored {
        side: CaptureSide,
        points: u32,
    },
    /// Spawn a batch outside the gamemode's own schedule.
    SpawnTitans {
        amount: u32,
        titan_type: Option<TitanType>,
    },
    /// Encoded room message received from another participant. `from` is
    /// the sender as identified by the transport.
    Inbound {
        from: PlayerId,
        data: Bytes,
    },
    /// Line typed by the local player.
    Chat(String),
    Stop,
}

/// Broadcasts sent from the session tick loop.
#[derive(Debug, Clone)]
pub enum HostBroadcast {
    /// Encoded RoomMessage bytes ready to send to the room.
    EncodedMessage(Bytes),
    /// The loop has exited.
    SessionEnded,
}

/// State reported when a session ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub ticks: u64,
    pub ledger: ScoreLedger,
    pub phase: RoundPhase,
    pub live_titans: usize,
    pub chat: Vec<String>,
}

/// Titan spawn points evenly spaced on a ring around the origin.
pub fn spawn_ring(count: u32, radius: f32) -> Vec<SpawnPoint> {
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * std::f32::consts::TAU;
            SpawnPoint::at(radius * angle.cos(), 0.0, radius * angle.sin())
        })
        .collect()
}

/// One gamemode session and the world it runs in.
pub struct HostSession {
    gamemode: Gamemode,
    world: LocalWorld,
    ticks: u64,
}

impl HostSession {
    pub fn new(gamemode: Gamemode, world: LocalWorld) -> Self {
        Self {
            gamemode,
            world,
            ticks: 0,
        }
    }

    /// Build the gamemode and an in-memory arena from host configuration.
    pub fn from_config(config: &HostConfig, rules: RulesConfig) -> Result<Self, GuardianError> {
        let json = config.settings_json()?;
        let titan_tag = rules.titan_spawn_tag.clone();
        let player_tag = rules.player_spawn_tag.clone();
        let gamemode = Gamemode::from_json(&json, &config.gamemode, rules)?;

        // The local player is id 1. Without authority the master is player 2.
        let master = if config.authority { 1 } else { 2 };
        let players: Vec<Player> = (1..=config.arena.players)
            .map(|id| Player {
                id,
                name: format!("Player{id}"),
                is_master: id == master,
                state: PlayerState::default(),
            })
            .collect();
        let seed = config.rng_seed.unwrap_or_else(rand::random);
        let mut world = LocalWorld::new(1, players, seed);
        world.network.authority = config.authority;
        world.network.offline = config.offline;
        world.registry.set_spawn_points(
            &titan_tag,
            spawn_ring(config.arena.titan_spawn_points, config.arena.radius),
        );
        world.registry.set_spawn_points(
            &player_tag,
            spawn_ring(config.arena.player_spawn_points, config.arena.radius / 4.0),
        );
        tracing::info!(
            gamemode = %gamemode.gamemode_type(),
            seed,
            authority = config.authority,
            offline = config.offline,
            players = config.arena.players,
            "Host session configured"
        );
        Ok(Self::new(gamemode, world))
    }

    pub fn gamemode(&self) -> &Gamemode {
        &self.gamemode
    }

    pub fn world(&self) -> &LocalWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut LocalWorld {
        &mut self.world
    }

    pub fn start(&mut self) {
        self.gamemode.start_round(&mut self.world.session());
    }

    pub fn tick(&mut self, dt: f32) {
        self.ticks += 1;
        self.world.advance_clock(dt);
        let requested = self.world.network.restart_requests();
        self.gamemode.update(&mut self.world.session(), dt);
        if self.world.network.restart_requests() > requested {
            // The new round's batch is queued but spawns from the next tick on.
            self.world.registry.reset();
            self.world.reset_round_clock();
        }
    }

    /// Begin a new round on a fresh scene.
    fn restart_round(&mut self) {
        self.world.registry.reset();
        self.gamemode.on_restart(&mut self.world.session());
        self.world.reset_round_clock();
    }

    /// Apply one command. Returns false when the session should stop.
    pub fn apply(&mut self, cmd: HostCommand) -> bool {
        match cmd {
            HostCommand::PlayerKilled { player_id } => {
                self.gamemode.on_player_killed(&mut self.world.session(), player_id);
            },
            HostCommand::TitanKilled { name } => {
                if self.world.registry.kill_titan(&name) {
                    self.gamemode.on_titan_killed(&mut self.world.session(), &name);
                    self.world.registry.clear_dead();
                } else {
                    tracing::warn!(name = %name, "Kill reported for unknown or dead titan");
                }
            },
            HostCommand::PlayerFinished { player_id } => {
                self.gamemode.on_player_finished(&mut self.world.session(), player_id);
            },
            HostCommand::PointsScored { side, points } => {
                self.gamemode.on_points_scored(&mut self.world.session(), side, points);
            },
            HostCommand::SpawnTitans { amount, titan_type } => {
                let source = titan_type.map_or(TitanSource::Random, TitanSource::Fixed);
                self.gamemode
                    .base_mut()
                    .spawn_titans(&mut self.world.session(), amount, source);
            },
            HostCommand::Inbound { from, data } => self.receive(from, &data),
            HostCommand::Chat(text) => self.local_chat(&text),
            HostCommand::Stop => return false,
        }
        true
    }

    fn receive(&mut self, from: PlayerId, data: &[u8]) {
        let msg = match decode_room_message(data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!(from, error = %e, len = data.len(), "Dropping undecodable room message");
                return;
            },
        };
        match msg {
            RoomMessage::Outcome { kind, msg } => {
                if msg.sender != from {
                    tracing::warn!(from, claimed = msg.sender, "Outcome sender mismatch");
                }
                self.gamemode
                    .on_net_outcome(&mut self.world.session(), kind, msg.score, from);
            },
            RoomMessage::RestartGame(restart) => {
                if !self.world.session().is_trusted_sender(from) {
                    tracing::warn!(from, claimed = restart.sender, "Ignoring restart from non-master");
                    return;
                }
                self.restart_round();
            },
            RoomMessage::ChatMessage(chat) => {
                let name = self.player_name(from);
                self.world
                    .hud
                    .chat()
                    .add_message(&format!("{name}: {}", chat.content));
            },
        }
    }

    fn local_chat(&mut self, text: &str) {
        let local_id = self.world.network.local_id;
        match parse_chat_input(text) {
            Ok(None) => {},
            Ok(Some(ChatInput::Message(content))) => {
                let name = self.player_name(local_id);
                self.world
                    .hud
                    .chat()
                    .add_message(&format!("{name}: {content}"));
                self.world.network.send(RoomMessage::ChatMessage(ChatMessageMsg {
                    sender: local_id,
                    content,
                }));
            },
            Ok(Some(ChatInput::Command { name, args })) => self.command(&name, &args),
            Err(e) => self.world.hud.chat().report(&e),
        }
    }

    fn player_name(&self, id: PlayerId) -> String {
        self.world
            .network
            .players
            .iter()
            .find(|p| p.id == id)
            .map_or_else(|| format!("Player {id}"), |p| p.name.clone())
    }

    fn command(&mut self, name: &str, args: &[String]) {
        match name {
            "restart" => {
                if !self.world.network.authority {
                    self.world.hud.chat().add_error_not_master_client();
                    return;
                }
                self.world.network.request_restart();
                self.restart_round();
                self.world.hud.chat().add_system_message("Round restarted.");
            },
            "score" => {
                let line = self.gamemode.round_ended_message();
                self.world.hud.chat().add_system_message(&line);
            },
            "titans" => {
                let line = format!("Titans alive: {}", self.world.registry.count_live_titans());
                self.world.hud.chat().add_system_message(&line);
            },
            _ => {
                tracing::debug!(name, ?args, "Unknown chat command");
                self.world
                    .hud
                    .chat()
                    .add_error_message(&format!("Unknown command /{name}"));
            },
        }
    }

    /// Encode every queued room message.
    pub fn drain_encoded(&mut self) -> Vec<Bytes> {
        self.world
            .network
            .drain_outbox()
            .into_iter()
            .filter_map(|msg| match encode_room_message(&msg) {
                Ok(data) => Some(Bytes::from(data)),
                Err(e) => {
                    tracing::error!(error = %e, msg_type = ?msg.message_type(), "Failed to encode room message");
                    None
                },
            })
            .collect()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            ticks: self.ticks,
            ledger: *self.gamemode.base().ledger(),
            phase: self.gamemode.phase(),
            live_titans: self.world.registry.count_live_titans(),
            chat: self.world.hud.feed().messages().map(str::to_string).collect(),
        }
    }
}

/// Shortest tick period the loop will run at.
const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Timing of a spawned session loop.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    pub tick_rate: f32,
    pub max_ticks: Option<u64>,
}

impl From<&HostConfig> for LoopConfig {
    fn from(config: &HostConfig) -> Self {
        Self {
            tick_rate: config.tick_rate,
            max_ticks: config.max_ticks,
        }
    }
}

/// Spawn a session tick loop as a tokio task.
/// Returns the command sender, broadcast receiver and the task handle.
pub fn spawn_host_session(
    session: HostSession,
    config: LoopConfig,
) -> (
    mpsc::UnboundedSender<HostCommand>,
    mpsc::UnboundedReceiver<HostBroadcast>,
    JoinHandle<SessionSummary>,
) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (broadcast_tx, broadcast_rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(run_session_loop(session, config, cmd_rx, broadcast_tx));

    (cmd_tx, broadcast_rx, handle)
}

fn flush(session: &mut HostSession, broadcast_tx: &mpsc::UnboundedSender<HostBroadcast>) {
    for data in session.drain_encoded() {
        let _ = broadcast_tx.send(HostBroadcast::EncodedMessage(data));
    }
}

/// The session's single mutator: ticks the gamemode and applies commands.
async fn run_session_loop(
    mut session: HostSession,
    config: LoopConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<HostCommand>,
    broadcast_tx: mpsc::UnboundedSender<HostBroadcast>,
) -> SessionSummary {
    session.start();
    flush(&mut session, &broadcast_tx);

    let dt = 1.0 / config.tick_rate;
    let period = Duration::try_from_secs_f32(dt)
        .unwrap_or(Duration::from_secs(1))
        .max(MIN_TICK_PERIOD);
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                session.tick(dt);
                flush(&mut session, &broadcast_tx);
                if config.max_ticks.is_some_and(|max| session.ticks >= max) {
                    tracing::info!(ticks = session.ticks, "Tick limit reached");
                    break;
                }
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(cmd) => {
                        let keep_running = session.apply(cmd);
                        flush(&mut session, &broadcast_tx);
                        if !keep_running {
                            break;
                        }
                    },
                    None => break,
                }
            }
        }
    }

    let summary = session.summary();
    tracing::info!(
        ticks = summary.ticks,
        human = summary.ledger.human,
        titan = summary.ledger.titan,
        "Session ended"
    );
    let _ = broadcast_tx.send(HostBroadcast::SessionEnded);
    summary
}
