//! In-memory collaborators for headless hosting and tests.
//!
//! `LocalWorld` owns one implementation of each collaborator trait as a
//! separate field so a [`Session`] can borrow all of them at once.

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::chat::ChatFeed;
use crate::net::messages::{OutcomeKind, OutcomeMsg, RestartGameMsg, RoomMessage};
use crate::player::{Player, PlayerId};
use crate::session::{
    EntityRegistry, GameEvents, Hud, LabelPosition, Network, RoundClock, Session, SpawnPoint,
};
use crate::titan::{TitanConfiguration, TitanHandle, TitanKind, TitanLifecycle};

/// A titan tracked by [`LocalRegistry`].
#[derive(Debug, Clone, PartialEq)]
pub struct LocalTitan {
    pub handle: TitanHandle,
    pub config: Option<TitanConfiguration>,
    pub point: SpawnPoint,
}

/// Scene stand-in: spawn points by tag and the titans created so far.
#[derive(Debug, Clone, Default)]
pub struct LocalRegistry {
    titans: Vec<LocalTitan>,
    spawn_points: HashMap<String, Vec<SpawnPoint>>,
    next_titan: u64,
}

impl LocalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_spawn_points(&mut self, tag: &str, points: Vec<SpawnPoint>) {
        self.spawn_points.insert(tag.to_string(), points);
    }

    /// Place a boss titan in the scene.
    pub fn add_female(&mut self, name: &str) {
        self.titans.push(LocalTitan {
            handle: TitanHandle {
                name: name.to_string(),
                kind: TitanKind::Female,
            },
            config: None,
            point: SpawnPoint::at(0.0, 0.0, 0.0),
        });
    }

    /// Mark a mindless titan dead. Returns false if no such living titan exists.
    pub fn kill_titan(&mut self, name: &str) -> bool {
        for titan in &mut self.titans {
            if titan.handle.name != name {
                continue;
            }
            if let TitanKind::Mindless { state } = &mut titan.handle.kind
                && *state != TitanLifecycle::Dead
            {
                *state = TitanLifecycle::Dead;
                return true;
            }
        }
        false
    }

    /// Remove a titan from the scene entirely (boss defeated, despawned).
    pub fn remove_titan(&mut self, name: &str) -> bool {
        let before = self.titans.len();
        self.titans.retain(|t| t.handle.name != name);
        self.titans.len() != before
    }

    /// Drop corpses so they stop showing in the "titan" tag.
    pub fn clear_dead(&mut self) {
        self.titans.retain(|t| !t.handle.is_dead());
    }

    /// Fresh scene for a new round: every titan goes, spawn points stay.
    pub fn reset(&mut self) {
        let removed = self.titans.len();
        self.titans.clear();
        tracing::debug!(removed, "Scene reset");
    }

    pub fn titan_records(&self) -> &[LocalTitan] {
        &self.titans
    }

    /// Name of the first titan that is still alive, if any.
    pub fn first_living(&self) -> Option<&str> {
        self.titans
            .iter()
            .find(|t| !t.handle.is_dead())
            .map(|t| t.handle.name.as_str())
    }
}

impl EntityRegistry for LocalRegistry {
    fn count_live_titans(&self) -> usize {
        self.titans.iter().filter(|t| !t.handle.is_dead()).count()
    }

    fn spawn_titan(&mut self, point: &SpawnPoint, config: TitanConfiguration) {
        self.next_titan += 1;
        let name = format!("titan-{}", self.next_titan);
        tracing::trace!(name = %name, titan_type = ?config.titan_type, "Spawned titan");
        self.titans.push(LocalTitan {
            handle: TitanHandle {
                name,
                kind: TitanKind::Mindless {
                    state: TitanLifecycle::Idle,
                },
            },
            config: Some(config),
            point: *point,
        });
    }

    fn titans(&self) -> Vec<TitanHandle> {
        self.titans.iter().map(|t| t.handle.clone()).collect()
    }

    fn spawn_points(&self, tag: &str) -> Vec<SpawnPoint> {
        self.spawn_points.get(tag).cloned().unwrap_or_default()
    }
}

/// Network stand-in that queues outbound room messages.
#[derive(Debug, Clone)]
pub struct LocalNetwork {
    pub local_id: PlayerId,
    pub authority: bool,
    pub offline: bool,
    pub players: Vec<Player>,
    outbox: Vec<RoomMessage>,
    restart_requests: u32,
}

impl LocalNetwork {
    pub fn new(local_id: PlayerId, players: Vec<Player>) -> Self {
        let authority = players.iter().any(|p| p.id == local_id && p.is_master);
        Self {
            local_id,
            authority,
            offline: false,
            players,
            outbox: Vec::new(),
            restart_requests: 0,
        }
    }

    /// Queue a room message for delivery.
    pub fn send(&mut self, msg: RoomMessage) {
        self.outbox.push(msg);
    }

    /// Take every message queued since the last drain.
    pub fn drain_outbox(&mut self) -> Vec<RoomMessage> {
        std::mem::take(&mut self.outbox)
    }

    pub fn outbox(&self) -> &[RoomMessage] {
        &self.outbox
    }

    pub fn restart_requests(&self) -> u32 {
        self.restart_requests
    }
}

impl Network for LocalNetwork {
    fn broadcast_outcome(&mut self, kind: OutcomeKind, score: u32) {
        self.outbox.push(RoomMessage::Outcome {
            kind,
            msg: OutcomeMsg {
                score,
                sender: self.local_id,
            },
        });
    }

    fn is_authority(&self) -> bool {
        self.authority
    }

    fn is_offline(&self) -> bool {
        self.offline
    }

    fn request_restart(&mut self) {
        self.restart_requests += 1;
        self.outbox.push(RoomMessage::RestartGame(RestartGameMsg {
            sender: self.local_id,
        }));
    }

    fn local_player_id(&self) -> PlayerId {
        self.local_id
    }

    fn players(&self) -> &[Player] {
        &self.players
    }

    fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }
}

/// HUD stand-in that keeps the last text per label.
#[derive(Debug, Clone, Default)]
pub struct LocalHud {
    labels: HashMap<LabelPosition, String>,
    chat: ChatFeed,
}

impl LocalHud {
    pub fn label(&self, position: LabelPosition) -> &str {
        self.labels.get(&position).map_or("", String::as_str)
    }

    pub fn feed(&self) -> &ChatFeed {
        &self.chat
    }
}

impl Hud for LocalHud {
    fn show_status(&mut self, position: LabelPosition, text: &str, append: bool) {
        let label = self.labels.entry(position).or_default();
        if !append {
            label.clear();
        }
        label.push_str(text);
    }

    fn chat(&mut self) -> &mut ChatFeed {
        &mut self.chat
    }
}

/// Counts round notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventLog {
    pub won: u32,
    pub lost: u32,
}

impl GameEvents for EventLog {
    fn game_won(&mut self) {
        self.won += 1;
        tracing::debug!(total = self.won, "Game won event");
    }

    fn game_lost(&mut self) {
        self.lost += 1;
        tracing::debug!(total = self.lost, "Game lost event");
    }
}

/// Every collaborator a gamemode needs, owned in one place.
pub struct LocalWorld {
    pub registry: LocalRegistry,
    pub network: LocalNetwork,
    pub hud: LocalHud,
    pub events: EventLog,
    pub rng: StdRng,
    pub clock: RoundClock,
}

impl LocalWorld {
    pub fn new(local_id: PlayerId, players: Vec<Player>, seed: u64) -> Self {
        Self {
            registry: LocalRegistry::new(),
            network: LocalNetwork::new(local_id, players),
            hud: LocalHud::default(),
            events: EventLog::default(),
            rng: StdRng::seed_from_u64(seed),
            clock: RoundClock::default(),
        }
    }

    /// Borrow every collaborator for one operation.
    pub fn session(&mut self) -> Session<'_> {
        Session {
            registry: &mut self.registry,
            network: &mut self.network,
            hud: &mut self.hud,
            events: &mut self.events,
            rng: &mut self.rng,
            clock: self.clock,
        }
    }

    pub fn advance_clock(&mut self, dt: f32) {
        self.clock.round_time += dt;
        self.clock.total_time += dt;
        self.clock.room_time += dt;
    }

    /// New round: round time starts over, session time keeps running.
    pub fn reset_round_clock(&mut self) {
        self.clock.round_time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::titan::TitanType;

    #[test]
    fn registry_counts_only_living() {
        let mut registry = LocalRegistry::new();
        let point = SpawnPoint::at(1.0, 0.0, 1.0);
        registry.spawn_titan(&point, TitanConfiguration::new(0, 1.0, TitanType::Normal));
        registry.spawn_titan(&point, TitanConfiguration::new(0, 1.0, TitanType::Jumper));
        assert_eq!(registry.count_live_titans(), 2);
        assert!(registry.kill_titan("titan-1"));
        assert!(!registry.kill_titan("titan-1"), "already dead");
        assert_eq!(registry.count_live_titans(), 1);
        assert_eq!(registry.titans().len(), 2);
        registry.clear_dead();
        assert_eq!(registry.titans().len(), 1);
    }

    #[test]
    fn female_counts_as_living() {
        let mut registry = LocalRegistry::new();
        registry.add_female("annie");
        assert_eq!(registry.count_live_titans(), 1);
        assert!(!registry.kill_titan("annie"));
        assert!(registry.remove_titan("annie"));
        assert_eq!(registry.count_live_titans(), 0);
    }

    #[test]
    fn reset_clears_titans_keeps_points() {
        let mut registry = LocalRegistry::new();
        let point = SpawnPoint::at(2.0, 0.0, 2.0);
        registry.set_spawn_points("titanRespawn", vec![point]);
        registry.spawn_titan(&point, TitanConfiguration::new(0, 1.0, TitanType::Punk));
        registry.add_female("annie");
        registry.reset();
        assert_eq!(registry.count_live_titans(), 0);
        assert!(registry.titan_records().is_empty());
        assert_eq!(registry.spawn_points("titanRespawn"), vec![point]);
        registry.spawn_titan(&point, TitanConfiguration::new(0, 1.0, TitanType::Punk));
        assert_eq!(registry.first_living(), Some("titan-2"), "names stay unique across resets");
    }

    #[test]
    fn hud_append_and_replace() {
        let mut hud = LocalHud::default();
        hud.show_status(LabelPosition::TopCenter, "a", false);
        hud.show_status(LabelPosition::TopCenter, "b", true);
        assert_eq!(hud.label(LabelPosition::TopCenter), "ab");
        hud.show_status(LabelPosition::TopCenter, "c", false);
        assert_eq!(hud.label(LabelPosition::TopCenter), "c");
        assert_eq!(hud.label(LabelPosition::Center), "");
    }

    #[test]
    fn network_authority_from_master_flag() {
        let players = vec![Player {
            id: 1,
            name: "Host".to_string(),
            is_master: true,
            state: Default::default(),
        }];
        assert!(LocalNetwork::new(1, players.clone()).is_authority());
        assert!(!LocalNetwork::new(2, players).is_authority());
    }

    #[test]
    fn restart_request_is_queued() {
        let mut network = LocalNetwork::new(1, Vec::new());
        network.request_restart();
        assert_eq!(network.restart_requests(), 1);
        assert_eq!(
            network.drain_outbox(),
            vec![RoomMessage::RestartGame(RestartGameMsg { sender: 1 })]
        );
        assert!(network.outbox().is_empty());
    }
}
