//! Narrow interfaces to the engine-side collaborators.
//!
//! The rule engine never reaches for ambient state: every operation receives
//! a [`Session`] that bundles the collaborators, the random source, and the
//! round clock for the current tick.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::chat::ChatFeed;
use crate::net::messages::OutcomeKind;
use crate::player::{Player, PlayerId};
use crate::titan::{TitanConfiguration, TitanHandle};

/// Scene tag for titan spawn points.
pub const TITAN_SPAWN_TAG: &str = "titanRespawn";
/// Scene tag for player spawn points.
pub const PLAYER_SPAWN_TAG: &str = "playerRespawn";

/// A spawn location in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub position: [f32; 3],
    /// Rotation quaternion (x, y, z, w).
    pub rotation: [f32; 4],
}

impl SpawnPoint {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
            rotation: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// HUD label slots the gamemode writes status text into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelPosition {
    TopCenter,
    TopRight,
    Center,
}

/// Scene-side titan bookkeeping.
pub trait EntityRegistry {
    /// Titans currently alive.
    fn count_live_titans(&self) -> usize;

    /// Create one titan at the given point.
    fn spawn_titan(&mut self, point: &SpawnPoint, config: TitanConfiguration);

    /// Every entity under the "titan" tag, dead or alive.
    fn titans(&self) -> Vec<TitanHandle>;

    /// Spawn points registered under `tag`.
    fn spawn_points(&self, tag: &str) -> Vec<SpawnPoint>;
}

/// Authority and consensus surface of the networking middleware.
pub trait Network {
    /// Reliable, ordered delivery of a round outcome to every other participant.
    fn broadcast_outcome(&mut self, kind: OutcomeKind, score: u32);

    /// Whether this process holds scheduling authority (master client).
    fn is_authority(&self) -> bool;

    fn is_offline(&self) -> bool;

    /// Ask for a room-wide round restart. Only meaningful on the authority.
    fn request_restart(&mut self);

    fn local_player_id(&self) -> PlayerId;

    fn players(&self) -> &[Player];

    fn players_mut(&mut self) -> &mut [Player];
}

/// Presentation surface: status labels and the chat feed.
pub trait Hud {
    fn show_status(&mut self, position: LabelPosition, text: &str, append: bool);

    fn chat(&mut self) -> &mut ChatFeed;
}

/// Fire-and-forget round notifications.
pub trait GameEvents {
    fn game_won(&mut self);

    fn game_lost(&mut self);
}

/// Timing information for the current tick, owned by the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundClock {
    /// Seconds since the current round started.
    pub round_time: f32,
    /// Seconds since the session started (used offline).
    pub total_time: f32,
    /// Room time as agreed with the authority (used online).
    pub room_time: f32,
}

/// Explicit context passed into every rule-engine operation.
pub struct Session<'a> {
    pub registry: &'a mut dyn EntityRegistry,
    pub network: &'a mut dyn Network,
    pub hud: &'a mut dyn Hud,
    pub events: &'a mut dyn GameEvents,
    pub rng: &'a mut dyn RngCore,
    pub clock: RoundClock,
}

impl Session<'_> {
    /// The player record for `id`, if still in the room.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.network.players().iter().find(|p| p.id == id)
    }

    /// Whether `id` names the authority or this process itself.
    pub fn is_trusted_sender(&self, id: PlayerId) -> bool {
        id == self.network.local_player_id() || self.player(id).is_some_and(|p| p.is_master)
    }

    /// Time shown in status text: session time offline, room time online.
    pub fn display_time(&self) -> f32 {
        if self.network.is_offline() {
            self.clock.total_time
        } else {
            self.clock.room_time
        }
    }
}
