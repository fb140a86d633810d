pub mod base;
pub mod config;
pub mod factory;
pub mod health;
pub mod ledger;
pub mod outcome;
pub mod rules;
pub mod selector;
pub mod spawner;

use rand::RngCore;

use guardian_core::error::GuardianError;
use guardian_core::net::messages::OutcomeKind;
use guardian_core::player::PlayerId;
use guardian_core::session::{Session, SpawnPoint};
use guardian_core::settings::{GamemodeConfig, GamemodeType, convert_to_gamemode};
use guardian_core::titan::TitanConfiguration;

use base::GamemodeBase;
use config::RulesConfig;
use outcome::RoundPhase;
use rules::{CaptureSide, GamemodeRules, create_rules};
use spawner::TitanSource;

/// A running gamemode: shared base state plus the variant's rules.
pub struct Gamemode {
    base: GamemodeBase,
    rules: Box<dyn GamemodeRules>,
}

impl Gamemode {
    pub fn new(config: GamemodeConfig, rules_config: RulesConfig) -> Self {
        let rules = create_rules(&config.variant);
        tracing::info!(gamemode = %rules.gamemode_type(), "Gamemode created");
        Self {
            base: GamemodeBase::new(config.settings, rules_config),
            rules,
        }
    }

    /// Convert a settings document and build the gamemode it describes.
    pub fn from_json(json: &str, gamemode_type: &str, rules_config: RulesConfig) -> Result<Self, GuardianError> {
        Ok(Self::new(convert_to_gamemode(json, gamemode_type)?, rules_config))
    }

    pub fn gamemode_type(&self) -> GamemodeType {
        self.rules.gamemode_type()
    }

    pub fn base(&self) -> &GamemodeBase {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut GamemodeBase {
        &mut self.base
    }

    pub fn phase(&self) -> RoundPhase {
        self.base.phase()
    }

    /// Run the variant's round-start hook. Call once when the session begins.
    pub fn start_round(&mut self, session: &mut Session<'_>) {
        self.rules.on_round_start(&mut self.base, session);
    }

    pub fn game_win(&mut self, session: &mut Session<'_>) {
        self.base.game_win(session);
    }

    pub fn game_lose(&mut self, session: &mut Session<'_>) {
        self.base.game_lose(session);
    }

    /// Record the death and let the variant decide whether the round is lost.
    pub fn on_player_killed(&mut self, session: &mut Session<'_>, player_id: PlayerId) {
        match session
            .network
            .players_mut()
            .iter_mut()
            .find(|p| p.id == player_id)
        {
            Some(player) => {
                player.state.is_dead = true;
                player.state.deaths += 1;
            },
            None => tracing::warn!(player_id, "Killed player is not in the room"),
        }
        self.rules.on_player_killed(&mut self.base, session, player_id);
    }

    /// The titan must already be reported dead by the entity registry.
    pub fn on_titan_killed(&mut self, session: &mut Session<'_>, titan: &str) {
        self.rules.on_titan_killed(&mut self.base, session, titan);
    }

    pub fn on_player_finished(&mut self, session: &mut Session<'_>, player_id: PlayerId) {
        self.rules.on_player_finished(&mut self.base, session, player_id);
    }

    pub fn on_points_scored(&mut self, session: &mut Session<'_>, side: CaptureSide, points: u32) {
        self.rules.on_points_scored(&mut self.base, session, side, points);
    }

    /// Apply an outcome received from `from`, the transport-level sender.
    pub fn on_net_outcome(&mut self, session: &mut Session<'_>, kind: OutcomeKind, score: u32, from: PlayerId) {
        self.base.on_net_outcome(session, kind, score, from);
    }

    /// Start a new round. Runs on the authority when its countdown expires
    /// and on every other participant when the restart message arrives.
    pub fn on_restart(&mut self, session: &mut Session<'_>) {
        self.base.on_restart(session);
        self.rules.on_round_start(&mut self.base, session);
    }

    /// Per-tick driver entry point.
    pub fn update(&mut self, session: &mut Session<'_>, dt: f32) {
        self.tick_spawns(session);
        self.rules.on_update(&mut self.base, session, dt);
        self.base.core_update(session, dt, &*self.rules);
        if self.base.core_restart_check(session, dt, &*self.rules) {
            self.on_restart(session);
        }
    }

    pub fn titan_configuration(&self, rng: &mut dyn RngCore) -> TitanConfiguration {
        self.rules.titan_configuration(&self.base.titan_factory(), rng)
    }

    pub fn player_titan_configuration(&self, rng: &mut dyn RngCore) -> TitanConfiguration {
        self.rules.player_titan_configuration(&self.base.titan_factory(), rng)
    }

    pub fn player_spawn_location(&self, session: &mut Session<'_>) -> Option<SpawnPoint> {
        self.base.player_spawn_location(session)
    }

    pub fn round_ended_message(&self) -> String {
        self.base.round_ended_message()
    }

    fn tick_spawns(&mut self, session: &mut Session<'_>) {
        let rules = &*self.rules;
        let (spawner, factory, titan_limit) = self.base.spawn_parts();
        if spawner.is_idle() {
            return;
        }
        let mut generate = |source: &mut TitanSource, rng: &mut dyn RngCore| match source {
            TitanSource::Random => rules.titan_configuration(&factory, rng),
            TitanSource::Fixed(titan_type) => factory.of_type(*titan_type, rng),
            TitanSource::Player => rules.player_titan_configuration(&factory, rng),
            TitanSource::Custom(custom) => custom(rng),
        };
        spawner.tick(
            &mut *session.registry,
            &mut *session.rng,
            titan_limit,
            &mut generate,
        );
    }
}
