//! Behavior shared by every gamemode: round outcome, scoring, HUD status,
//! spawning and restart.

use rand::seq::IndexedRandom;

use guardian_core::chat::{foreign_round_end_line, notice_line};
use guardian_core::net::messages::OutcomeKind;
use guardian_core::player::{PlayerId, all_titan_side_dead};
use guardian_core::session::{LabelPosition, Session, SpawnPoint};
use guardian_core::settings::{GamemodeSettings, TeamMode};
use guardian_core::titan::all_titans_dead;

use crate::config::RulesConfig;
use crate::factory::TitanFactory;
use crate::ledger::{ScoreLedger, reset_round_stats};
use crate::outcome::{CountdownTick, RoundOutcome, RoundPhase};
use crate::rules::GamemodeRules;
use crate::spawner::{SpawnHandle, SpawnScheduler, TitanSource};

/// Appended to the top status while the local player has not picked a side.
pub const NEED_CHOOSE_SIDE: &str = "\n\nPRESS 1 TO ENTER GAME";

/// Per-team kill counts shown in team mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamKills {
    pub cyan: u32,
    pub magenta: u32,
}

/// State and operations common to all gamemode variants.
#[derive(Debug)]
pub struct GamemodeBase {
    settings: GamemodeSettings,
    config: RulesConfig,
    outcome: RoundOutcome,
    ledger: ScoreLedger,
    spawner: SpawnScheduler,
    hud_timer: f32,
    pub need_choose_side: bool,
    pub team_kills: TeamKills,
}

impl GamemodeBase {
    pub fn new(settings: GamemodeSettings, config: RulesConfig) -> Self {
        Self {
            ledger: ScoreLedger::new(settings.human_score, settings.titan_score),
            outcome: RoundOutcome::new(config.game_end_countdown_secs),
            spawner: SpawnScheduler::new(),
            hud_timer: 0.0,
            need_choose_side: false,
            team_kills: TeamKills::default(),
            settings,
            config,
        }
    }

    pub fn settings(&self) -> &GamemodeSettings {
        &self.settings
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn outcome(&self) -> &RoundOutcome {
        &self.outcome
    }

    pub fn phase(&self) -> RoundPhase {
        self.outcome.phase()
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn spawner(&self) -> &SpawnScheduler {
        &self.spawner
    }

    pub fn spawner_mut(&mut self) -> &mut SpawnScheduler {
        &mut self.spawner
    }

    pub fn titan_factory(&self) -> TitanFactory<'_> {
        TitanFactory::new(&self.settings, &self.config)
    }

    /// Split borrow used by the spawn tick: the scheduler, a factory over
    /// the settings and the population cap.
    pub(crate) fn spawn_parts(&mut self) -> (&mut SpawnScheduler, TitanFactory<'_>, u32) {
        (
            &mut self.spawner,
            TitanFactory::new(&self.settings, &self.config),
            self.settings.titan_limit,
        )
    }

    pub fn game_win(&mut self, session: &mut Session<'_>) {
        self.decide(session, OutcomeKind::Win);
    }

    pub fn game_lose(&mut self, session: &mut Session<'_>) {
        self.decide(session, OutcomeKind::Lose);
    }

    fn decide(&mut self, session: &mut Session<'_>, kind: OutcomeKind) {
        if self.outcome.is_decided() {
            tracing::debug!(?kind, phase = ?self.outcome.phase(), "Round already decided");
            return;
        }
        match kind {
            OutcomeKind::Win => session.events.game_won(),
            OutcomeKind::Lose => session.events.game_lost(),
        }
        self.outcome.try_begin(kind.into());
        let score = self.ledger.record(kind);
        session.network.broadcast_outcome(kind, score);
        tracing::info!(
            ?kind,
            score,
            human = self.ledger.human,
            titan = self.ledger.titan,
            round_time = session.clock.round_time,
            "Round decided"
        );
    }

    /// Apply a round outcome relayed by another participant.
    ///
    /// `from` is the sender as reported by the transport, never a field of
    /// the message body.
    pub fn on_net_outcome(&mut self, session: &mut Session<'_>, kind: OutcomeKind, score: u32, from: PlayerId) {
        self.outcome.force(kind.into());
        self.ledger.adopt(kind, score);
        if self.settings.chat_feed {
            let text = match kind {
                OutcomeKind::Win => "Round ended (game win).",
                OutcomeKind::Lose => "Round ended (game lose).",
            };
            let line = notice_line(session.clock.round_time, text);
            session.hud.chat().add_message(&line);
        }
        if !session.is_trusted_sender(from) {
            tracing::warn!(from, ?kind, "Round end from non-master participant");
            session.hud.chat().add_message(&foreign_round_end_line(from));
        }
        tracing::info!(?kind, score, from, "Applied network round outcome");
    }

    pub fn all_titan_side_dead(&self, session: &Session<'_>) -> bool {
        all_titan_side_dead(session.network.players())
    }

    pub fn all_titans_dead(&self, session: &Session<'_>) -> bool {
        all_titans_dead(&session.registry.titans())
    }

    /// Queue `amount` titans over the current titan spawn points.
    ///
    /// Only the authority spawns; elsewhere this is a no-op returning `None`.
    pub fn spawn_titans(
        &mut self,
        session: &mut Session<'_>,
        amount: u32,
        source: TitanSource,
    ) -> Option<SpawnHandle> {
        if !session.network.is_authority() {
            tracing::trace!(amount, "Not authority, skipping spawn");
            return None;
        }
        let points = session.registry.spawn_points(&self.config.titan_spawn_tag);
        Some(self.spawner.start(amount, points, source))
    }

    pub fn player_spawn_location(&self, session: &mut Session<'_>) -> Option<SpawnPoint> {
        let points = session.registry.spawn_points(&self.config.player_spawn_tag);
        points.choose(&mut *session.rng).copied()
    }

    /// Reset for a new round. Scores carry over.
    pub fn on_restart(&mut self, session: &mut Session<'_>) {
        if self.settings.is_point_mode() {
            reset_round_stats(session.network.players_mut());
        }
        // Everyone respawns for the new round.
        for player in session.network.players_mut() {
            player.state.is_dead = false;
        }
        self.spawner.cancel_all();
        self.outcome.reset();
        self.team_kills = TeamKills::default();
        self.hud_timer = 0.0;
        tracing::info!(
            human = self.ledger.human,
            titan = self.ledger.titan,
            "Round restarted"
        );
    }

    /// Periodic HUD refresh of the top status labels.
    pub fn core_update(&mut self, session: &mut Session<'_>, dt: f32, rules: &dyn GamemodeRules) {
        self.hud_timer -= dt;
        if self.hud_timer > 0.0 {
            return;
        }
        self.hud_timer = self.config.hud_refresh_secs;

        let mut top = rules.status_top(self, session);
        if self.settings.team_mode == TeamMode::Enabled {
            top.push_str(&format!(
                "\n<color=#00ffff>Cyan: {}</color><color=#ff00ff>       Magenta: {}</color>",
                self.team_kills.cyan, self.team_kills.magenta
            ));
        }
        session.hud.show_status(LabelPosition::TopCenter, &top, false);
        if self.need_choose_side {
            session.hud.show_status(LabelPosition::TopCenter, NEED_CHOOSE_SIDE, true);
        }
        let right = rules.status_top_right(self, session);
        session.hud.show_status(LabelPosition::TopRight, &right, false);
    }

    /// Show the outcome message and run the restart countdown.
    ///
    /// Returns true when the countdown ran out on the authority, which has
    /// requested the room restart and must now apply it locally.
    pub fn core_restart_check(
        &mut self,
        session: &mut Session<'_>,
        dt: f32,
        rules: &dyn GamemodeRules,
    ) -> bool {
        if self.outcome.awaiting_restart() {
            return false;
        }
        let remaining = self.outcome.countdown();
        let message = match self.outcome.phase() {
            RoundPhase::Idle => return false,
            RoundPhase::Winning => rules.victory_message(self, session, remaining),
            RoundPhase::Losing => rules.defeat_message(self, session, remaining),
        };
        session.hud.show_status(LabelPosition::Center, &message, false);

        if self.outcome.tick(dt) != CountdownTick::Expired {
            return false;
        }
        session.hud.show_status(LabelPosition::Center, "", false);
        if session.network.is_authority() {
            tracing::info!("Restart countdown over, requesting restart");
            session.network.request_restart();
            true
        } else {
            tracing::debug!("Restart countdown over, waiting for authority");
            false
        }
    }

    /// Score line shown when a round ends.
    pub fn round_ended_message(&self) -> String {
        format!("Humanity {} : Titan {}", self.ledger.human, self.ledger.titan)
    }
}
