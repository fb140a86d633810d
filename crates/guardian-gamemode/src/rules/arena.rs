//! Variants without titan spawning.

use rand::seq::IndexedRandom;

use guardian_core::player::PlayerId;
use guardian_core::session::Session;
use guardian_core::settings::{GamemodeType, InfectionSettings, RacingSettings};

use super::GamemodeRules;
use crate::base::GamemodeBase;

/// Race to the finish. Dying only costs time.
#[derive(Debug, Clone)]
pub struct RacingRules {
    settings: RacingSettings,
}

impl RacingRules {
    pub fn new(settings: RacingSettings) -> Self {
        Self { settings }
    }

}

impl GamemodeRules for RacingRules {
    fn gamemode_type(&self) -> GamemodeType {
        GamemodeType::Racing
    }

    fn on_player_killed(&mut self, _base: &mut GamemodeBase, _session: &mut Session<'_>, player: PlayerId) {
        tracing::trace!(player, "Racer died, round continues");
    }

    fn on_player_finished(&mut self, base: &mut GamemodeBase, session: &mut Session<'_>, player: PlayerId) {
        if !self.settings.end_on_finish {
            tracing::info!(player, "Racer finished");
            return;
        }
        tracing::info!(player, "Racer finished, ending round");
        base.game_win(session);
    }

    fn status_top(&self, _base: &GamemodeBase, session: &Session<'_>) -> String {
        format!("Time : {:.0}", session.display_time())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PvpAhssRules;

impl GamemodeRules for PvpAhssRules {
    fn gamemode_type(&self) -> GamemodeType {
        GamemodeType::PvpAhss
    }
}

#[derive(Debug, Clone)]
pub struct InfectionRules {
    settings: InfectionSettings,
}

impl InfectionRules {
    pub fn new(settings: InfectionSettings) -> Self {
        Self { settings }
    }
}

impl GamemodeRules for InfectionRules {
    fn gamemode_type(&self) -> GamemodeType {
        GamemodeType::Infection
    }

    /// The authority picks the infected players; everyone else is human.
    fn on_round_start(&mut self, _base: &mut GamemodeBase, session: &mut Session<'_>) {
        if !session.network.is_authority() {
            return;
        }
        let ids: Vec<PlayerId> = session.network.players().iter().map(|p| p.id).collect();
        let infected: Vec<PlayerId> = ids
            .choose_multiple(&mut *session.rng, self.settings.infected as usize)
            .copied()
            .collect();
        for player in session.network.players_mut() {
            player.state.is_titan_side = infected.contains(&player.id);
        }
        tracing::info!(?infected, "Infection round started");
    }
}
