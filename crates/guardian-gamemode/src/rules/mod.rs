//! Per-variant gamemode rules.
//!
//! Every variant implements [`GamemodeRules`]. The defaults carry the base
//! behavior; a variant overrides only the hooks it changes.

pub mod arena;
pub mod endless;
pub mod timed;
pub mod titans;
pub mod wave;

use rand::RngCore;

use guardian_core::player::PlayerId;
use guardian_core::session::Session;
use guardian_core::settings::{GamemodeType, VariantSettings};
use guardian_core::titan::TitanConfiguration;

use crate::base::GamemodeBase;
use crate::factory::TitanFactory;

/// The side a capture point scores for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSide {
    Humanity,
    Titan,
}

/// Hooks a gamemode variant can override.
pub trait GamemodeRules: Send {
    fn gamemode_type(&self) -> GamemodeType;

    fn titan_configuration(&self, factory: &TitanFactory<'_>, rng: &mut dyn RngCore) -> TitanConfiguration {
        factory.random(rng)
    }

    fn player_titan_configuration(
        &self,
        factory: &TitanFactory<'_>,
        rng: &mut dyn RngCore,
    ) -> TitanConfiguration {
        factory.player(rng)
    }

    /// Runs when the gamemode starts and again after every restart.
    fn on_round_start(&mut self, _base: &mut GamemodeBase, _session: &mut Session<'_>) {}

    fn on_update(&mut self, _base: &mut GamemodeBase, _session: &mut Session<'_>, _dt: f32) {}

    /// The player is already marked dead when this runs.
    fn on_player_killed(&mut self, base: &mut GamemodeBase, session: &mut Session<'_>, _player: PlayerId) {
        if base.all_titan_side_dead(session) {
            base.game_lose(session);
        }
    }

    fn on_titan_killed(&mut self, base: &mut GamemodeBase, session: &mut Session<'_>, _titan: &str) {
        if base.settings().restart_on_titans_killed && base.all_titans_dead(session) {
            self.on_all_titans_dead(base, session);
        }
    }

    fn on_all_titans_dead(&mut self, _base: &mut GamemodeBase, _session: &mut Session<'_>) {}

    fn on_player_finished(&mut self, _base: &mut GamemodeBase, _session: &mut Session<'_>, player: PlayerId) {
        tracing::debug!(player, gamemode = %self.gamemode_type(), "Finish has no effect here");
    }

    /// Points earned by holding capture points.
    fn on_points_scored(
        &mut self,
        _base: &mut GamemodeBase,
        _session: &mut Session<'_>,
        side: CaptureSide,
        points: u32,
    ) {
        tracing::debug!(?side, points, gamemode = %self.gamemode_type(), "Capture points have no effect here");
    }

    fn victory_message(&self, base: &GamemodeBase, session: &Session<'_>, time_until_restart: f32) -> String {
        victory_text(
            session.network.is_offline(),
            &base.config().restart_key,
            time_until_restart,
        )
    }

    fn defeat_message(&self, base: &GamemodeBase, session: &Session<'_>, time_until_restart: f32) -> String {
        defeat_text(
            session.network.is_offline(),
            &base.config().restart_key,
            time_until_restart,
        )
    }

    fn status_top(&self, _base: &GamemodeBase, session: &Session<'_>) -> String {
        format!(
            "Titan Left: {}  Time : {:.0}",
            session.registry.count_live_titans(),
            session.display_time()
        )
    }

    fn status_top_right(&self, base: &GamemodeBase, _session: &Session<'_>) -> String {
        let ledger = base.ledger();
        format!("Humanity {} : Titan {} ", ledger.human, ledger.titan)
    }
}

pub fn victory_text(offline: bool, restart_key: &str, time_until_restart: f32) -> String {
    if offline {
        format!("Humanity Win!\n Press {restart_key} to Restart.\n\n\n")
    } else {
        format!("Humanity Win!\nGame Restart in {}s\n\n", time_until_restart as u32)
    }
}

pub fn defeat_text(offline: bool, restart_key: &str, time_until_restart: f32) -> String {
    if offline {
        format!("Humanity Fail!\n Press {restart_key} to Restart.\n\n\n")
    } else {
        format!("Humanity Fail!\nAgain!\nGame Restart in {}s\n\n", time_until_restart as u32)
    }
}

/// Build the rules object for a converted settings document.
pub fn create_rules(variant: &VariantSettings) -> Box<dyn GamemodeRules> {
    match variant {
        VariantSettings::Racing(s) => Box::new(arena::RacingRules::new(s.clone())),
        VariantSettings::Capture(s) => Box::new(timed::CaptureRules::new(s.clone())),
        VariantSettings::Titans(s) => Box::new(titans::KillTitansRules::new(s.clone())),
        VariantSettings::Endless(s) => Box::new(endless::EndlessRules::new(s.clone())),
        VariantSettings::Wave(s) => Box::new(wave::WaveRules::new(s.clone())),
        VariantSettings::Trost(s) => Box::new(titans::TrostRules::new(s.clone())),
        VariantSettings::TitanRush(s) => Box::new(timed::TitanRushRules::new(s.clone())),
        VariantSettings::PvpAhss(_) => Box::new(arena::PvpAhssRules),
        VariantSettings::Infection(s) => Box::new(arena::InfectionRules::new(s.clone())),
    }
}
