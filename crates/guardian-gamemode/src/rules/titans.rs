use guardian_core::session::Session;
use guardian_core::settings::{GamemodeType, KillTitansSettings, TrostSettings};

use super::GamemodeRules;
use crate::base::GamemodeBase;
use crate::spawner::TitanSource;

/// Kill every titan to win the round.
#[derive(Debug, Clone)]
pub struct KillTitansRules {
    settings: KillTitansSettings,
}

impl KillTitansRules {
    pub fn new(settings: KillTitansSettings) -> Self {
        Self { settings }
    }
}

impl GamemodeRules for KillTitansRules {
    fn gamemode_type(&self) -> GamemodeType {
        GamemodeType::Titans
    }

    fn on_round_start(&mut self, base: &mut GamemodeBase, session: &mut Session<'_>) {
        base.spawn_titans(session, self.settings.titans, TitanSource::Random);
    }

    fn on_all_titans_dead(&mut self, base: &mut GamemodeBase, session: &mut Session<'_>) {
        // Titans still queued for this round count as alive.
        if !base.spawner().is_idle() {
            return;
        }
        base.game_win(session);
    }
}

/// Defend the gate against a fixed titan force.
#[derive(Debug, Clone)]
pub struct TrostRules {
    settings: TrostSettings,
}

impl TrostRules {
    pub fn new(settings: TrostSettings) -> Self {
        Self { settings }
    }
}

impl GamemodeRules for TrostRules {
    fn gamemode_type(&self) -> GamemodeType {
        GamemodeType::Trost
    }

    fn on_round_start(&mut self, base: &mut GamemodeBase, session: &mut Session<'_>) {
        base.spawn_titans(session, self.settings.titans, TitanSource::Random);
    }
}
