use guardian_core::session::Session;
use guardian_core::settings::{GamemodeType, WaveSettings};

use super::GamemodeRules;
use crate::base::GamemodeBase;
use crate::spawner::TitanSource;

/// Waves of growing size; clearing the last wave wins.
#[derive(Debug, Clone)]
pub struct WaveRules {
    settings: WaveSettings,
    wave: u32,
}

impl WaveRules {
    pub fn new(settings: WaveSettings) -> Self {
        Self { settings, wave: 1 }
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }
}

impl GamemodeRules for WaveRules {
    fn gamemode_type(&self) -> GamemodeType {
        GamemodeType::Wave
    }

    fn on_round_start(&mut self, base: &mut GamemodeBase, session: &mut Session<'_>) {
        self.wave = 1;
        base.spawn_titans(session, self.settings.titans_per_wave, TitanSource::Random);
    }

    /// Waves advance whether or not the settings restart on titans killed.
    fn on_titan_killed(&mut self, base: &mut GamemodeBase, session: &mut Session<'_>, _titan: &str) {
        if base.all_titans_dead(session) {
            self.on_all_titans_dead(base, session);
        }
    }

    fn on_all_titans_dead(&mut self, base: &mut GamemodeBase, session: &mut Session<'_>) {
        if !base.spawner().is_idle() || base.outcome().is_decided() {
            return;
        }
        if self.wave >= self.settings.max_waves {
            base.game_win(session);
            return;
        }
        self.wave += 1;
        let amount = self.wave.saturating_mul(self.settings.titans_per_wave);
        tracing::info!(wave = self.wave, amount, "Next wave");
        base.spawn_titans(session, amount, TitanSource::Random);
    }

    fn status_top(&self, _base: &GamemodeBase, session: &Session<'_>) -> String {
        format!(
            "Titan Left: {} Wave : {}",
            session.registry.count_live_titans(),
            self.wave
        )
    }
}
