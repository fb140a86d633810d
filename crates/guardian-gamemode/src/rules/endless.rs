use guardian_core::session::Session;
use guardian_core::settings::{EndlessSettings, GamemodeType};

use super::GamemodeRules;
use crate::base::GamemodeBase;
use crate::spawner::TitanSource;

/// Every kill brings a replacement. The round never ends in victory.
#[derive(Debug, Clone)]
pub struct EndlessRules {
    settings: EndlessSettings,
}

impl EndlessRules {
    pub fn new(settings: EndlessSettings) -> Self {
        Self { settings }
    }
}

impl GamemodeRules for EndlessRules {
    fn gamemode_type(&self) -> GamemodeType {
        GamemodeType::Endless
    }

    fn on_round_start(&mut self, base: &mut GamemodeBase, session: &mut Session<'_>) {
        base.spawn_titans(session, self.settings.titans, TitanSource::Random);
    }

    fn on_titan_killed(&mut self, base: &mut GamemodeBase, session: &mut Session<'_>, titan: &str) {
        if base.outcome().is_decided() {
            return;
        }
        tracing::debug!(titan, "Replacing killed titan");
        base.spawn_titans(session, 1, TitanSource::Random);
    }
}
