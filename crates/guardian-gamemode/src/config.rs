use serde::{Deserialize, Serialize};

use guardian_core::session::{PLAYER_SPAWN_TAG, TITAN_SPAWN_TAG};

/// Data-driven tuning shared by every gamemode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Seconds between HUD status refreshes.
    pub hud_refresh_secs: f32,
    /// Seconds between a round outcome and the restart.
    pub game_end_countdown_secs: f32,
    /// Size range used when the settings do not ask for custom sizes.
    pub default_min_size: f32,
    pub default_max_size: f32,
    /// Key label shown in offline victory/defeat messages.
    pub restart_key: String,
    /// Scene tags the spawn points are registered under.
    pub titan_spawn_tag: String,
    pub player_spawn_tag: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            hud_refresh_secs: 1.0,
            game_end_countdown_secs: 9.0,
            default_min_size: 0.7,
            default_max_size: 3.0,
            restart_key: "R".to_string(),
            titan_spawn_tag: TITAN_SPAWN_TAG.to_string(),
            player_spawn_tag: PLAYER_SPAWN_TAG.to_string(),
        }
    }
}

impl RulesConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("GUARDIAN_RULES_CONFIG")
            && let Ok(contents) = std::fs::read_to_string(&path)
        {
            match toml::from_str::<Self>(&contents) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(path, error = %e, "Ignoring malformed rules config"),
            }
        }
        if let Ok(contents) = std::fs::read_to_string("config/rules.toml")
            && let Ok(config) = toml::from_str::<Self>(&contents)
        {
            return config;
        }
        Self::default()
    }
}
