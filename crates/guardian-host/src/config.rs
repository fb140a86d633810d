use serde::Deserialize;

use guardian_core::error::GuardianError;
use guardian_core::settings::GamemodeType;

/// Highest tick rate accepted. One tick per millisecond.
pub const MAX_TICK_RATE: f32 = 1000.0;

/// Top-level host configuration, loaded from `guardian.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Simulation ticks per second.
    pub tick_rate: f32,
    /// Gamemode discriminator, e.g. `Titans` or `Wave`.
    pub gamemode: String,
    /// JSON gamemode settings document. Defaults apply when unset.
    pub settings_path: Option<String>,
    /// Whether this host is the room authority (master client).
    pub authority: bool,
    pub offline: bool,
    /// Fixed seed for reproducible sessions.
    pub rng_seed: Option<u64>,
    /// Stop after this many ticks. Runs until stopped when unset.
    pub max_ticks: Option<u64>,
    pub arena: ArenaConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tick_rate: 20.0,
            gamemode: "Titans".to_string(),
            settings_path: None,
            authority: true,
            offline: false,
            rng_seed: None,
            max_ticks: None,
            arena: ArenaConfig::default(),
        }
    }
}

/// Layout of the headless arena.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub players: u32,
    pub titan_spawn_points: u32,
    pub player_spawn_points: u32,
    /// Titan spawn points sit on a ring of this radius; player spawns on a
    /// ring of a quarter of it.
    pub radius: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            players: 4,
            titan_spawn_points: 8,
            player_spawn_points: 4,
            radius: 200.0,
        }
    }
}

impl HostConfig {
    pub fn gamemode_type(&self) -> Result<GamemodeType, GuardianError> {
        self.gamemode.parse()
    }

    /// Reject values the host cannot run with, warn about odd ones.
    pub fn validate(&self) -> Result<(), GuardianError> {
        if !self.tick_rate.is_finite() || self.tick_rate <= 0.0 || self.tick_rate > MAX_TICK_RATE {
            return Err(GuardianError::invalid_config(format!(
                "tick_rate must be in (0, {MAX_TICK_RATE}], got {}",
                self.tick_rate
            )));
        }
        self.gamemode_type()?;
        if self.arena.players == 0 {
            return Err(GuardianError::invalid_config("arena.players must be > 0"));
        }
        if !self.arena.radius.is_finite() || self.arena.radius < 0.0 {
            return Err(GuardianError::invalid_config("arena.radius must be >= 0"));
        }
        if self.arena.titan_spawn_points == 0 {
            tracing::warn!("No titan spawn points configured, titan batches will be dropped");
        }
        if self.offline && !self.authority {
            tracing::warn!("Offline host without authority never restarts rounds");
        }
        Ok(())
    }

    /// Load config from `guardian.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("guardian.toml") {
            Ok(content) => match toml::from_str::<HostConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from guardian.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse guardian.toml: {e}, using defaults");
                    HostConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No guardian.toml found, using defaults");
                HostConfig::default()
            },
        };

        if let Ok(val) = std::env::var("GUARDIAN_TICK_RATE")
            && let Ok(rate) = val.parse::<f32>()
        {
            config.tick_rate = rate;
        }
        if let Ok(gamemode) = std::env::var("GUARDIAN_GAMEMODE")
            && !gamemode.is_empty()
        {
            config.gamemode = gamemode;
        }
        if let Ok(path) = std::env::var("GUARDIAN_SETTINGS_PATH")
            && !path.is_empty()
        {
            config.settings_path = Some(path);
        }
        if let Ok(val) = std::env::var("GUARDIAN_AUTHORITY")
            && let Ok(flag) = val.parse::<bool>()
        {
            config.authority = flag;
        }
        if let Ok(val) = std::env::var("GUARDIAN_OFFLINE")
            && let Ok(flag) = val.parse::<bool>()
        {
            config.offline = flag;
        }
        if let Ok(val) = std::env::var("GUARDIAN_RNG_SEED")
            && let Ok(seed) = val.parse::<u64>()
        {
            config.rng_seed = Some(seed);
        }

        config
    }

    /// The gamemode settings document, or an empty one when no path is set.
    pub fn settings_json(&self) -> Result<String, GuardianError> {
        match &self.settings_path {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                GuardianError::invalid_config(format!("cannot read settings {path}: {e}"))
            }),
            None => Ok("{}".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = HostConfig::default();
        assert_eq!(cfg.tick_rate, 20.0);
        assert_eq!(cfg.gamemode_type().unwrap(), GamemodeType::Titans);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parse_minimal_toml() {
        let cfg: HostConfig = toml::from_str(
            r#"
            gamemode = "Wave"
            rng_seed = 9

            [arena]
            players = 2
            "#,
        )
        .unwrap();
        assert_eq!(cfg.gamemode, "Wave");
        assert_eq!(cfg.rng_seed, Some(9));
        assert_eq!(cfg.arena.players, 2);
        assert_eq!(cfg.arena.titan_spawn_points, 8);
        assert!(cfg.authority);
    }

    #[test]
    fn zero_tick_rate_rejected() {
        let cfg = HostConfig {
            tick_rate: 0.0,
            ..HostConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(GuardianError::InvalidConfiguration(_))));
    }

    #[test]
    fn sub_millisecond_tick_period_rejected() {
        let cfg = HostConfig {
            tick_rate: 1.0e9,
            ..HostConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(GuardianError::InvalidConfiguration(_))));
        let cfg = HostConfig {
            tick_rate: MAX_TICK_RATE,
            ..HostConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn unknown_gamemode_rejected() {
        let cfg = HostConfig {
            gamemode: "Golf".to_string(),
            ..HostConfig::default()
        };
        assert!(cfg.validate().unwrap_err().is_fatal());
    }

    #[test]
    fn empty_room_rejected() {
        let mut cfg = HostConfig::default();
        cfg.arena.players = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_settings_file_is_invalid_configuration() {
        let cfg = HostConfig {
            settings_path: Some("/nonexistent/guardian-settings.json".to_string()),
            ..HostConfig::default()
        };
        assert!(matches!(
            cfg.settings_json(),
            Err(GuardianError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn no_settings_path_means_defaults() {
        assert_eq!(HostConfig::default().settings_json().unwrap(), "{}");
    }
}
