use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::GuardianError;
use crate::titan::TitanType;

/// Gamemode discriminator. Nine known variants; anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamemodeType {
    Racing,
    Capture,
    Titans,
    Endless,
    Wave,
    Trost,
    TitanRush,
    PvpAhss,
    Infection,
}

impl GamemodeType {
    pub const ALL: [GamemodeType; 9] = [
        GamemodeType::Racing,
        GamemodeType::Capture,
        GamemodeType::Titans,
        GamemodeType::Endless,
        GamemodeType::Wave,
        GamemodeType::Trost,
        GamemodeType::TitanRush,
        GamemodeType::PvpAhss,
        GamemodeType::Infection,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Racing => "Racing",
            Self::Capture => "Capture",
            Self::Titans => "Titans",
            Self::Endless => "Endless",
            Self::Wave => "Wave",
            Self::Trost => "Trost",
            Self::TitanRush => "TitanRush",
            Self::PvpAhss => "PvpAhss",
            Self::Infection => "Infection",
        }
    }
}

impl fmt::Display for GamemodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GamemodeType {
    type Err = GuardianError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| GuardianError::invalid_config(format!("unknown gamemode type: {s}")))
    }
}

/// How spawned titan health is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthMode {
    /// Uniform in `[min, max]`.
    Fixed,
    /// Uniform in `[min, max]`, scaled by `size / 4`, clamped back to the range.
    Scaled,
    /// Health tracking skipped; titans report 0.
    #[default]
    Disabled,
}

/// Whether players are split into cyan/magenta teams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamMode {
    #[default]
    Disabled,
    Enabled,
}

/// Rule settings shared by every gamemode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GamemodeSettings {
    /// When false, titan types are drawn uniformly and the ratio table is ignored.
    pub custom_titan_ratio: bool,
    /// Weight per archetype. Iteration order is the selector's breakpoint order.
    pub titan_type_ratio: BTreeMap<TitanType, f32>,
    pub disabled_titans: BTreeSet<TitanType>,
    pub titan_health_mode: HealthMode,
    pub titan_health_minimum: u32,
    pub titan_health_maximum: u32,
    pub titan_custom_size: bool,
    pub titan_minimum_size: f32,
    pub titan_maximum_size: f32,
    /// Population cap enforced while spawning.
    pub titan_limit: u32,
    pub human_score: u32,
    pub titan_score: u32,
    pub restart_on_titans_killed: bool,
    /// Greater than zero enables point-scoring mode.
    pub point_mode: u32,
    pub team_mode: TeamMode,
    /// Write round-end notices into the chat feed.
    pub chat_feed: bool,
}

impl Default for GamemodeSettings {
    fn default() -> Self {
        Self {
            custom_titan_ratio: false,
            titan_type_ratio: BTreeMap::new(),
            disabled_titans: BTreeSet::new(),
            titan_health_mode: HealthMode::Disabled,
            titan_health_minimum: 100,
            titan_health_maximum: 200,
            titan_custom_size: false,
            titan_minimum_size: 0.7,
            titan_maximum_size: 3.0,
            titan_limit: 30,
            human_score: 0,
            titan_score: 0,
            restart_on_titans_killed: true,
            point_mode: 0,
            team_mode: TeamMode::Disabled,
            chat_feed: true,
        }
    }
}

impl GamemodeSettings {
    /// Check the invariants the rule engine relies on.
    pub fn validate(&self) -> Result<(), GuardianError> {
        if let Some((titan_type, weight)) = self
            .titan_type_ratio
            .iter()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(GuardianError::invalid_config(format!(
                "titan ratio for {titan_type:?} must be a non-negative number, got {weight}"
            )));
        }
        if self.titan_health_minimum > self.titan_health_maximum {
            return Err(GuardianError::invalid_config(format!(
                "titan health minimum {} exceeds maximum {}",
                self.titan_health_minimum, self.titan_health_maximum
            )));
        }
        if self.titan_custom_size {
            let (min, max) = (self.titan_minimum_size, self.titan_maximum_size);
            if !(min.is_finite() && max.is_finite()) || min <= 0.0 || min > max {
                return Err(GuardianError::invalid_config(format!(
                    "titan size range [{min}, {max}] is invalid"
                )));
            }
        }
        Ok(())
    }

    pub fn is_point_mode(&self) -> bool {
        self.point_mode > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RacingSettings {
    /// End the round for everyone once the first player finishes.
    pub end_on_finish: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CaptureSettings {
    pub points_to_win: u32,
    pub spawn_rate_secs: f32,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            points_to_win: 200,
            spawn_rate_secs: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct KillTitansSettings {
    /// Titans spawned at round start.
    pub titans: u32,
}

impl Default for KillTitansSettings {
    fn default() -> Self {
        Self { titans: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct EndlessSettings {
    /// Titans kept alive at all times.
    pub titans: u32,
}

impl Default for EndlessSettings {
    fn default() -> Self {
        Self { titans: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct WaveSettings {
    pub titans_per_wave: u32,
    /// Clearing this wave wins the round.
    pub max_waves: u32,
}

impl Default for WaveSettings {
    fn default() -> Self {
        Self {
            titans_per_wave: 2,
            max_waves: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct TrostSettings {
    pub titans: u32,
}

impl Default for TrostSettings {
    fn default() -> Self {
        Self { titans: 12 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RushSettings {
    pub titan_frequency_secs: f32,
}

impl Default for RushSettings {
    fn default() -> Self {
        Self {
            titan_frequency_secs: 7.5,
        }
    }
}

/// Player-versus-player rounds carry no settings of their own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PvpAhssSettings {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct InfectionSettings {
    pub infected: u32,
}

impl Default for InfectionSettings {
    fn default() -> Self {
        Self { infected: 1 }
    }
}

/// Variant-specific settings, one payload per [`GamemodeType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VariantSettings {
    Racing(RacingSettings),
    Capture(CaptureSettings),
    Titans(KillTitansSettings),
    Endless(EndlessSettings),
    Wave(WaveSettings),
    Trost(TrostSettings),
    TitanRush(RushSettings),
    PvpAhss(PvpAhssSettings),
    Infection(InfectionSettings),
}

impl VariantSettings {
    pub fn gamemode_type(&self) -> GamemodeType {
        match self {
            Self::Racing(_) => GamemodeType::Racing,
            Self::Capture(_) => GamemodeType::Capture,
            Self::Titans(_) => GamemodeType::Titans,
            Self::Endless(_) => GamemodeType::Endless,
            Self::Wave(_) => GamemodeType::Wave,
            Self::Trost(_) => GamemodeType::Trost,
            Self::TitanRush(_) => GamemodeType::TitanRush,
            Self::PvpAhss(_) => GamemodeType::PvpAhss,
            Self::Infection(_) => GamemodeType::Infection,
        }
    }
}

/// Complete settings for one gamemode instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamemodeConfig {
    pub settings: GamemodeSettings,
    pub variant: VariantSettings,
}

impl GamemodeConfig {
    pub fn gamemode_type(&self) -> GamemodeType {
        self.variant.gamemode_type()
    }
}

fn parse<T: DeserializeOwned>(json: &str, gamemode_type: GamemodeType) -> Result<T, GuardianError> {
    serde_json::from_str(json).map_err(|e| {
        GuardianError::invalid_config(format!("malformed {gamemode_type} settings: {e}"))
    })
}

/// Settings-conversion factory keyed by the gamemode discriminator string.
///
/// The document is read twice: once for the shared [`GamemodeSettings`] and
/// once for the variant's own fields. Unknown keys are ignored by both.
pub fn convert_to_gamemode(json: &str, gamemode_type: &str) -> Result<GamemodeConfig, GuardianError> {
    let gamemode_type: GamemodeType = gamemode_type.parse()?;
    convert_typed(json, gamemode_type)
}

/// Same as [`convert_to_gamemode`] with an already-parsed discriminator.
pub fn convert_typed(json: &str, gamemode_type: GamemodeType) -> Result<GamemodeConfig, GuardianError> {
    let settings: GamemodeSettings = parse(json, gamemode_type)?;
    settings.validate()?;
    let variant = match gamemode_type {
        GamemodeType::Racing => VariantSettings::Racing(parse(json, gamemode_type)?),
        GamemodeType::Capture => VariantSettings::Capture(parse(json, gamemode_type)?),
        GamemodeType::Titans => VariantSettings::Titans(parse(json, gamemode_type)?),
        GamemodeType::Endless => VariantSettings::Endless(parse(json, gamemode_type)?),
        GamemodeType::Wave => VariantSettings::Wave(parse(json, gamemode_type)?),
        GamemodeType::Trost => VariantSettings::Trost(parse(json, gamemode_type)?),
        GamemodeType::TitanRush => VariantSettings::TitanRush(parse(json, gamemode_type)?),
        GamemodeType::PvpAhss => VariantSettings::PvpAhss(parse(json, gamemode_type)?),
        GamemodeType::Infection => VariantSettings::Infection(parse(json, gamemode_type)?),
    };
    tracing::debug!(%gamemode_type, "Converted gamemode settings");
    Ok(GamemodeConfig { settings, variant })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_discriminator_converts() {
        for t in GamemodeType::ALL {
            let config = convert_to_gamemode("{}", t.as_str()).unwrap();
            assert_eq!(config.gamemode_type(), t);
            assert_eq!(config.settings, GamemodeSettings::default());
        }
    }

    #[test]
    fn discriminator_is_case_insensitive() {
        let config = convert_to_gamemode("{}", "titanrush").unwrap();
        assert_eq!(config.gamemode_type(), GamemodeType::TitanRush);
    }

    #[test]
    fn unknown_discriminator_is_invalid_configuration() {
        let err = convert_to_gamemode("{}", "Golf").unwrap_err();
        assert!(matches!(err, GuardianError::InvalidConfiguration(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn unknown_health_mode_is_invalid_configuration() {
        let json = r#"{ "TitanHealthMode": "Regenerating" }"#;
        let err = convert_to_gamemode(json, "Titans").unwrap_err();
        assert!(matches!(err, GuardianError::InvalidConfiguration(_)));
    }

    #[test]
    fn shared_and_variant_fields_both_read() {
        let json = r#"{
            "CustomTitanRatio": true,
            "TitanTypeRatio": { "Normal": 0.5, "Crawler": 0.5 },
            "DisabledTitans": ["Punk"],
            "TitanHealthMode": "Scaled",
            "TitanHealthMinimum": 10,
            "TitanHealthMaximum": 20,
            "TitanLimit": 5,
            "TitansPerWave": 3,
            "MaxWaves": 4
        }"#;
        let config = convert_to_gamemode(json, "Wave").unwrap();
        assert!(config.settings.custom_titan_ratio);
        assert_eq!(config.settings.titan_type_ratio[&TitanType::Normal], 0.5);
        assert!(config.settings.disabled_titans.contains(&TitanType::Punk));
        assert_eq!(config.settings.titan_health_mode, HealthMode::Scaled);
        assert_eq!(config.settings.titan_limit, 5);
        assert_eq!(
            config.variant,
            VariantSettings::Wave(WaveSettings {
                titans_per_wave: 3,
                max_waves: 4
            })
        );
    }

    #[test]
    fn negative_weight_rejected() {
        let json = r#"{ "TitanTypeRatio": { "Normal": -1.0 } }"#;
        assert!(matches!(
            convert_to_gamemode(json, "Titans"),
            Err(GuardianError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn inverted_health_bounds_rejected() {
        let json = r#"{ "TitanHealthMinimum": 50, "TitanHealthMaximum": 10 }"#;
        assert!(convert_to_gamemode(json, "Endless").is_err());
    }

    #[test]
    fn inverted_size_bounds_only_checked_when_custom() {
        let json = r#"{ "TitanMinimumSize": 3.0, "TitanMaximumSize": 1.0 }"#;
        assert!(convert_to_gamemode(json, "Titans").is_ok());
        let json = r#"{ "TitanCustomSize": true, "TitanMinimumSize": 3.0, "TitanMaximumSize": 1.0 }"#;
        assert!(convert_to_gamemode(json, "Titans").is_err());
    }

    #[test]
    fn malformed_json_is_invalid_configuration() {
        let err = convert_to_gamemode("{ not json", "Racing").unwrap_err();
        assert!(matches!(err, GuardianError::InvalidConfiguration(_)));
    }
}
