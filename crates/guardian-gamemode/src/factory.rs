use rand::{Rng, RngCore};

use guardian_core::settings::GamemodeSettings;
use guardian_core::titan::{TitanConfiguration, TitanType};

use crate::config::RulesConfig;
use crate::health::roll_health;
use crate::selector::{select_titan_type, select_uniform};

/// Builds titan configurations from the gamemode settings.
#[derive(Debug, Clone, Copy)]
pub struct TitanFactory<'a> {
    pub settings: &'a GamemodeSettings,
    pub rules: &'a RulesConfig,
}

impl<'a> TitanFactory<'a> {
    pub fn new(settings: &'a GamemodeSettings, rules: &'a RulesConfig) -> Self {
        Self { settings, rules }
    }

    /// Archetype for the next spawn: weighted when the settings carry a
    /// custom ratio, uniform otherwise.
    pub fn titan_type(&self, rng: &mut dyn RngCore) -> TitanType {
        if self.settings.custom_titan_ratio {
            select_titan_type(&self.settings.titan_type_ratio, &self.settings.disabled_titans, rng)
        } else {
            select_uniform(rng)
        }
    }

    pub fn size(&self, rng: &mut dyn RngCore) -> f32 {
        let (min, max) = if self.settings.titan_custom_size {
            (self.settings.titan_minimum_size, self.settings.titan_maximum_size)
        } else {
            (self.rules.default_min_size, self.rules.default_max_size)
        };
        if min < max { rng.random_range(min..max) } else { min }
    }

    /// Random size and health for a given archetype.
    pub fn of_type(&self, titan_type: TitanType, rng: &mut dyn RngCore) -> TitanConfiguration {
        let size = self.size(rng);
        let health = roll_health(
            self.settings.titan_health_mode,
            self.settings.titan_health_minimum,
            self.settings.titan_health_maximum,
            size,
            rng,
        );
        TitanConfiguration::new(health, size, titan_type)
    }

    pub fn random(&self, rng: &mut dyn RngCore) -> TitanConfiguration {
        let titan_type = self.titan_type(rng);
        self.of_type(titan_type, rng)
    }

    /// Configuration for a player-controlled titan.
    pub fn player(&self, rng: &mut dyn RngCore) -> TitanConfiguration {
        self.random(rng).with_attacks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardian_core::settings::HealthMode;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn default_settings_use_config_size_range() {
        let settings = GamemodeSettings::default();
        let rules = RulesConfig::default();
        let factory = TitanFactory::new(&settings, &rules);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let config = factory.random(&mut rng);
            assert!((0.7..3.0).contains(&config.size));
            assert_eq!(config.health, 0, "health disabled by default");
            assert!(config.attacks.is_empty());
        }
    }

    #[test]
    fn custom_ratio_and_size_are_honored() {
        let settings = GamemodeSettings {
            custom_titan_ratio: true,
            titan_type_ratio: [(TitanType::Punk, 1.0)].into_iter().collect(),
            titan_custom_size: true,
            titan_minimum_size: 2.0,
            titan_maximum_size: 2.0,
            titan_health_mode: HealthMode::Fixed,
            titan_health_minimum: 50,
            titan_health_maximum: 50,
            ..GamemodeSettings::default()
        };
        let rules = RulesConfig::default();
        let factory = TitanFactory::new(&settings, &rules);
        let mut rng = StdRng::seed_from_u64(2);
        let config = factory.random(&mut rng);
        assert_eq!(config.titan_type, TitanType::Punk);
        assert_eq!(config.size, 2.0);
        assert_eq!(config.health, 50);
    }

    #[test]
    fn player_titan_gets_attacks_unless_weak() {
        let settings = GamemodeSettings {
            custom_titan_ratio: true,
            titan_type_ratio: [(TitanType::Crawler, 1.0)].into_iter().collect(),
            ..GamemodeSettings::default()
        };
        let rules = RulesConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let crawler = TitanFactory::new(&settings, &rules).player(&mut rng);
        assert!(crawler.attacks.is_empty());

        let settings = GamemodeSettings {
            custom_titan_ratio: true,
            titan_type_ratio: [(TitanType::Abnormal, 1.0)].into_iter().collect(),
            ..GamemodeSettings::default()
        };
        let abnormal = TitanFactory::new(&settings, &rules).player(&mut rng);
        assert_eq!(abnormal.attacks.len(), 6);
    }
}
