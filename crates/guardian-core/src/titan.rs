use serde::{Deserialize, Serialize};

/// Titan archetype used for spawn selection.
///
/// Declaration order matters: it is the order of [`TitanType::ALL`] and of the
/// cumulative breakpoints built by the weighted selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TitanType {
    Normal,
    Abnormal,
    Jumper,
    Punk,
    Crawler,
    Stalker,
    Burster,
}

impl TitanType {
    /// Every archetype, in declaration order.
    pub const ALL: [TitanType; 7] = [
        TitanType::Normal,
        TitanType::Abnormal,
        TitanType::Jumper,
        TitanType::Punk,
        TitanType::Crawler,
        TitanType::Stalker,
        TitanType::Burster,
    ];

    /// Crawlers cannot perform melee attacks.
    pub fn is_weak(self) -> bool {
        self == TitanType::Crawler
    }
}

/// Melee attack capability granted to a titan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attack {
    Kick,
    Slap,
    SlapFace,
    Bite,
    BodySlam,
    Grab,
}

impl Attack {
    /// The full melee set given to every non-weak titan.
    pub const MELEE: [Attack; 6] = [
        Attack::Kick,
        Attack::Slap,
        Attack::SlapFace,
        Attack::Bite,
        Attack::BodySlam,
        Attack::Grab,
    ];

    /// Attack set for an archetype: empty for weak titans, otherwise the
    /// six melee attacks.
    pub fn set_for(titan_type: TitanType) -> Vec<Attack> {
        if titan_type.is_weak() {
            Vec::new()
        } else {
            Self::MELEE.to_vec()
        }
    }
}

/// Base damage dealt by a spawned titan.
pub const BASE_DAMAGE: u32 = 10;
/// Base view distance of a spawned titan.
pub const BASE_VIEW_DISTANCE: u32 = 100;
/// Base movement speed of a spawned titan.
pub const BASE_SPEED: f32 = 150.0;

/// Everything the entity registry needs to create one titan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitanConfiguration {
    /// 0 means health tracking is disabled (unkillable by damage).
    pub health: u32,
    pub damage: u32,
    pub view_distance: u32,
    pub speed: f32,
    pub size: f32,
    pub titan_type: TitanType,
    pub attacks: Vec<Attack>,
}

impl TitanConfiguration {
    /// A configuration with base stats and no attacks.
    pub fn new(health: u32, size: f32, titan_type: TitanType) -> Self {
        Self {
            health,
            damage: BASE_DAMAGE,
            view_distance: BASE_VIEW_DISTANCE,
            speed: BASE_SPEED,
            size,
            titan_type,
            attacks: Vec::new(),
        }
    }

    /// Attach the attack set matching this configuration's archetype.
    pub fn with_attacks(mut self) -> Self {
        self.attacks = Attack::set_for(self.titan_type);
        self
    }
}

/// Lifecycle of a mindless titan as reported by the entity registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitanLifecycle {
    Idle,
    Wandering,
    Chasing,
    Attacking,
    Dead,
}

/// Kind of entity found under the "titan" tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitanKind {
    /// The basic attacker type; counts as dead only in [`TitanLifecycle::Dead`].
    Mindless { state: TitanLifecycle },
    /// Boss variant. Its presence alone means not all titans are dead.
    Female,
}

/// A titan entity as enumerated from the scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitanHandle {
    pub name: String,
    pub kind: TitanKind,
}

impl TitanHandle {
    pub fn is_dead(&self) -> bool {
        matches!(
            self.kind,
            TitanKind::Mindless {
                state: TitanLifecycle::Dead
            }
        )
    }
}

/// True when every titan is confirmed dead. Any boss variant fails the check.
pub fn all_titans_dead(titans: &[TitanHandle]) -> bool {
    titans.iter().all(TitanHandle::is_dead)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mindless(state: TitanLifecycle) -> TitanHandle {
        TitanHandle {
            name: "titan".to_string(),
            kind: TitanKind::Mindless { state },
        }
    }

    #[test]
    fn crawler_has_no_attacks() {
        let config = TitanConfiguration::new(100, 1.0, TitanType::Crawler).with_attacks();
        assert!(config.attacks.is_empty());
    }

    #[test]
    fn other_archetypes_get_full_melee_set() {
        for titan_type in TitanType::ALL.into_iter().filter(|t| !t.is_weak()) {
            let config = TitanConfiguration::new(100, 1.0, titan_type).with_attacks();
            assert_eq!(config.attacks, Attack::MELEE.to_vec());
        }
    }

    #[test]
    fn base_stats_applied() {
        let config = TitanConfiguration::new(42, 2.5, TitanType::Punk);
        assert_eq!(config.damage, 10);
        assert_eq!(config.view_distance, 100);
        assert_eq!(config.speed, 150.0);
        assert_eq!(config.health, 42);
    }

    #[test]
    fn all_dead_requires_dead_lifecycle() {
        assert!(all_titans_dead(&[]));
        assert!(all_titans_dead(&[mindless(TitanLifecycle::Dead)]));
        assert!(!all_titans_dead(&[
            mindless(TitanLifecycle::Dead),
            mindless(TitanLifecycle::Chasing),
        ]));
    }

    #[test]
    fn female_titan_fails_all_dead_check() {
        let female = TitanHandle {
            name: "female".to_string(),
            kind: TitanKind::Female,
        };
        assert!(!all_titans_dead(&[mindless(TitanLifecycle::Dead), female]));
    }
}
