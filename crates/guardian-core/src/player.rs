use serde::{Deserialize, Serialize};

/// Unique identifier for a player in the room.
pub type PlayerId = u32;

/// A participant in the room, as known to the network layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Whether this participant currently holds scheduling authority.
    pub is_master: bool,
    pub state: PlayerState,
}

/// Per-player round state replicated by the network layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Player is on the titan side (a defender in loss evaluation).
    pub is_titan_side: bool,
    pub is_dead: bool,
    pub kills: u32,
    pub deaths: u32,
    pub max_damage: u32,
    pub total_damage: u32,
}

impl PlayerState {
    /// Zero the per-round statistics, keeping side and life state.
    pub fn reset_round_stats(&mut self) {
        self.kills = 0;
        self.deaths = 0;
        self.max_damage = 0;
        self.total_damage = 0;
    }
}

/// True when every titan-side player is dead. Vacuously true when nobody is
/// on the titan side.
pub fn all_titan_side_dead(players: &[Player]) -> bool {
    players
        .iter()
        .filter(|p| p.state.is_titan_side)
        .all(|p| p.state.is_dead)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: PlayerId, is_titan_side: bool, is_dead: bool) -> Player {
        Player {
            id,
            name: format!("Player{id}"),
            is_master: id == 1,
            state: PlayerState {
                is_titan_side,
                is_dead,
                ..PlayerState::default()
            },
        }
    }

    #[test]
    fn all_dead_ignores_humans() {
        let players = [player(1, true, true), player(2, false, false)];
        assert!(all_titan_side_dead(&players));
    }

    #[test]
    fn one_living_defender_blocks() {
        let players = [player(1, true, true), player(2, true, false)];
        assert!(!all_titan_side_dead(&players));
    }

    #[test]
    fn empty_side_is_all_dead() {
        assert!(all_titan_side_dead(&[]));
        assert!(all_titan_side_dead(&[player(1, false, false)]));
    }

    #[test]
    fn reset_keeps_side_and_life() {
        let mut state = PlayerState {
            is_titan_side: true,
            is_dead: true,
            kills: 4,
            deaths: 2,
            max_damage: 900,
            total_damage: 2100,
        };
        state.reset_round_stats();
        assert!(state.is_titan_side);
        assert!(state.is_dead);
        assert_eq!(state.kills, 0);
        assert_eq!(state.deaths, 0);
        assert_eq!(state.max_damage, 0);
        assert_eq!(state.total_damage, 0);
    }
}
