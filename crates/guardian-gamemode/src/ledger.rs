use serde::{Deserialize, Serialize};

use guardian_core::net::messages::OutcomeKind;
use guardian_core::player::Player;

/// Human and titan round scores across a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLedger {
    pub human: u32,
    pub titan: u32,
}

impl ScoreLedger {
    pub fn new(human: u32, titan: u32) -> Self {
        Self { human, titan }
    }

    /// Add one round to the side that `kind` credits. Returns the new score.
    pub fn record(&mut self, kind: OutcomeKind) -> u32 {
        let side = self.side_mut(kind);
        *side = side.saturating_add(1);
        *side
    }

    /// Overwrite one side with a score received from the network.
    pub fn adopt(&mut self, kind: OutcomeKind, score: u32) {
        *self.side_mut(kind) = score;
    }

    pub fn score(&self, kind: OutcomeKind) -> u32 {
        match kind {
            OutcomeKind::Win => self.human,
            OutcomeKind::Lose => self.titan,
        }
    }

    fn side_mut(&mut self, kind: OutcomeKind) -> &mut u32 {
        match kind {
            OutcomeKind::Win => &mut self.human,
            OutcomeKind::Lose => &mut self.titan,
        }
    }
}

/// Zero every player's kills, deaths and damage for a new point-mode round.
pub fn reset_round_stats(players: &mut [Player]) {
    for player in players {
        player.state.reset_round_stats();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardian_core::test_helpers::make_players;

    #[test]
    fn record_increments_one_side() {
        let mut ledger = ScoreLedger::new(2, 5);
        assert_eq!(ledger.record(OutcomeKind::Win), 3);
        assert_eq!(ledger, ScoreLedger::new(3, 5));
        assert_eq!(ledger.record(OutcomeKind::Lose), 6);
        assert_eq!(ledger, ScoreLedger::new(3, 6));
    }

    #[test]
    fn adopt_overwrites_verbatim() {
        let mut ledger = ScoreLedger::new(10, 10);
        ledger.adopt(OutcomeKind::Lose, 7);
        assert_eq!(ledger.score(OutcomeKind::Lose), 7);
        assert_eq!(ledger.score(OutcomeKind::Win), 10);
    }

    #[test]
    fn reset_round_stats_keeps_membership() {
        let mut players = make_players(3, 1);
        for p in &mut players {
            p.state.kills = 4;
            p.state.deaths = 2;
            p.state.max_damage = 900;
            p.state.total_damage = 2000;
            p.state.is_dead = true;
        }
        reset_round_stats(&mut players);
        for p in &players {
            assert_eq!(p.state.kills, 0);
            assert_eq!(p.state.deaths, 0);
            assert_eq!(p.state.max_damage, 0);
            assert_eq!(p.state.total_damage, 0);
        }
        assert!(players[0].state.is_titan_side);
    }
}
