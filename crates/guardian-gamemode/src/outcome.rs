use serde::{Deserialize, Serialize};

use guardian_core::net::messages::OutcomeKind;

/// Where the current round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    #[default]
    Idle,
    Winning,
    Losing,
}

impl From<OutcomeKind> for RoundPhase {
    fn from(kind: OutcomeKind) -> Self {
        match kind {
            OutcomeKind::Win => Self::Winning,
            OutcomeKind::Lose => Self::Losing,
        }
    }
}

/// Result of advancing the post-round countdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountdownTick {
    /// No outcome yet.
    Idle,
    Running { remaining: f32 },
    /// The countdown just reached zero.
    Expired,
    /// Already at zero, waiting for the restart to arrive.
    Held,
}

/// Round outcome plus the countdown to the next round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundOutcome {
    phase: RoundPhase,
    countdown: f32,
    total: f32,
    expired: bool,
}

impl RoundOutcome {
    pub fn new(total: f32) -> Self {
        Self {
            phase: RoundPhase::Idle,
            countdown: 0.0,
            total,
            expired: false,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn countdown(&self) -> f32 {
        self.countdown
    }

    pub fn total(&self) -> f32 {
        self.total
    }

    /// True once the round has a winner or loser.
    pub fn is_decided(&self) -> bool {
        self.phase != RoundPhase::Idle
    }

    /// True after the countdown ran out and before the restart is applied.
    pub fn awaiting_restart(&self) -> bool {
        self.expired
    }

    /// Enter `phase` from Idle. Returns false if the round was already decided.
    pub fn try_begin(&mut self, phase: RoundPhase) -> bool {
        if self.is_decided() || phase == RoundPhase::Idle {
            return false;
        }
        self.force(phase);
        true
    }

    /// Enter `phase` regardless of the current one. Used for outcomes
    /// relayed by the network, which are applied as received.
    pub fn force(&mut self, phase: RoundPhase) {
        self.phase = phase;
        self.countdown = self.total;
        self.expired = false;
    }

    pub fn tick(&mut self, dt: f32) -> CountdownTick {
        if !self.is_decided() {
            return CountdownTick::Idle;
        }
        if self.expired {
            return CountdownTick::Held;
        }
        self.countdown -= dt;
        if self.countdown <= 0.0 {
            self.countdown = 0.0;
            self.expired = true;
            return CountdownTick::Expired;
        }
        CountdownTick::Running {
            remaining: self.countdown,
        }
    }

    pub fn reset(&mut self) {
        self.phase = RoundPhase::Idle;
        self.countdown = 0.0;
        self.expired = false;
    }
}
