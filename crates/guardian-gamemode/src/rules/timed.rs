//! Variants that feed titans in on a fixed interval.

use guardian_core::session::Session;
use guardian_core::settings::{CaptureSettings, GamemodeType, RushSettings};

use super::{CaptureSide, GamemodeRules};
use crate::base::GamemodeBase;
use crate::spawner::TitanSource;

/// Fires once every `interval` seconds of accumulated time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnTimer {
    interval: f32,
    elapsed: f32,
}

impl SpawnTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
        }
    }

    /// Returns true when the interval elapsed during this step.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.interval <= 0.0 {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

/// Hold capture points while titans trickle in. The first side to reach
/// `points_to_win` decides the round.
#[derive(Debug, Clone)]
pub struct CaptureRules {
    settings: CaptureSettings,
    timer: SpawnTimer,
    humanity_points: u32,
    titan_points: u32,
}

impl CaptureRules {
    pub fn new(settings: CaptureSettings) -> Self {
        let timer = SpawnTimer::new(settings.spawn_rate_secs);
        Self {
            settings,
            timer,
            humanity_points: 0,
            titan_points: 0,
        }
    }

    pub fn points(&self, side: CaptureSide) -> u32 {
        match side {
            CaptureSide::Humanity => self.humanity_points,
            CaptureSide::Titan => self.titan_points,
        }
    }
}

impl GamemodeRules for CaptureRules {
    fn gamemode_type(&self) -> GamemodeType {
        GamemodeType::Capture
    }

    fn on_round_start(&mut self, _base: &mut GamemodeBase, _session: &mut Session<'_>) {
        self.timer.reset();
        self.humanity_points = 0;
        self.titan_points = 0;
    }

    fn on_update(&mut self, base: &mut GamemodeBase, session: &mut Session<'_>, dt: f32) {
        if !base.outcome().is_decided() && self.timer.tick(dt) {
            base.spawn_titans(session, 1, TitanSource::Random);
        }
    }

    fn on_points_scored(
        &mut self,
        base: &mut GamemodeBase,
        session: &mut Session<'_>,
        side: CaptureSide,
        points: u32,
    ) {
        if base.outcome().is_decided() {
            return;
        }
        let total = match side {
            CaptureSide::Humanity => &mut self.humanity_points,
            CaptureSide::Titan => &mut self.titan_points,
        };
        *total = total.saturating_add(points);
        if *total < self.settings.points_to_win {
            return;
        }
        tracing::info!(?side, points = *total, "Capture goal reached");
        match side {
            CaptureSide::Humanity => base.game_win(session),
            CaptureSide::Titan => base.game_lose(session),
        }
    }

    fn status_top(&self, _base: &GamemodeBase, session: &Session<'_>) -> String {
        format!(
            "| Humanity {} | Titan {} | Goal {} |  Time : {:.0}",
            self.humanity_points,
            self.titan_points,
            self.settings.points_to_win,
            session.display_time()
        )
    }
}

/// A steady rush of titans at a fixed frequency.
#[derive(Debug, Clone)]
pub struct TitanRushRules {
    timer: SpawnTimer,
}

impl TitanRushRules {
    pub fn new(settings: RushSettings) -> Self {
        Self {
            timer: SpawnTimer::new(settings.titan_frequency_secs),
        }
    }
}

impl GamemodeRules for TitanRushRules {
    fn gamemode_type(&self) -> GamemodeType {
        GamemodeType::TitanRush
    }

    fn on_round_start(&mut self, _base: &mut GamemodeBase, _session: &mut Session<'_>) {
        self.timer.reset();
    }

    fn on_update(&mut self, base: &mut GamemodeBase, session: &mut Session<'_>, dt: f32) {
        if !base.outcome().is_decided() && self.timer.tick(dt) {
            base.spawn_titans(session, 1, TitanSource::Random);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_fires_each_interval() {
        let mut timer = SpawnTimer::new(2.0);
        let fired: Vec<bool> = (0..6).map(|_| timer.tick(1.0)).collect();
        assert_eq!(fired, [false, true, false, true, false, true]);
    }

    #[test]
    fn timer_reset_starts_over() {
        let mut timer = SpawnTimer::new(2.0);
        timer.tick(1.5);
        timer.reset();
        assert!(!timer.tick(1.0));
        assert!(timer.tick(1.0));
    }

    #[test]
    fn zero_interval_never_fires() {
        let mut timer = SpawnTimer::new(0.0);
        assert!(!timer.tick(10.0));
    }
}
