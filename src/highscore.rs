//! Score and high score tracking
//!
//! The high score is read once when the board is created and written back
//! through the settings store whenever the running score beats it.

use crate::persistence::SettingsStore;

/// Store key for the persisted high score
pub const HIGH_SCORE_KEY: &str = "snowtoss_high_score";

/// Running score for the current round plus the persisted best
#[derive(Debug, Clone, Default)]
pub struct ScoreBoard {
    /// Points this round
    pub score: u32,
    /// Best score ever (persisted)
    pub high_score: u32,
    /// Snowballs tossed this round
    pub throws: u32,
    /// Rings scored this round
    pub rings_scored: u32,
}

impl ScoreBoard {
    /// Create a board seeded with the stored high score
    pub fn load(store: &dyn SettingsStore) -> Self {
        let high_score = match store.get_int(HIGH_SCORE_KEY) {
            Some(value) => {
                log::info!("Loaded high score {}", value);
                value.clamp(0, u32::MAX as i64) as u32
            }
            None => {
                log::info!("No high score found, starting fresh");
                0
            }
        };
        Self {
            high_score,
            ..Self::default()
        }
    }

    /// Add points; returns true if this set a new high score
    pub fn add_points(&mut self, points: u32) -> bool {
        self.score = self.score.saturating_add(points);
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }

    pub fn record_throw(&mut self) {
        self.throws += 1;
    }

    pub fn record_ring(&mut self, points: u32) -> bool {
        self.rings_scored += 1;
        self.add_points(points)
    }

    /// Reset the round (high score is kept)
    pub fn reset_round(&mut self) {
        self.score = 0;
        self.throws = 0;
        self.rings_scored = 0;
    }

    /// Write the high score; failures are logged, not returned
    pub fn save(&self, store: &mut dyn SettingsStore) {
        match store.set_int(HIGH_SCORE_KEY, self.high_score as i64) {
            Ok(()) => log::info!("High score saved ({})", self.high_score),
            Err(e) => log::warn!("Failed to save high score: {}", e),
        }
    }
}
