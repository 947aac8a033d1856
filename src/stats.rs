//! Per-round counters plus the all-time high score.

#[derive(Clone, Debug, PartialEq)]
pub struct GameStats {
    pub score: u64,
    pub high_score: u64,
    pub ships_left: u32,
    /// Starts at 1 and goes up by one per cleared fleet.
    pub level: u32,
}

impl GameStats {
    pub fn new(ship_limit: u32, high_score: u64) -> Self {
        GameStats {
            score: 0,
            high_score,
            ships_left: ship_limit,
            level: 1,
        }
    }

    /// Start-of-round reset.  The high score survives.
    pub fn reset_stats(&mut self, ship_limit: u32) {
        self.ships_left = ship_limit;
        self.score = 0;
        self.level = 1;
    }

    /// Add points and lift the high score if it was beaten.  Returns `true`
    /// when the high score changed.
    pub fn add_score(&mut self, points: u64) -> bool {
        self.score = self.score.saturating_add(points);
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }

    /// Returns the number of ships remaining after the loss.
    pub fn lose_ship(&mut self) -> u32 {
        self.ships_left = self.ships_left.saturating_sub(1);
        self.ships_left
    }
}
