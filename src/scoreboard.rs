//! HUD text, re-prepared only when the number behind it changes.

use crate::stats::GameStats;

/// Round to the nearest ten, ties to an even tens digit, and group
/// thousands: `1234` → `"1,230"`, `1225` → `"1,220"`.
pub fn format_score(score: u64) -> String {
    let tens = score / 10;
    let rounded = match score % 10 {
        0..=4 => tens,
        5 if tens % 2 == 0 => tens,
        _ => tens.saturating_add(1),
    }
    .saturating_mul(10);
    let digits = rounded.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Clone, Debug, Default)]
pub struct Scoreboard {
    pub score_text: String,
    pub high_score_text: String,
    pub level_text: String,
    pub ships_left: u32,
    shown: Option<GameStats>,
}

impl Scoreboard {
    pub fn new(stats: &GameStats) -> Self {
        let mut board = Scoreboard::default();
        board.prep_images(stats);
        board
    }

    /// Prepare every line from scratch.
    pub fn prep_images(&mut self, stats: &GameStats) {
        self.prep_score(stats);
        self.prep_high_score(stats);
        self.prep_level(stats);
        self.prep_ships(stats);
        self.shown = Some(stats.clone());
    }

    pub fn prep_score(&mut self, stats: &GameStats) {
        self.score_text = format!("Score: {}", format_score(stats.score));
    }

    pub fn prep_high_score(&mut self, stats: &GameStats) {
        self.high_score_text = format!("High Score: {}", format_score(stats.high_score));
    }

    pub fn prep_level(&mut self, stats: &GameStats) {
        self.level_text = format!("Level: {}", stats.level);
    }

    pub fn prep_ships(&mut self, stats: &GameStats) {
        self.ships_left = stats.ships_left;
    }

    /// Re-prepare only the lines whose value moved since the last call.
    /// Returns `true` if anything changed.
    pub fn refresh(&mut self, stats: &GameStats) -> bool {
        let Some(shown) = self.shown.clone() else {
            self.prep_images(stats);
            return true;
        };
        if shown == *stats {
            return false;
        }

        if shown.score != stats.score {
            self.prep_score(stats);
        }
        if shown.high_score != stats.high_score {
            self.prep_high_score(stats);
        }
        if shown.level != stats.level {
            self.prep_level(stats);
        }
        if shown.ships_left != stats.ships_left {
            self.prep_ships(stats);
        }
        self.shown = Some(stats.clone());
        true
    }
}
