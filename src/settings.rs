//! Tunables.  Static values are fixed for the life of the process; the
//! dynamic block is reloaded from a [`DifficultyPreset`] at every round start
//! and only grows through [`Settings::increase_speed`].

use std::fmt;
use std::str::FromStr;

use crate::entities::Difficulty;

/// Frames per second the simulation is tuned for.
pub const FPS: u32 = 60;

pub const SCREEN_WIDTH: f32 = 1200.0;
pub const SCREEN_HEIGHT: f32 = 800.0;

/// Freeze after a lost life: 0.5 s.
pub const PAUSE_FRAMES: u32 = FPS / 2;

/// Explosion display time: 40 ms rounded up to whole frames.
pub const EXPLOSION_FRAMES: u32 = 3;

/// Delay between auto-fired shots while fire is held: 200 ms.
pub const FIRING_DELAY_FRAMES: u64 = 12;

/// Converts a wall-clock period into whole simulation frames (at least one).
pub fn ms_to_frames(ms: u32) -> u32 {
    (ms.saturating_mul(FPS).saturating_add(999) / 1000).max(1)
}

// ── Difficulty lookup ─────────────────────────────────────────────────────────

/// Starting speeds for one difficulty.  Speeds are pixels per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyPreset {
    pub ship_speed: f32,
    pub bullet_speed: f32,
    pub alien_speed: f32,
    /// Time between alien shots.
    pub alien_fire_period_ms: u32,
}

const EASY: DifficultyPreset = DifficultyPreset {
    ship_speed: 4.0,
    bullet_speed: 5.5,
    alien_speed: 1.2,
    alien_fire_period_ms: 1200,
};

const MEDIUM: DifficultyPreset = DifficultyPreset {
    ship_speed: 5.0,
    bullet_speed: 6.5,
    alien_speed: 1.7,
    alien_fire_period_ms: 1000,
};

const HARD: DifficultyPreset = DifficultyPreset {
    ship_speed: 6.0,
    bullet_speed: 7.5,
    alien_speed: 2.2,
    alien_fire_period_ms: 800,
};

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn preset(self) -> DifficultyPreset {
        match self {
            Difficulty::Easy => EASY,
            Difficulty::Medium => MEDIUM,
            Difficulty::Hard => HARD,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_lowercase())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" | "1" => Ok(Difficulty::Easy),
            "medium" | "2" => Ok(Difficulty::Medium),
            "hard" | "3" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{other}' (expected easy, medium or hard)")),
        }
    }
}

// ── Settings ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub screen_width: f32,
    pub screen_height: f32,

    pub ship_width: f32,
    pub ship_height: f32,
    pub ship_limit: u32,

    pub bullet_width: f32,
    pub bullet_height: f32,
    /// Max player bullets on screen at once.
    pub bullet_limit: usize,

    pub alien_width: f32,
    pub alien_height: f32,
    pub fleet_drop_speed: f32,

    pub block_size: f32,
    pub explosion_size: f32,

    pub speedup_scale: f32,
    pub score_scale: f32,

    // Dynamic
    pub ship_speed: f32,
    pub bullet_speed: f32,
    pub alien_speed: f32,
    pub alien_fire_period_ms: u32,
    pub alien_points: u64,
}

impl Settings {
    pub fn new(screen_width: f32, screen_height: f32) -> Self {
        let mut settings = Settings {
            screen_width,
            screen_height,
            ship_width: 48.0,
            ship_height: 40.0,
            ship_limit: 3,
            bullet_width: 3.0,
            bullet_height: 20.0,
            bullet_limit: 8,
            alien_width: 40.0,
            alien_height: 40.0,
            fleet_drop_speed: 10.0,
            block_size: 8.0,
            explosion_size: 48.0,
            speedup_scale: 1.1,
            score_scale: 1.5,
            ship_speed: 0.0,
            bullet_speed: 0.0,
            alien_speed: 0.0,
            alien_fire_period_ms: 0,
            alien_points: 0,
        };
        settings.initialize_dynamic_settings(Difficulty::default());
        settings
    }

    /// Reset everything that grows during a round to the difficulty's
    /// starting values.
    pub fn initialize_dynamic_settings(&mut self, difficulty: Difficulty) {
        let preset = difficulty.preset();
        self.ship_speed = preset.ship_speed;
        self.bullet_speed = preset.bullet_speed;
        self.alien_speed = preset.alien_speed;
        self.alien_fire_period_ms = preset.alien_fire_period_ms;
        self.alien_points = 50;
    }

    /// Applied once per cleared fleet.  Growth is unbounded; the float to
    /// integer cast saturates rather than wrapping.
    pub fn increase_speed(&mut self) {
        self.ship_speed *= self.speedup_scale;
        self.bullet_speed *= self.speedup_scale;
        self.alien_speed *= self.speedup_scale;
        self.alien_points = (self.alien_points as f64 * self.score_scale as f64) as u64;
    }

    pub fn alien_fire_period_frames(&self) -> u32 {
        ms_to_frames(self.alien_fire_period_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}
