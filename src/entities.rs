//! Entity types and the master game state. Pure data, no rules.
//!
//! Positions live in the logical playfield (pixel units, origin top-left,
//! y grows downward).  The renderer scales them to whatever surface it has.

use crate::fleet::{Fleet, FleetLayout};
use crate::settings::Settings;
use crate::stats::GameStats;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn mid_top(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y)
    }

    pub fn mid_bottom(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h)
    }

    /// Rect of the given size whose centre sits at `(cx, cy)`.
    pub fn centered_at(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Rect::new(cx - w / 2.0, cy - h / 2.0, w, h)
    }

    /// Rect of the given size whose top edge is centred on `(cx, top)`.
    pub fn with_mid_top(cx: f32, top: f32, w: f32, h: f32) -> Self {
        Rect::new(cx - w / 2.0, top, w, h)
    }

    /// Strict overlap: rects that merely share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Anything that occupies a box on the playfield.
pub trait Bounded {
    fn rect(&self) -> &Rect;
}

// ── Difficulty & status ───────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    /// Chosen by the default-key shortcut.
    #[default]
    Medium,
    Hard,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameStatus {
    /// Title screen, waiting for a difficulty choice.
    Menu,
    Active,
    /// Short freeze after losing a life.  `ship_visible` is false when the
    /// ship itself was destroyed (as opposed to an alien landing).
    Paused { frames_left: u32, ship_visible: bool },
    /// Lives exhausted; the menu is shown again over the final frame.
    GameOver,
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Snapshot of the player's held inputs for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    /// Fire is held down.  Shots are paced by the auto-fire delay.
    pub fire: bool,
    /// Fire went down this frame.  Shoots at once, no delay.
    pub fire_pressed: bool,
}

// ── Entities ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Ship {
    pub rect: Rect,
}

/// A straight-moving projectile.  Direction is implied by the collection it
/// lives in: player bullets travel up, alien bullets travel down.
#[derive(Clone, Debug)]
pub struct Bullet {
    pub rect: Rect,
}

#[derive(Clone, Debug)]
pub struct Alien {
    pub rect: Rect,
}

/// One cell of a shield.
#[derive(Clone, Debug)]
pub struct Block {
    pub rect: Rect,
}

/// A brief visual flash left behind by a destroyed alien or ship.
#[derive(Clone, Debug)]
pub struct Explosion {
    pub rect: Rect,
    /// Remaining frames to display.
    pub frames_left: u32,
}

impl Bounded for Ship {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

impl Bounded for Bullet {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

impl Bounded for Alien {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

impl Bounded for Block {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

impl Bounded for Explosion {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

// ── Events ────────────────────────────────────────────────────────────────────

/// Things that happened during one tick.  Front ends map these to sounds,
/// log lines or screen flashes.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    BulletFired,
    AlienBulletFired,
    AliensDestroyed { count: usize, points: u64 },
    BlocksDestroyed { count: usize },
    /// An alien flew through part of a shield.
    ShieldBreached { count: usize },
    ShipDestroyed,
    AlienReachedBottom,
    LifeLost { ships_left: u32 },
    LevelCleared { new_level: u32 },
    NewHighScore { score: u64 },
    GameOver { score: u64 },
}

// ── Master game state ─────────────────────────────────────────────────────────

/// Everything the simulation owns.  The loop holds the only instance and
/// lends it to `compute` by `&mut`.
#[derive(Clone, Debug)]
pub struct GameState {
    pub settings: Settings,
    pub stats: GameStats,
    pub status: GameStatus,
    /// Difficulty of the current (or last) round.
    pub difficulty: Difficulty,
    pub layout: FleetLayout,
    pub ship: Ship,
    /// Player bullets, travelling up.
    pub bullets: Vec<Bullet>,
    /// Alien bullets, travelling down.
    pub alien_bullets: Vec<Bullet>,
    pub fleet: Fleet,
    pub blocks: Vec<Block>,
    pub explosions: Vec<Explosion>,
    pub frame: u64,
    /// Frame of the most recent player shot, for auto-fire pacing.
    pub last_fired_frame: Option<u64>,
    /// Frames until the next alien shot.
    pub alien_fire_countdown: u32,
}

impl GameState {
    /// True while the title menu is up and a difficulty can be chosen.
    pub fn in_menu(&self) -> bool {
        matches!(self.status, GameStatus::Menu | GameStatus::GameOver)
    }

    /// Whether the player ship should be drawn this frame.
    pub fn ship_visible(&self) -> bool {
        match self.status {
            GameStatus::Active => true,
            GameStatus::Paused { ship_visible, .. } => ship_visible,
            GameStatus::Menu | GameStatus::GameOver => false,
        }
    }
}
