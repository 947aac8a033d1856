//! Game rules.
//!
//! Every function takes the one `GameState` by `&mut` and updates it in
//! place.  Randomness only enters through an injected RNG, so a seeded RNG
//! replays a round exactly.  Collisions are resolved by marking dead
//! entities first and sweeping each collection afterwards.

use rand::Rng;
use tracing::info;

use crate::collision::{collide_any, collide_rect, group_collide, mask_from, sweep};
use crate::entities::{
    Block, Bullet, Controls, Difficulty, Explosion, GameEvent, GameState, GameStatus, Rect, Ship,
};
use crate::fleet::{Fleet, FleetLayout};
use crate::settings::{Settings, EXPLOSION_FRAMES, FIRING_DELAY_FRAMES, PAUSE_FRAMES};
use crate::shields::create_shields;
use crate::stats::GameStats;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the start-up state: menu showing, shields standing, no fleet yet.
pub fn init_state(screen_width: f32, screen_height: f32, high_score: u64) -> GameState {
    let settings = Settings::new(screen_width, screen_height);
    let layout = FleetLayout::new(settings.alien_width, settings.alien_height);
    let ship = Ship {
        rect: centered_ship_rect(&settings),
    };
    let blocks = create_shields(screen_width, screen_height, settings.block_size);
    let alien_fire_countdown = settings.alien_fire_period_frames();

    GameState {
        stats: GameStats::new(settings.ship_limit, high_score),
        status: GameStatus::Menu,
        difficulty: Difficulty::default(),
        layout,
        ship,
        bullets: Vec::new(),
        alien_bullets: Vec::new(),
        fleet: Fleet::default(),
        blocks,
        explosions: Vec::new(),
        frame: 0,
        last_fired_frame: None,
        alien_fire_countdown,
        settings,
    }
}

/// Ship rect sitting on the bottom edge, centred horizontally.
fn centered_ship_rect(settings: &Settings) -> Rect {
    Rect::new(
        (settings.screen_width - settings.ship_width) / 2.0,
        settings.screen_height - settings.ship_height,
        settings.ship_width,
        settings.ship_height,
    )
}

pub fn center_ship(state: &mut GameState) {
    state.ship.rect = centered_ship_rect(&state.settings);
}

// ── Round / level transitions ───────────────────────────────────────────────

/// Begin a new round on `difficulty`.  Resets stats and dynamic settings,
/// clears every transient entity and rebuilds fleet and shields.
pub fn start_round(state: &mut GameState, difficulty: Difficulty) {
    state.difficulty = difficulty;
    state.stats.reset_stats(state.settings.ship_limit);
    state.settings.initialize_dynamic_settings(difficulty);
    state.alien_fire_countdown = state.settings.alien_fire_period_frames();
    state.last_fired_frame = None;

    state.bullets.clear();
    state.alien_bullets.clear();
    state.explosions.clear();

    state.fleet.direction = 1.0;
    regenerate_fleet(state);
    state.blocks = create_shields(
        state.settings.screen_width,
        state.settings.screen_height,
        state.settings.block_size,
    );
    center_ship(state);
    state.status = GameStatus::Active;

    info!(%difficulty, aliens = state.fleet.len(), "round started");
}

/// Fleet cleared: next level.  Shields are not rebuilt.
pub fn start_new_level(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.bullets.clear();
    state.alien_bullets.clear();
    regenerate_fleet(state);
    state.settings.increase_speed();
    state.stats.level += 1;

    info!(
        level = state.stats.level,
        alien_speed = state.settings.alien_speed,
        alien_points = state.settings.alien_points,
        "level cleared"
    );
    events.push(GameEvent::LevelCleared { new_level: state.stats.level });
}

fn regenerate_fleet(state: &mut GameState) {
    let layout = state.layout;
    state
        .fleet
        .regenerate(&layout, state.settings.screen_width, state.settings.screen_height);
}

/// The ship was lost.  Either freezes for a moment or ends the round.
fn ship_hit(state: &mut GameState, ship_visible: bool, events: &mut Vec<GameEvent>) {
    let ships_left = state.stats.lose_ship();
    events.push(GameEvent::LifeLost { ships_left });

    if ships_left > 0 {
        info!(ships_left, "life lost");
        state.status = GameStatus::Paused {
            frames_left: PAUSE_FRAMES,
            ship_visible,
        };
    } else {
        info!(score = state.stats.score, level = state.stats.level, "game over");
        state.status = GameStatus::GameOver;
        events.push(GameEvent::GameOver { score: state.stats.score });
    }
}

/// Pause expired: wipe bullets, respawn ship and fleet, resume.
fn end_pause(state: &mut GameState) {
    state.bullets.clear();
    state.alien_bullets.clear();
    center_ship(state);
    regenerate_fleet(state);
    state.status = GameStatus::Active;
}

// ── Firing ───────────────────────────────────────────────────────────────────

/// Fire from the ship's nose, up to `bullet_limit` bullets on screen.
pub fn fire_bullet(state: &mut GameState) -> bool {
    if state.status != GameStatus::Active || state.bullets.len() >= state.settings.bullet_limit {
        return false;
    }
    let (cx, top) = state.ship.rect.mid_top();
    state.bullets.push(Bullet {
        rect: Rect::with_mid_top(cx, top, state.settings.bullet_width, state.settings.bullet_height),
    });
    state.last_fired_frame = Some(state.frame);
    true
}

/// Held fire: shoot again once the auto-fire delay has passed.
fn auto_fire_bullet(state: &mut GameState) -> bool {
    let ready = state
        .last_fired_frame
        .map_or(true, |last| state.frame.saturating_sub(last) >= FIRING_DELAY_FRAMES);
    ready && fire_bullet(state)
}

/// Drop a bullet from the belly of a random alien.
pub fn fire_alien_bullet(state: &mut GameState, rng: &mut impl Rng) -> bool {
    if state.status != GameStatus::Active {
        return false;
    }
    let Some(shooter) = state.fleet.random_shooter(rng) else {
        return false;
    };
    let (cx, bottom) = shooter.rect.mid_bottom();
    let rect = Rect::with_mid_top(cx, bottom, state.settings.bullet_width, state.settings.bullet_height);
    state.alien_bullets.push(Bullet { rect });
    true
}

fn update_alien_fire_timer(state: &mut GameState, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
    state.alien_fire_countdown = state.alien_fire_countdown.saturating_sub(1);
    if state.alien_fire_countdown == 0 {
        state.alien_fire_countdown = state.settings.alien_fire_period_frames();
        if fire_alien_bullet(state, rng) {
            events.push(GameEvent::AlienBulletFired);
        }
    }
}

// ── Movement ─────────────────────────────────────────────────────────────────

/// Slide the ship by its speed, clamped to `[0, screen_width - ship_width]`.
pub fn update_ship(state: &mut GameState, controls: Controls) {
    let speed = state.settings.ship_speed;
    let mut x = state.ship.rect.x;
    if controls.right {
        x += speed;
    }
    if controls.left {
        x -= speed;
    }
    let max_x = (state.settings.screen_width - state.ship.rect.w).max(0.0);
    state.ship.rect.x = x.clamp(0.0, max_x);
}

/// Move both bullet groups, drop those that have fully left the screen,
/// then resolve every bullet collision.
pub fn update_bullets(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let speed = state.settings.bullet_speed;
    for bullet in &mut state.bullets {
        bullet.rect.y -= speed;
    }
    for bullet in &mut state.alien_bullets {
        bullet.rect.y += speed;
    }

    let screen_height = state.settings.screen_height;
    state.bullets.retain(|b| b.rect.bottom() > 0.0);
    state.alien_bullets.retain(|b| b.rect.top() < screen_height);

    let destroyed = bullets_vs_blocks(&mut state.bullets, &mut state.blocks)
        + bullets_vs_blocks(&mut state.alien_bullets, &mut state.blocks);
    if destroyed > 0 {
        events.push(GameEvent::BlocksDestroyed { count: destroyed });
    }

    check_bullet_alien_collisions(state, events);
    check_alien_bullet_ship_collisions(state, events);
}

/// Bullets and the blocks they touch destroy each other.  Returns the
/// number of blocks removed.
fn bullets_vs_blocks(bullets: &mut Vec<Bullet>, blocks: &mut Vec<Block>) -> usize {
    let hits = group_collide(bullets.as_slice(), blocks.as_slice());
    if hits.is_empty() {
        return 0;
    }
    let dead_bullets = mask_from(bullets.len(), hits.iter().map(|(b, _)| *b));
    let dead_blocks = mask_from(blocks.len(), hits.iter().flat_map(|(_, t)| t.iter().copied()));
    sweep(bullets, &dead_bullets);
    sweep(blocks, &dead_blocks)
}

fn check_bullet_alien_collisions(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let hits = group_collide(state.bullets.as_slice(), state.fleet.aliens.as_slice());
    if hits.is_empty() {
        return;
    }

    let killed: Vec<usize> = hits.iter().flat_map(|(_, t)| t.iter().copied()).collect();
    for &ai in &killed {
        let (cx, cy) = state.fleet.aliens[ai].rect.center();
        spawn_explosion(state, cx, cy);
    }

    let dead_bullets = mask_from(state.bullets.len(), hits.iter().map(|(b, _)| *b));
    let dead_aliens = mask_from(state.fleet.len(), killed.iter().copied());
    sweep(&mut state.bullets, &dead_bullets);
    sweep(&mut state.fleet.aliens, &dead_aliens);

    let points = state.settings.alien_points.saturating_mul(killed.len() as u64);
    events.push(GameEvent::AliensDestroyed {
        count: killed.len(),
        points,
    });
    if state.stats.add_score(points) {
        events.push(GameEvent::NewHighScore { score: state.stats.high_score });
    }

    // Only a kill can empty the fleet, so a clear is handled exactly once.
    if state.fleet.is_empty() {
        start_new_level(state, events);
    }
}

fn check_alien_bullet_ship_collisions(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let hits = collide_rect(&state.ship.rect, &state.alien_bullets);
    if hits.is_empty() {
        return;
    }
    let dead = mask_from(state.alien_bullets.len(), hits);
    sweep(&mut state.alien_bullets, &dead);
    destroy_ship(state, events);
}

/// Explosion at the ship, then the life is taken with the ship hidden.
fn destroy_ship(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let (cx, cy) = state.ship.rect.center();
    spawn_explosion(state, cx, cy);
    events.push(GameEvent::ShipDestroyed);
    ship_hit(state, false, events);
}

/// Bounce and slide the fleet, then check what it ran into.
pub fn update_aliens(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let Settings {
        screen_width,
        screen_height,
        alien_speed,
        fleet_drop_speed,
        ..
    } = state.settings;
    state.fleet.update(screen_width, alien_speed, fleet_drop_speed);

    // Aliens plough through shields without being hurt.
    let breached: Vec<usize> = state
        .fleet
        .aliens
        .iter()
        .flat_map(|alien| collide_rect(&alien.rect, &state.blocks))
        .collect();
    if !breached.is_empty() {
        let dead = mask_from(state.blocks.len(), breached);
        let count = sweep(&mut state.blocks, &dead);
        events.push(GameEvent::ShieldBreached { count });
    }

    if collide_any(&state.ship.rect, &state.fleet.aliens) {
        destroy_ship(state, events);
        return;
    }

    if state.fleet.reached_bottom(screen_height) {
        events.push(GameEvent::AlienReachedBottom);
        ship_hit(state, true, events);
    }
}

// ── Explosions ───────────────────────────────────────────────────────────────

fn spawn_explosion(state: &mut GameState, cx: f32, cy: f32) {
    let size = state.settings.explosion_size;
    state.explosions.push(Explosion {
        rect: Rect::centered_at(cx, cy, size, size),
        frames_left: EXPLOSION_FRAMES,
    });
}

/// Age every explosion by one frame and drop the expired ones.
pub fn update_explosions(state: &mut GameState) {
    for explosion in &mut state.explosions {
        explosion.frames_left = explosion.frames_left.saturating_sub(1);
    }
    state.explosions.retain(|e| e.frames_left > 0);
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame and report what happened.
///
/// Order while a round is active: ship moves, fresh press or held fire,
/// alien fire timer, bullets (and their collisions), explosions age, fleet
/// (and its collisions).  The fleet is skipped on a frame where the ship was
/// already lost, so at most one life goes per frame.  Outside a round only
/// explosions age and the pause counts down.
pub fn tick(state: &mut GameState, controls: Controls, rng: &mut impl Rng) -> Vec<GameEvent> {
    state.frame += 1;
    let mut events = Vec::new();

    if state.status != GameStatus::Active {
        update_explosions(state);
    }

    match state.status {
        GameStatus::Active => {
            update_ship(state, controls);
            let fired = if controls.fire_pressed {
                fire_bullet(state)
            } else {
                controls.fire && auto_fire_bullet(state)
            };
            if fired {
                events.push(GameEvent::BulletFired);
            }
            update_alien_fire_timer(state, rng, &mut events);
            update_bullets(state, &mut events);
            update_explosions(state);
            if state.status == GameStatus::Active {
                update_aliens(state, &mut events);
            }
        }
        GameStatus::Paused {
            frames_left,
            ship_visible,
        } => {
            if frames_left <= 1 {
                end_pause(state);
            } else {
                state.status = GameStatus::Paused {
                    frames_left: frames_left - 1,
                    ship_visible,
                };
            }
        }
        GameStatus::Menu | GameStatus::GameOver => {}
    }

    events
}
