mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing_subscriber::EnvFilter;

use alien_invasion::compute::{init_state, start_round, tick};
use alien_invasion::entities::{Controls, Difficulty, GameEvent, GameState, GameStatus};
use alien_invasion::high_score::HighScoreStore;
use alien_invasion::scoreboard::Scoreboard;
use alien_invasion::settings::{FPS, SCREEN_HEIGHT, SCREEN_WIDTH};

const FRAME: Duration = Duration::from_nanos(1_000_000_000 / FPS as u64);

/// Frames a key stays down after its last press or repeat.  Terminals without
/// release events only send repeats, which arrive well inside 8 frames.
const HOLD_WINDOW: u64 = 8;

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    matches!(key_frame.get(key), Some(&seen) if frame.saturating_sub(seen) <= HOLD_WINDOW)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

const FIRE_KEY: KeyCode = KeyCode::Char(' ');

// ── Command line ──────────────────────────────────────────────────────────────

/// Space Invaders in the terminal.
#[derive(Parser, Debug)]
#[command(name = "alien_invasion", version)]
struct Cli {
    /// Difficulty started by P or SPACE on the menu (easy, medium, hard).
    #[arg(long, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,

    /// Where the high score is kept [default: ~/.alien_invasion_high_score].
    #[arg(long, value_name = "PATH")]
    high_score_file: Option<PathBuf>,

    /// Write logs to this file.  Filter with RUST_LOG (default: info).
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// The terminal belongs to the game, so logs only go to a file.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file: {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

/// Menu choices and quitting.  Firing is left to [`KeyTracker::controls`].
fn handle_key_press(
    state: &mut GameState,
    code: KeyCode,
    modifiers: KeyModifiers,
    default_difficulty: Difficulty,
) -> Flow {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Flow::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Flow::Quit,
        _ => {}
    }

    if state.in_menu() {
        let choice = match code {
            KeyCode::Char('1') => Some(Difficulty::Easy),
            KeyCode::Char('2') => Some(Difficulty::Medium),
            KeyCode::Char('3') => Some(Difficulty::Hard),
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => Some(default_difficulty),
            _ => None,
        };
        if let Some(difficulty) = choice {
            start_round(state, difficulty);
        }
    }

    Flow::Continue
}

fn handle_mouse(state: &mut GameState, mouse: MouseEvent, width: u16, height: u16) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) || !state.in_menu() {
        return;
    }
    if let Some(difficulty) = display::button_at(width, height, mouse.column, mouse.row) {
        start_round(state, difficulty);
    }
}

/// Held keys plus a latch for a fresh fire press.
///
/// Classic terminals report OS auto-repeat as more `Press` events, so a
/// press only counts as fresh when the key was not already held.  Repeats
/// just keep the key held and leave the pacing to auto-fire.
#[derive(Debug, Default)]
struct KeyTracker {
    // key → last frame it was pressed or repeated
    key_frame: HashMap<KeyCode, u64>,
    fire_pressed: bool,
}

impl KeyTracker {
    fn on_key(
        &mut self,
        state: &mut GameState,
        key: KeyEvent,
        frame: u64,
        default_difficulty: Difficulty,
    ) -> Flow {
        match key.kind {
            KeyEventKind::Press => {
                let fresh = !is_held(&self.key_frame, &key.code, frame);
                let was_menu = state.in_menu();
                self.key_frame.insert(key.code, frame);
                if handle_key_press(state, key.code, key.modifiers, default_difficulty) == Flow::Quit {
                    return Flow::Quit;
                }
                if was_menu && !state.in_menu() {
                    // The key that started a round must not also fire.
                    self.key_frame.remove(&key.code);
                } else if fresh && key.code == FIRE_KEY && state.status == GameStatus::Active {
                    self.fire_pressed = true;
                }
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(key.code, frame);
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&key.code);
            }
        }
        Flow::Continue
    }

    /// This frame's input snapshot.  Clears the fresh-press latch.
    fn controls(&mut self, frame: u64) -> Controls {
        let held = &self.key_frame;
        Controls {
            left: any_held(held, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame),
            right: any_held(held, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame),
            fire: is_held(held, &FIRE_KEY, frame),
            fire_pressed: std::mem::take(&mut self.fire_pressed),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Fixed 60 FPS loop.  Key events are folded into one `Controls` snapshot
/// per frame by a [`KeyTracker`], so moving and firing can overlap.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    default_difficulty: Difficulty,
) -> Result<()> {
    let mut rng = thread_rng();
    let mut board = Scoreboard::new(&state.stats);

    let mut keys = KeyTracker::default();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let (width, height) = terminal::size().context("failed to query terminal size")?;

        // Drain input without blocking
        loop {
            let event = match rx.try_recv() {
                Ok(event) => event,
                Err(mpsc::TryRecvError::Empty) => break,
                // Input thread died: the terminal is gone.
                Err(mpsc::TryRecvError::Disconnected) => return Ok(()),
            };
            match event {
                Event::Key(key) => {
                    if keys.on_key(state, key, frame, default_difficulty) == Flow::Quit {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => handle_mouse(state, mouse, width, height),
                _ => {}
            }
        }

        let controls = keys.controls(frame);
        for event in tick(state, controls, &mut rng) {
            match event {
                GameEvent::LifeLost { .. } | GameEvent::LevelCleared { .. } | GameEvent::GameOver { .. } => {
                    tracing::debug!(?event, frame = state.frame, "round event");
                }
                _ => tracing::trace!(?event, frame = state.frame, "game event"),
            }
        }

        board.refresh(&state.stats);
        display::render(out, state, &board, width, height).context("failed to draw frame")?;

        if let Some(rest) = FRAME.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let store = cli
        .high_score_file
        .clone()
        .map(HighScoreStore::new)
        .unwrap_or_default();

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Release events where the terminal supports them; otherwise HOLD_WINDOW.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        // Stops when the terminal errors or the loop drops the receiver.
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &cli, &store);

    // Restore the terminal whatever run returned
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, cli: &Cli, store: &HighScoreStore) -> Result<()> {
    let mut state = init_state(SCREEN_WIDTH, SCREEN_HEIGHT, store.load());
    tracing::info!(high_score = state.stats.high_score, "started");

    let result = game_loop(out, &mut state, rx, cli.difficulty);

    // The high score is written on every exit path, even a failed frame.
    store
        .save(state.stats.high_score)
        .with_context(|| format!("failed to save high score: {}", store.path().display()))?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    fn menu() -> GameState {
        init_state(SCREEN_WIDTH, SCREEN_HEIGHT, 0)
    }

    fn running() -> GameState {
        let mut state = menu();
        start_round(&mut state, Difficulty::Medium);
        state.fleet.aliens.clear();
        state
    }

    fn shots(events: &[GameEvent]) -> usize {
        events.iter().filter(|e| **e == GameEvent::BulletFired).count()
    }

    // ── Firing ────────────────────────────────────────────────────────────────

    #[test]
    fn repeated_presses_are_paced_by_auto_fire() {
        // A terminal without release events repeats Space as more presses.
        let mut state = running();
        let mut keys = KeyTracker::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut fired = 0;
        for frame in 1..=24 {
            if frame % 2 == 1 {
                keys.on_key(&mut state, press(FIRE_KEY), frame, Difficulty::Medium);
            }
            fired += shots(&tick(&mut state, keys.controls(frame), &mut rng));
        }
        // first press, then one auto-fire 12 frames later
        assert_eq!(fired, 2);
    }

    #[test]
    fn separate_taps_each_fire_at_once() {
        let mut state = running();
        let mut keys = KeyTracker::default();
        let mut rng = StdRng::seed_from_u64(42);

        keys.on_key(&mut state, press(FIRE_KEY), 1, Difficulty::Medium);
        assert_eq!(shots(&tick(&mut state, keys.controls(1), &mut rng)), 1);

        keys.on_key(&mut state, release(FIRE_KEY), 2, Difficulty::Medium);
        keys.on_key(&mut state, press(FIRE_KEY), 2, Difficulty::Medium);
        assert_eq!(shots(&tick(&mut state, keys.controls(2), &mut rng)), 1);
        assert_eq!(state.bullets.len(), 2);
    }

    #[test]
    fn fresh_press_is_reported_once() {
        let mut state = running();
        let mut keys = KeyTracker::default();
        keys.on_key(&mut state, press(FIRE_KEY), 1, Difficulty::Medium);
        assert!(keys.controls(1).fire_pressed);
        assert!(!keys.controls(1).fire_pressed);
        assert!(keys.controls(2).fire);
    }

    #[test]
    fn fire_press_while_paused_is_not_latched() {
        let mut state = running();
        state.status = GameStatus::Paused { frames_left: 10, ship_visible: false };
        let mut keys = KeyTracker::default();
        keys.on_key(&mut state, press(FIRE_KEY), 1, Difficulty::Medium);
        assert!(!keys.controls(1).fire_pressed);
    }

    // ── Menu routing ──────────────────────────────────────────────────────────

    #[test]
    fn digit_keys_pick_difficulty() {
        for (ch, expected) in [('1', Difficulty::Easy), ('2', Difficulty::Medium), ('3', Difficulty::Hard)] {
            let mut state = menu();
            let mut keys = KeyTracker::default();
            let flow = keys.on_key(&mut state, press(KeyCode::Char(ch)), 1, Difficulty::Medium);
            assert_eq!(flow, Flow::Continue);
            assert_eq!(state.status, GameStatus::Active);
            assert_eq!(state.difficulty, expected);
        }
    }

    #[test]
    fn p_starts_the_default_difficulty() {
        for ch in ['p', 'P'] {
            let mut state = menu();
            let mut keys = KeyTracker::default();
            keys.on_key(&mut state, press(KeyCode::Char(ch)), 1, Difficulty::Hard);
            assert_eq!(state.status, GameStatus::Active);
            assert_eq!(state.difficulty, Difficulty::Hard);
        }
    }

    #[test]
    fn space_that_starts_a_round_does_not_fire() {
        let mut state = menu();
        let mut keys = KeyTracker::default();
        let mut rng = StdRng::seed_from_u64(42);

        keys.on_key(&mut state, press(FIRE_KEY), 1, Difficulty::Easy);
        assert_eq!(state.difficulty, Difficulty::Easy);

        let controls = keys.controls(1);
        assert!(!controls.fire && !controls.fire_pressed);
        assert_eq!(shots(&tick(&mut state, controls, &mut rng)), 0);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn digits_do_nothing_during_a_round() {
        let mut state = running();
        let mut keys = KeyTracker::default();
        keys.on_key(&mut state, press(KeyCode::Char('3')), 1, Difficulty::Medium);
        assert_eq!(state.difficulty, Difficulty::Medium);
        assert_eq!(state.status, GameStatus::Active);
    }

    #[test]
    fn game_over_screen_starts_a_new_round() {
        let mut state = running();
        state.stats.ships_left = 0;
        state.status = GameStatus::GameOver;
        let mut keys = KeyTracker::default();
        keys.on_key(&mut state, press(KeyCode::Char('1')), 1, Difficulty::Medium);
        assert_eq!(state.status, GameStatus::Active);
        assert_eq!(state.difficulty, Difficulty::Easy);
        assert_eq!(state.stats.ships_left, 3);
    }

    #[test]
    fn quit_keys_work_anywhere() {
        let quits = [
            press(KeyCode::Char('q')),
            press(KeyCode::Char('Q')),
            press(KeyCode::Esc),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ];
        for key in quits {
            for mut state in [menu(), running()] {
                let mut keys = KeyTracker::default();
                assert_eq!(keys.on_key(&mut state, key, 1, Difficulty::Medium), Flow::Quit);
            }
        }
        let mut state = running();
        let mut keys = KeyTracker::default();
        assert_eq!(
            keys.on_key(&mut state, press(KeyCode::Char('c')), 1, Difficulty::Medium),
            Flow::Continue
        );
    }

    // ── Mouse ─────────────────────────────────────────────────────────────────

    fn click(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn clicking_a_button_starts_that_difficulty() {
        let hard = display::menu_buttons(100, 30)[2];
        let mut state = menu();
        handle_mouse(&mut state, click(MouseEventKind::Down(MouseButton::Left), hard.col + 1, hard.row + 1), 100, 30);
        assert_eq!(state.status, GameStatus::Active);
        assert_eq!(state.difficulty, Difficulty::Hard);
    }

    #[test]
    fn other_clicks_are_ignored() {
        let easy = display::menu_buttons(100, 30)[0];

        let mut state = menu();
        handle_mouse(&mut state, click(MouseEventKind::Down(MouseButton::Right), easy.col + 1, easy.row + 1), 100, 30);
        assert_eq!(state.status, GameStatus::Menu);

        let mut state = running();
        handle_mouse(&mut state, click(MouseEventKind::Down(MouseButton::Left), easy.col + 1, easy.row + 1), 100, 30);
        assert_eq!(state.difficulty, Difficulty::Medium);
    }
}
