//! Terminal renderer. Maps the pixel playfield onto character cells.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only scales the
//! playfield onto the terminal grid and translates it into crossterm
//! commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use alien_invasion::entities::{Difficulty, GameState, GameStatus, Rect};
use alien_invasion::scoreboard::Scoreboard;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::White;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ALIEN: Color = Color::Green;
const C_BLOCK: Color = Color::Cyan;
const C_BULLET_PLAYER: Color = Color::Green;
const C_BULLET_ALIEN: Color = Color::Magenta;
const C_EXPLOSION: Color = Color::Yellow;
const C_TITLE: Color = Color::Blue;
const C_HINT: Color = Color::DarkGrey;

/// Smallest terminal the layout below fits in.
const MIN_COLS: u16 = 44;
const MIN_ROWS: u16 = 16;

const CONTROLS_HINT: &str = "← → / A D : Move   SPACE : Shoot   Q : Quit";

// ── Playfield → terminal mapping ──────────────────────────────────────────────

/// Terminal cells reserved for the playfield and the scale into them.
///
/// Rows 0–1 hold the HUD, row 2 and row `height-2` the border, the last row
/// the controls hint.  Columns 0 and `width-1` are the side walls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub left: u16,
    pub top: u16,
    pub cols: u16,
    pub rows: u16,
    pub world_w: f32,
    pub world_h: f32,
}

impl Viewport {
    pub fn new(width: u16, height: u16, world_w: f32, world_h: f32) -> Self {
        Viewport {
            left: 1,
            top: 3,
            cols: width.saturating_sub(2).max(1),
            rows: height.saturating_sub(5).max(1),
            world_w,
            world_h,
        }
    }

    fn col_of(&self, x: f32) -> u16 {
        let c = (x / self.world_w * self.cols as f32).floor();
        self.left + c.clamp(0.0, (self.cols - 1) as f32) as u16
    }

    fn row_of(&self, y: f32) -> u16 {
        let r = (y / self.world_h * self.rows as f32).floor();
        self.top + r.clamp(0.0, (self.rows - 1) as f32) as u16
    }

    /// Cell containing a playfield point.
    pub fn to_cell(&self, x: f32, y: f32) -> (u16, u16) {
        (self.col_of(x), self.row_of(y))
    }

    /// Inclusive cell span `(col0, row0, col1, row1)` covered by `rect`.
    /// Never empty, however small the rect.
    pub fn span(&self, rect: &Rect) -> (u16, u16, u16, u16) {
        let (c0, r0) = self.to_cell(rect.left(), rect.top());
        // Nudge inward so a rect ending exactly on a cell edge stays out of
        // the next cell.
        let (c1, r1) = self.to_cell(rect.right() - 0.01, rect.bottom() - 0.01);
        (c0, r0, c1.max(c0), r1.max(r0))
    }

    /// False for anything entirely outside the playfield.
    pub fn visible(&self, rect: &Rect) -> bool {
        rect.right() > 0.0 && rect.left() < self.world_w && rect.bottom() > 0.0 && rect.top() < self.world_h
    }
}

// ── Menu buttons ──────────────────────────────────────────────────────────────

/// A clickable box on the title screen, in terminal cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Button {
    pub difficulty: Difficulty,
    pub col: u16,
    pub row: u16,
    pub w: u16,
    pub h: u16,
    pub color: Color,
}

impl Button {
    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.col && col < self.col + self.w && row >= self.row && row < self.row + self.h
    }
}

const BUTTON_W: u16 = 12;
const BUTTON_H: u16 = 3;
const BUTTON_GAP: u16 = 3;

/// The three difficulty buttons, centred side by side on the screen.
pub fn menu_buttons(width: u16, height: u16) -> [Button; 3] {
    let total = BUTTON_W * 3 + BUTTON_GAP * 2;
    let start = (width / 2).saturating_sub(total / 2);
    let row = (height / 2).saturating_sub(1);
    let colors = [Color::Green, Color::Yellow, Color::Red];

    let mut buttons = [Button {
        difficulty: Difficulty::Easy,
        col: start,
        row,
        w: BUTTON_W,
        h: BUTTON_H,
        color: colors[0],
    }; 3];
    for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
        buttons[i] = Button {
            difficulty: *difficulty,
            col: start + i as u16 * (BUTTON_W + BUTTON_GAP),
            row,
            w: BUTTON_W,
            h: BUTTON_H,
            color: colors[i],
        };
    }
    buttons
}

/// Which difficulty button, if any, sits under a mouse click.
pub fn button_at(width: u16, height: u16, col: u16, row: u16) -> Option<Difficulty> {
    menu_buttons(width, height)
        .iter()
        .find(|b| b.contains(col, row))
        .map(|b| b.difficulty)
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    board: &Scoreboard,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    if width < MIN_COLS || height < MIN_ROWS {
        out.queue(cursor::MoveTo(0, 0))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(format!("Terminal too small, need {MIN_COLS}×{MIN_ROWS}")))?;
        out.queue(style::ResetColor)?;
        out.flush()?;
        return Ok(());
    }

    let view = Viewport::new(width, height, state.settings.screen_width, state.settings.screen_height);

    draw_border(out, width, height)?;
    draw_hud(out, board, width)?;

    for block in &state.blocks {
        let (c, r) = view.to_cell(block.rect.center().0, block.rect.center().1);
        out.queue(cursor::MoveTo(c, r))?;
        out.queue(style::SetForegroundColor(C_BLOCK))?;
        out.queue(Print("█"))?;
    }
    for bullet in state.bullets.iter().filter(|b| view.visible(&b.rect)) {
        draw_bullet(out, &view, &bullet.rect, "║", C_BULLET_PLAYER)?;
    }
    for bullet in state.alien_bullets.iter().filter(|b| view.visible(&b.rect)) {
        draw_bullet(out, &view, &bullet.rect, "↓", C_BULLET_ALIEN)?;
    }
    if state.ship_visible() {
        draw_ship(out, &view, &state.ship.rect)?;
    }
    for alien in &state.fleet.aliens {
        draw_alien(out, &view, &alien.rect)?;
    }
    for explosion in &state.explosions {
        fill(out, &view, &explosion.rect, '✶', C_EXPLOSION)?;
    }

    if state.in_menu() {
        draw_menu(out, state, width, height)?;
    }
    draw_controls_hint(out, height)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 2))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 3..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (rows 0–1) ────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, board: &Scoreboard, width: u16) -> std::io::Result<()> {
    // Lives, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print("Lives: "))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print("▲".repeat(board.ships_left as usize)))?;

    // High score, centre
    let hx = (width / 2).saturating_sub(board.high_score_text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(hx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(&board.high_score_text))?;

    // Score on the right, level under it
    let sx = width.saturating_sub(board.score_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(sx, 0))?;
    out.queue(Print(&board.score_text))?;
    let lx = width.saturating_sub(board.level_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(lx, 1))?;
    out.queue(Print(&board.level_text))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_ship<W: Write>(out: &mut W, view: &Viewport, rect: &Rect) -> std::io::Result<()> {
    // Sprite, stretched to the ship's width:
    //    ▲       ← top row (tip)
    //   /██\     ← remaining rows (fuselage + wings)
    let (c0, r0, c1, r1) = view.span(rect);
    let inner = (c1 - c0).saturating_sub(1) as usize;
    out.queue(style::SetForegroundColor(C_PLAYER))?;

    out.queue(cursor::MoveTo(c0 + (c1 - c0) / 2, r0))?;
    out.queue(Print("▲"))?;
    for row in (r0 + 1)..=r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        if c1 > c0 {
            out.queue(Print(format!("/{}\\", "█".repeat(inner))))?;
        } else {
            out.queue(Print("█"))?;
        }
    }
    Ok(())
}

fn draw_alien<W: Write>(out: &mut W, view: &Viewport, rect: &Rect) -> std::io::Result<()> {
    // Sprite, stretched to the alien's width:
    //   «▼▼»    ← swept-back wings
    //   ╚══╝    ← engine block
    let (c0, r0, c1, r1) = view.span(rect);
    let inner = (c1 - c0).saturating_sub(1) as usize;
    out.queue(style::SetForegroundColor(C_ALIEN))?;

    for row in r0..=r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        let line = match (c1 > c0, row == r0) {
            (false, _) => "▼".to_string(),
            (true, true) => format!("«{}»", "▼".repeat(inner)),
            (true, false) => format!("╚{}╝", "═".repeat(inner)),
        };
        out.queue(Print(line))?;
    }
    Ok(())
}

fn draw_bullet<W: Write>(
    out: &mut W,
    view: &Viewport,
    rect: &Rect,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    let (cx, cy) = rect.center();
    let (c, r) = view.to_cell(cx, cy);
    out.queue(cursor::MoveTo(c, r))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn fill<W: Write>(out: &mut W, view: &Viewport, rect: &Rect, glyph: char, color: Color) -> std::io::Result<()> {
    let (c0, r0, c1, r1) = view.span(rect);
    let line: String = std::iter::repeat(glyph).take((c1 - c0 + 1) as usize).collect();
    out.queue(style::SetForegroundColor(color))?;
    for row in r0..=r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

// ── Menu overlay ──────────────────────────────────────────────────────────────

fn draw_menu<W: Write>(out: &mut W, state: &GameState, width: u16, height: u16) -> std::io::Result<()> {
    let cx = width / 2;
    let buttons = menu_buttons(width, height);
    let title_row = buttons[0].row.saturating_sub(5);

    let title: &[&str] = if state.status == GameStatus::GameOver {
        &[
            "╔══════════════════════╗",
            "║      GAME  OVER      ║",
            "╚══════════════════════╝",
        ]
    } else {
        &[
            "╔══════════════════════╗",
            "║    ALIEN  INVASION   ║",
            "╚══════════════════════╝",
        ]
    };
    let title_color = if state.status == GameStatus::GameOver {
        Color::Red
    } else {
        C_TITLE
    };
    for (i, line) in title.iter().enumerate() {
        let col = cx.saturating_sub(line.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, title_row + i as u16))?;
        out.queue(style::SetForegroundColor(title_color))?;
        out.queue(Print(*line))?;
    }

    for (i, button) in buttons.iter().enumerate() {
        let inner = button.w as usize - 2;
        let label = format!("{} {}", i + 1, button.difficulty.label());
        let pad = inner.saturating_sub(label.chars().count());
        let text = format!("{}{}{}", " ".repeat(pad / 2), label, " ".repeat(pad - pad / 2));
        out.queue(style::SetForegroundColor(button.color))?;
        out.queue(cursor::MoveTo(button.col, button.row))?;
        out.queue(Print(format!("┌{}┐", "─".repeat(inner))))?;
        out.queue(cursor::MoveTo(button.col, button.row + 1))?;
        out.queue(Print(format!("│{text}│")))?;
        out.queue(cursor::MoveTo(button.col, button.row + 2))?;
        out.queue(Print(format!("└{}┘", "─".repeat(inner))))?;
    }

    let hint = "Click a difficulty, press 1-3, or P / SPACE to play";
    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, buttons[0].row + BUTTON_H + 1))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;

    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(CONTROLS_HINT))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_maps_corners_inside_border() {
        let view = Viewport::new(122, 45, 1200.0, 800.0);
        assert_eq!(view.to_cell(0.0, 0.0), (1, 3));
        assert_eq!(view.to_cell(1199.9, 799.9), (120, 42));
    }

    #[test]
    fn viewport_clamps_offscreen_points() {
        let view = Viewport::new(122, 45, 1200.0, 800.0);
        assert_eq!(view.to_cell(-50.0, -50.0), (1, 3));
        assert_eq!(view.to_cell(5000.0, 5000.0), (120, 42));
    }

    #[test]
    fn span_is_never_empty() {
        let view = Viewport::new(122, 45, 1200.0, 800.0);
        let tiny = Rect::new(600.0, 400.0, 3.0, 3.0);
        let (c0, r0, c1, r1) = view.span(&tiny);
        assert_eq!((c0, r0), (c1, r1));
    }

    #[test]
    fn span_covers_alien_width() {
        // 1200 px over 120 columns: 10 px per column
        let view = Viewport::new(122, 45, 1200.0, 800.0);
        let alien = Rect::new(40.0, 132.0, 40.0, 40.0);
        let (c0, _, c1, _) = view.span(&alien);
        assert_eq!(c0, 5);
        assert_eq!(c1, 8);
    }

    #[test]
    fn buttons_do_not_overlap() {
        let buttons = menu_buttons(100, 30);
        for pair in buttons.windows(2) {
            assert!(pair[0].col + pair[0].w <= pair[1].col);
        }
    }

    #[test]
    fn click_selects_difficulty() {
        let buttons = menu_buttons(100, 30);
        let hard = buttons[2];
        assert_eq!(button_at(100, 30, hard.col + 1, hard.row + 1), Some(Difficulty::Hard));
        assert_eq!(button_at(100, 30, 0, 0), None);
    }
}
