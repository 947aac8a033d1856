//! Alien fleet: grid layout and lockstep movement.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entities::{Alien, Rect};

/// Parameters of the fleet grid.  All lengths are in playfield pixels
/// except the two factors, which are multiples of the alien height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FleetLayout {
    pub alien_width: f32,
    pub alien_height: f32,
    /// Extra space above the first row, below the HUD.
    pub top_margin: f32,
    /// Vertical distance between rows, in alien heights.
    pub row_spacing: f32,
    /// Rows' worth of screen kept free at the bottom for shields and ship.
    pub reserved_bottom_rows: f32,
    /// Hard ceiling on a row's y, keeps the fleet short on tall screens.
    pub max_row_y: Option<f32>,
}

impl FleetLayout {
    pub fn new(alien_width: f32, alien_height: f32) -> Self {
        FleetLayout {
            alien_width,
            alien_height,
            top_margin: 92.0,
            row_spacing: 1.5,
            reserved_bottom_rows: 7.0,
            max_row_y: None,
        }
    }
}

/// Lay out a fresh fleet.  Pure and deterministic.
///
/// Starts at `(alien_width, alien_height + top_margin)`, places one alien
/// every two alien widths while `x < screen_width - 2 * alien_width`, and
/// keeps adding rows while `y` is above the reserved bottom band.
pub fn generate_fleet(layout: &FleetLayout, screen_width: f32, screen_height: f32) -> Vec<Alien> {
    let FleetLayout { alien_width: w, alien_height: h, .. } = *layout;
    let mut aliens = Vec::new();

    // Degenerate sizes would never advance the cursor.
    if w <= 0.0 || h <= 0.0 || layout.row_spacing <= 0.0 {
        return aliens;
    }

    let y_limit = screen_height - h * layout.reserved_bottom_rows;
    let x_limit = screen_width - w * 2.0;

    let mut y = h + layout.top_margin;
    while y < y_limit && layout.max_row_y.map_or(true, |max| y <= max) {
        let mut x = w;
        while x < x_limit {
            aliens.push(Alien { rect: Rect::new(x, y, w, h) });
            x += w * 2.0;
        }
        y += h * layout.row_spacing;
    }

    aliens
}

/// The aliens plus their shared heading.
#[derive(Clone, Debug)]
pub struct Fleet {
    pub aliens: Vec<Alien>,
    /// `1.0` moves right, `-1.0` moves left.
    pub direction: f32,
}

impl Default for Fleet {
    fn default() -> Self {
        Fleet { aliens: Vec::new(), direction: 1.0 }
    }
}

impl Fleet {
    pub fn is_empty(&self) -> bool {
        self.aliens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.aliens.len()
    }

    /// Replace the aliens with a freshly generated grid.  The heading is kept.
    pub fn regenerate(&mut self, layout: &FleetLayout, screen_width: f32, screen_height: f32) {
        self.aliens = generate_fleet(layout, screen_width, screen_height);
        tracing::debug!(aliens = self.aliens.len(), "fleet generated");
    }

    /// True if any alien touches the left or right screen edge.
    pub fn at_edge(&self, screen_width: f32) -> bool {
        self.aliens
            .iter()
            .any(|a| a.rect.right() >= screen_width || a.rect.left() <= 0.0)
    }

    /// Drop every alien by `drop` and reverse the heading.
    pub fn change_direction(&mut self, drop: f32) {
        for alien in &mut self.aliens {
            alien.rect.y += drop;
        }
        self.direction = -self.direction;
    }

    /// One frame of movement: bounce off an edge first, then slide.
    pub fn update(&mut self, screen_width: f32, speed: f32, drop: f32) {
        if self.at_edge(screen_width) {
            self.change_direction(drop);
        }
        let dx = speed * self.direction;
        for alien in &mut self.aliens {
            alien.rect.x += dx;
        }
    }

    /// True once any alien's bottom edge reaches the bottom of the screen.
    pub fn reached_bottom(&self, screen_height: f32) -> bool {
        self.aliens.iter().any(|a| a.rect.bottom() >= screen_height)
    }

    /// A random alien to shoot from, if any are left.
    pub fn random_shooter<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Alien> {
        self.aliens.choose(rng)
    }
}
