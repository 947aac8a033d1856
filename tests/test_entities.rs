use alien_invasion::compute::init_state;
use alien_invasion::entities::*;
use alien_invasion::shields::{create_shield, create_shields, SHIELD_SHAPE};
use alien_invasion::stats::GameStats;

#[test]
fn rect_edges_and_anchors() {
    let r = Rect::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(r.left(), 10.0);
    assert_eq!(r.right(), 40.0);
    assert_eq!(r.top(), 20.0);
    assert_eq!(r.bottom(), 60.0);
    assert_eq!(r.center(), (25.0, 40.0));
    assert_eq!(r.mid_top(), (25.0, 20.0));
    assert_eq!(r.mid_bottom(), (25.0, 60.0));
    assert_eq!(Rect::centered_at(25.0, 40.0, 30.0, 40.0), r);
    assert_eq!(Rect::with_mid_top(25.0, 20.0, 30.0, 40.0), r);
}

#[test]
fn rect_overlap_is_strict() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    // Sharing an edge is not a hit
    assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
    assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    // Any interior overlap is
    assert!(a.overlaps(&Rect::new(9.5, 9.5, 10.0, 10.0)));
    // Containment counts both ways
    let inner = Rect::new(2.0, 2.0, 1.0, 1.0);
    assert!(a.overlaps(&inner));
    assert!(inner.overlaps(&a));
}

#[test]
fn ship_visibility_follows_status() {
    let mut s = init_state(1200.0, 800.0, 0);
    assert!(!s.ship_visible());
    s.status = GameStatus::Active;
    assert!(s.ship_visible());
    s.status = GameStatus::Paused { frames_left: 10, ship_visible: false };
    assert!(!s.ship_visible());
    s.status = GameStatus::Paused { frames_left: 10, ship_visible: true };
    assert!(s.ship_visible());
    s.status = GameStatus::GameOver;
    assert!(!s.ship_visible());
    assert!(s.in_menu());
}

#[test]
fn game_state_clone_is_independent() {
    let original = init_state(1200.0, 800.0, 0);
    let mut cloned = original.clone();

    cloned.ship.rect.x = 99.0;
    cloned.stats.score = 999;
    cloned.fleet.aliens.push(Alien { rect: Rect::new(5.0, 5.0, 40.0, 40.0) });

    assert_eq!(original.ship.rect.x, 576.0);
    assert_eq!(original.stats.score, 0);
    assert!(original.fleet.is_empty());
}

// ── GameStats ─────────────────────────────────────────────────────────────────

#[test]
fn stats_start_at_level_one_with_full_lives() {
    let stats = GameStats::new(3, 120);
    assert_eq!(stats.ships_left, 3);
    assert_eq!(stats.level, 1);
    assert_eq!(stats.score, 0);
    assert_eq!(stats.high_score, 120);
}

#[test]
fn add_score_lifts_high_score_only_when_beaten() {
    let mut stats = GameStats::new(3, 100);
    assert!(!stats.add_score(100));
    assert_eq!(stats.high_score, 100);
    assert!(stats.add_score(1));
    assert_eq!(stats.high_score, 101);
}

#[test]
fn add_score_saturates() {
    let mut stats = GameStats::new(3, 0);
    stats.add_score(u64::MAX);
    stats.add_score(50);
    assert_eq!(stats.score, u64::MAX);
}

#[test]
fn lose_ship_never_underflows() {
    let mut stats = GameStats::new(1, 0);
    assert_eq!(stats.lose_ship(), 0);
    assert_eq!(stats.lose_ship(), 0);
}

#[test]
fn reset_keeps_high_score() {
    let mut stats = GameStats::new(3, 0);
    stats.add_score(700);
    stats.level = 5;
    stats.lose_ship();
    stats.reset_stats(3);
    assert_eq!(stats, GameStats { score: 0, high_score: 700, ships_left: 3, level: 1 });
}

// ── Shields ───────────────────────────────────────────────────────────────────

#[test]
fn shield_follows_stencil() {
    let blocks = create_shield(100.0, 600.0, 8.0);
    let expected: usize = SHIELD_SHAPE.iter().map(|row| row.matches('x').count()).sum();
    assert_eq!(blocks.len(), expected);
    assert_eq!(expected, 86);
    // First row starts three cells in
    assert_eq!(blocks[0].rect, Rect::new(124.0, 600.0, 8.0, 8.0));
}

#[test]
fn four_shields_fit_on_screen_above_the_ship() {
    let blocks = create_shields(1200.0, 800.0, 8.0);
    assert_eq!(blocks.len(), 4 * 86);
    for block in &blocks {
        assert!(block.rect.left() >= 0.0 && block.rect.right() <= 1200.0);
        assert!(block.rect.top() >= 680.0 && block.rect.bottom() <= 760.0);
    }
}
