use alien_invasion::scoreboard::{format_score, Scoreboard};
use alien_invasion::stats::GameStats;

#[test]
fn scores_round_to_tens_with_separators() {
    assert_eq!(format_score(0), "0");
    assert_eq!(format_score(4), "0");
    assert_eq!(format_score(6), "10");
    assert_eq!(format_score(1234), "1,230");
    assert_eq!(format_score(123_456_789), "123,456,790");
}

#[test]
fn ties_round_to_even_tens() {
    assert_eq!(format_score(5), "0");
    assert_eq!(format_score(15), "20");
    assert_eq!(format_score(75), "80");
    assert_eq!(format_score(125), "120");
    assert_eq!(format_score(1225), "1,220");
    assert_eq!(format_score(1235), "1,240");
    assert_eq!(format_score(999_995), "1,000,000");
    assert_eq!(format_score(999_985), "999,980");
}

#[test]
fn huge_scores_do_not_overflow() {
    assert!(!format_score(u64::MAX).is_empty());
}

#[test]
fn new_board_prepares_every_line() {
    let stats = GameStats::new(3, 1500);
    let board = Scoreboard::new(&stats);
    assert_eq!(board.score_text, "Score: 0");
    assert_eq!(board.high_score_text, "High Score: 1,500");
    assert_eq!(board.level_text, "Level: 1");
    assert_eq!(board.ships_left, 3);
}

#[test]
fn refresh_is_a_no_op_when_nothing_moved() {
    let stats = GameStats::new(3, 0);
    let mut board = Scoreboard::new(&stats);
    assert!(!board.refresh(&stats));
}

#[test]
fn refresh_only_touches_changed_lines() {
    let mut stats = GameStats::new(3, 0);
    let mut board = Scoreboard::new(&stats);

    // Poison the level line; it must survive a score-only change.
    board.level_text = "stale".to_string();
    stats.add_score(50);
    assert!(board.refresh(&stats));
    assert_eq!(board.score_text, "Score: 50");
    assert_eq!(board.high_score_text, "High Score: 50");
    assert_eq!(board.level_text, "stale");

    stats.level = 2;
    stats.lose_ship();
    assert!(board.refresh(&stats));
    assert_eq!(board.level_text, "Level: 2");
    assert_eq!(board.ships_left, 2);
}
