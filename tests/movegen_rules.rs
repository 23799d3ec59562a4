use poddavki::engine::generate_legal_moves;
use poddavki::state::{Board, BLACK, WHITE};
use poddavki::zobrist;
use std::sync::Once;

static INIT: Once = Once::new();

fn init() {
    INIT.call_once(zobrist::init_zobrist);
}

#[test]
fn opening_has_seven_moves_each_side() {
    init();
    let board = Board::initial();

    let white = generate_legal_moves(&board, WHITE);
    assert_eq!(white.len(), 7);
    assert!(white.iter().all(|m| !m.is_capture() && !m.becomes_king));

    let black = generate_legal_moves(&board, BLACK);
    assert_eq!(black.len(), 7);
    assert!(black.iter().all(|m| !m.is_capture() && !m.becomes_king));
}

#[test]
fn forced_single_capture() {
    init();
    // Black man diagonally ahead of the white man; the jump is the only
    // legal move and lands beyond it.
    let board = Board::from_masks(1 << 8, 1 << 13, 0, WHITE);
    let moves = generate_legal_moves(&board, WHITE);
    assert_eq!(moves.len(), 1);
    let mv = moves[0];
    assert_eq!(mv.from, 1 << 8);
    assert_eq!(mv.to, 1 << 17);
    assert_eq!(mv.captured, 1 << 13);
    assert!(!mv.becomes_king);
}

#[test]
fn maximum_capture_rule_prefers_longer_chain() {
    init();
    // From 8 the man can take one piece backwards (over 5) or two
    // forwards (over 13 then 22); only the double survives the filter.
    let board = Board::from_masks(1 << 8, (1 << 5) | (1 << 13) | (1 << 22), 0, WHITE);
    let moves = generate_legal_moves(&board, WHITE);
    assert_eq!(moves.len(), 1);
    let mv = moves[0];
    assert_eq!(mv.from, 1 << 8);
    assert_eq!(mv.to, 1 << 26);
    assert_eq!(mv.captured, (1 << 13) | (1 << 22));
    assert_eq!(mv.captured.count_ones(), 2);
}

#[test]
fn man_captures_backwards() {
    init();
    let board = Board::from_masks(1 << 8, 1 << 5, 0, WHITE);
    let moves = generate_legal_moves(&board, WHITE);
    assert_eq!(moves.len(), 1);
    let mv = moves[0];
    assert_eq!(mv.to, 1 << 1);
    assert_eq!(mv.captured, 1 << 5);
}

#[test]
fn promotion_mid_jump_continues_as_king() {
    init();
    // The man jumps 21 over 25 onto the promotion row at 30, promotes,
    // and must carry on as a flying king over 26.
    let board = Board::from_masks(1 << 21, (1 << 25) | (1 << 26), 0, WHITE);
    let moves = generate_legal_moves(&board, WHITE);
    assert_eq!(moves.len(), 2);
    for mv in &moves {
        assert_eq!(mv.from, 1 << 21);
        assert!(mv.becomes_king, "mid-jump promotion must mark the move");
        assert_eq!(mv.captured, (1 << 25) | (1 << 26));
        assert_eq!(mv.captured.count_ones(), 2);
    }
    let targets: Vec<u32> = moves.iter().map(|m| m.to).collect();
    assert!(targets.contains(&(1 << 23)));
    assert!(targets.contains(&(1 << 19)));
}

#[test]
fn king_may_not_jump_a_piece_twice() {
    init();
    // A lone victim on the long diagonal: every landing square behind it
    // is offered, and no sequence captures it twice.
    let board = Board::from_masks(1, 1 << 5, 1, WHITE);
    let moves = generate_legal_moves(&board, WHITE);
    assert_eq!(moves.len(), 5);
    for mv in &moves {
        assert_eq!(mv.captured, 1 << 5);
        assert_eq!(mv.captured.count_ones(), 1);
    }
    let targets: Vec<u32> = moves.iter().map(|m| m.to).collect();
    for sq in [9u32, 14, 18, 23, 27] {
        assert!(targets.contains(&(1 << sq)), "missing landing on {}", sq);
    }
}

#[test]
fn flying_king_quiet_mobility() {
    init();
    // King mid-board, inert black man tucked in the corner off its lines.
    let board = Board::from_masks(1 << 17, 1 << 0, 1 << 17, WHITE);
    let moves = generate_legal_moves(&board, WHITE);
    assert_eq!(moves.len(), 13);
    assert!(moves.iter().all(|m| !m.is_capture()));
}

#[test]
fn blocked_men_have_no_moves() {
    init();
    // A black man on its own promotion row and a white man on its own
    // cannot step anywhere, and neither side can capture.
    let board = Board::from_masks(1 << 31, 1 << 0, 0, WHITE);
    assert!(generate_legal_moves(&board, WHITE).is_empty());
    assert!(generate_legal_moves(&board, BLACK).is_empty());
}

#[test]
fn all_legal_captures_share_the_maximum_count() {
    init();
    // Two independent single captures of equal length must both stay.
    let board = Board::from_masks((1 << 8) | (1 << 10), (1 << 13) | (1 << 14), 0, WHITE);
    let moves = generate_legal_moves(&board, WHITE);
    assert!(!moves.is_empty());
    let max = moves.iter().map(|m| m.captured.count_ones()).max().unwrap();
    assert!(moves.iter().all(|m| m.captured.count_ones() == max));
    assert!(moves.len() >= 2);
}
