//! Draw adjudication: stalemate, repetition, the no-progress rule and
//! insufficient material.

use relic_core::fen;
use relic_core::{Board, Color, GameResult, Move, Outcome, ResultReason};

fn push_pcan(b: &mut Board, pcan: &str) {
    let candidate = Move::parse(pcan).unwrap();
    let m = b
        .position()
        .pseudo_legal_moves(b.turn())
        .into_iter()
        .find(|m| candidate.matches(*m))
        .unwrap_or_else(|| panic!("no such move: {pcan}"));
    b.push(m).unwrap();
}

// =============================================================================
// Stalemate and checkmate adjudication
// =============================================================================

#[test]
fn test_stalemate_king_in_corner() {
    let mut b = fen::new_board("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(
        !b.position().has_legal_move(Color::Black),
        "stalemate position has no legal moves"
    );
    assert!(!b.position().is_checked(Color::Black));

    let result = b.adjudicate_no_legal_moves();
    assert_eq!(result, GameResult::draw(ResultReason::Stalemate));
}

#[test]
fn test_checkmate_is_not_stalemate() {
    // Scholar's mate.
    let mut b =
        fen::new_board("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4")
            .unwrap();
    assert!(b.position().is_checkmate(Color::Black));

    let result = b.adjudicate_no_legal_moves();
    assert_eq!(result.outcome, Outcome::WhiteWins);
    assert_eq!(result.reason, ResultReason::Checkmate);
}

// =============================================================================
// Threefold and fivefold repetition
// =============================================================================

#[test]
fn test_threefold_repetition_knight_shuffle() {
    let mut b = fen::initial_board();
    let moves = [
        "e2e4", "e7e5", "g1f3", "b8c6", "f3g1", "c6b8", "g1f3", "b8c6", "f3g1", "c6b8",
    ];
    for (i, m) in moves.iter().enumerate() {
        assert_eq!(
            b.result(),
            GameResult::UNDECIDED,
            "premature result before move {i}"
        );
        push_pcan(&mut b, m);
    }
    assert_eq!(b.result(), GameResult::draw(ResultReason::Repetition3));
}

#[test]
fn test_fivefold_repetition() {
    let mut b = fen::new_board("4k3/8/8/8/8/8/8/4K2R w - - 0 1").unwrap();
    // Shuffle the rook and king until the start shape recurs five times.
    for _ in 0..4 {
        push_pcan(&mut b, "h1h2");
        push_pcan(&mut b, "e8d8");
        push_pcan(&mut b, "h2h1");
        push_pcan(&mut b, "d8e8");
    }
    assert_eq!(b.result(), GameResult::draw(ResultReason::Repetition5));
}

#[test]
fn test_repetition_interrupted_by_pawn_move() {
    let mut b = fen::initial_board();
    // Two knight round-trips, but a pawn push in between resets progress.
    for m in ["g1f3", "b8c6", "f3g1", "c6b8"] {
        push_pcan(&mut b, m);
    }
    push_pcan(&mut b, "e2e4");
    push_pcan(&mut b, "e7e5");
    for m in ["g1f3", "b8c6", "f3g1", "c6b8"] {
        push_pcan(&mut b, m);
    }
    // The positions before and after e4/e5 differ; no repetition yet.
    assert_eq!(b.result(), GameResult::UNDECIDED);
}

#[test]
fn test_pop_rewinds_repetition_count() {
    let mut b = fen::initial_board();
    let moves = [
        "e2e4", "e7e5", "g1f3", "b8c6", "f3g1", "c6b8", "g1f3", "b8c6", "f3g1", "c6b8",
    ];
    for m in moves {
        push_pcan(&mut b, m);
    }
    assert_eq!(b.result(), GameResult::draw(ResultReason::Repetition3));

    b.pop();
    assert_eq!(b.result(), GameResult::UNDECIDED);

    // Re-pushing the same move draws again.
    push_pcan(&mut b, "c6b8");
    assert_eq!(b.result(), GameResult::draw(ResultReason::Repetition3));
}

// =============================================================================
// No-progress rule
// =============================================================================

#[test]
fn test_no_progress_draw_at_100_half_moves() {
    let mut b = fen::new_board("8/7k/8/8/8/8/R7/K7 w - - 98 60").unwrap();
    push_pcan(&mut b, "a2b2");
    assert_eq!(b.result(), GameResult::UNDECIDED);
    push_pcan(&mut b, "h7g7");
    assert_eq!(b.result(), GameResult::draw(ResultReason::NoProgress));
}

#[test]
fn test_no_progress_reset_by_pawn_move() {
    let mut b = fen::new_board("8/7k/8/8/8/8/P7/K7 w - - 99 60").unwrap();
    push_pcan(&mut b, "a2a3");
    assert_eq!(b.no_progress(), 0);
    assert_eq!(b.result(), GameResult::UNDECIDED);
}

// =============================================================================
// Insufficient material
// =============================================================================

fn insufficient(fen: &str) -> bool {
    fen::new_board(fen)
        .unwrap()
        .position()
        .has_insufficient_material()
}

#[test]
fn test_insufficient_material_positions() {
    assert!(insufficient("8/8/8/4k3/8/4K3/8/8 w - - 0 1"));
    assert!(insufficient("8/8/8/4k3/8/4KB2/8/8 w - - 0 1"));
    assert!(insufficient("8/8/8/4k3/8/4KN2/8/8 w - - 0 1"));
    assert!(insufficient("8/8/4n3/4k3/8/4K3/8/8 w - - 0 1"));
    // Same-shade bishops.
    assert!(insufficient("5b2/8/8/4k3/8/4K3/8/2B5 w - - 0 1"));
    // Opposite-shade bishops can still mate.
    assert!(!insufficient("2b5/8/8/4k3/8/4K3/8/2B5 w - - 0 1"));
    // Pawns, rooks, queens and knight pairs are not dead.
    assert!(!insufficient("8/8/8/4k3/8/4K3/4P3/8 w - - 0 1"));
    assert!(!insufficient("8/8/8/4k3/8/4K3/8/4R3 w - - 0 1"));
    assert!(!insufficient("8/8/8/4k3/8/4K3/8/4Q3 w - - 0 1"));
    assert!(!insufficient("8/8/8/4k3/8/4K3/3NN3/8 w - - 0 1"));
}

#[test]
fn test_capture_into_dead_position_is_draw() {
    // KB vs KN: the bishop takes the knight, leaving K+B vs K.
    let mut b = fen::new_board("4k3/8/8/4n3/8/8/8/B3K3 w - - 0 1").unwrap();
    push_pcan(&mut b, "a1e5");
    assert_eq!(
        b.result(),
        GameResult::draw(ResultReason::InsufficientMaterial)
    );

    // Popping restores an undecided game.
    b.pop();
    assert_eq!(b.result(), GameResult::UNDECIDED);
}
