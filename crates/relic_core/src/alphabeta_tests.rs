use super::*;
use crate::eval::Material;
use crate::fen;
use crate::search::Leaf;
use crate::transposition::Table;

fn full_width() -> AlphaBeta<Full, Leaf<Material>> {
    AlphaBeta::full_width(Leaf { eval: Material })
}

fn search(fen_str: &str, depth: u32) -> (u64, Score, Vec<Move>) {
    let mut b = fen::new_board(fen_str).unwrap();
    full_width().search(&SearchContext::empty(), &mut b, depth).unwrap()
}

#[test]
fn test_material_draw_at_start() {
    let (nodes, score, pv) = search(fen::INITIAL, 2);
    assert_eq!(score, Score::ZERO);
    assert_eq!(pv.len(), 2);
    assert!(nodes > 0);
}

#[test]
fn test_mate_in_one() {
    let (_, score, pv) = search("k7/7R/6R1/8/8/8/8/7K w - - 0 1", 2);
    assert_eq!(score, Score::MateIn(1));
    assert_eq!(pv.len(), 1);

    // One ply cannot see the mate; it sees the material.
    let (_, score, _) = search("k7/7R/6R1/8/8/8/8/7K w - - 0 1", 1);
    assert_eq!(score, Score::Heuristic(10.0));

    // Deeper search does not make the mate any better.
    let (_, score, _) = search("k7/7R/6R1/8/8/8/8/7K w - - 0 1", 3);
    assert_eq!(score, Score::MateIn(1));
}

#[test]
fn test_mate_in_three() {
    let (_, score, _) = search("k7/7R/7R/8/8/8/8/7K w - - 0 1", 4);
    assert_eq!(score, Score::MateIn(3));
}

#[test]
fn test_checkmated_root() {
    // Scholar's mate, black to move: no legal moves, mated.
    let (_, score, pv) = search(
        "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4",
        3,
    );
    assert_eq!(score, Score::NegInf);
    assert!(pv.is_empty());
}

#[test]
fn test_stalemate_root_scores_zero() {
    let (_, score, pv) = search("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1", 3);
    assert_eq!(score, Score::ZERO);
    assert!(pv.is_empty());
}

#[test]
fn test_transposition_table_reuse() {
    let mut b = fen::new_board(fen::INITIAL).unwrap();
    let ab = full_width();
    let mut sctx = SearchContext::empty();
    sctx.tt = std::sync::Arc::new(Table::new(1 << 20));

    let (first_nodes, first_score, _) = ab.search(&sctx, &mut b, 3).unwrap();
    assert!(sctx.tt.used() > 0.0);

    // The exact root entry satisfies the repeat search immediately.
    let (second_nodes, second_score, _) = ab.search(&sctx, &mut b, 3).unwrap();
    assert_eq!(first_score, second_score);
    assert!(second_nodes < first_nodes, "cached search must be cheaper");
}

#[test]
fn test_ponder_forces_the_line() {
    let fen_str = "k7/8/8/3q4/8/8/8/K2R4 w - - 0 1";

    // Unconstrained, the rook takes the queen.
    let (_, score, pv) = search(fen_str, 1);
    assert_eq!(score, Score::Heuristic(5.0));
    assert_eq!(pv[0].to_string(), "d1d5");

    // With a ponder line, only the pondered move is explored.
    let mut b = fen::new_board(fen_str).unwrap();
    let mut sctx = SearchContext::empty();
    sctx.ponder = vec![Move::parse("d1d2").unwrap()];
    let (_, score, pv) = full_width().search(&sctx, &mut b, 1).unwrap();
    assert_eq!(score, Score::Heuristic(-4.0));
    assert_eq!(pv[0].to_string(), "d1d2");
}

#[test]
fn test_cancelled_search_returns_halted() {
    let mut b = fen::new_board(fen::INITIAL).unwrap();
    let sctx = SearchContext::empty();
    sctx.stop.stop();

    assert_eq!(
        full_width().search(&sctx, &mut b, 4).err(),
        Some(SearchError::Halted)
    );
}

#[test]
fn test_hooked_resets_before_delegating() {
    use crate::search::Hooked;
    use std::sync::atomic::{AtomicU32, Ordering};

    let calls = std::sync::Arc::new(AtomicU32::new(0));
    let seen = std::sync::Arc::clone(&calls);
    let hooked = Hooked {
        search: full_width(),
        hook: std::sync::Arc::new(move |b: &Board| {
            // The hook observes the root board before any descent.
            assert_eq!(b.ply(), 0);
            seen.fetch_add(1, Ordering::SeqCst);
        }),
    };

    let mut b = fen::new_board(fen::INITIAL).unwrap();
    let (_, score, _) = hooked.search(&SearchContext::empty(), &mut b, 2).unwrap();
    assert_eq!(score, Score::ZERO);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_search_leaves_board_unchanged() {
    let mut b = fen::new_board(fen::INITIAL).unwrap();
    let before = fen::encode(&b);
    let hash = b.hash();

    full_width().search(&SearchContext::empty(), &mut b, 3).unwrap();
    assert_eq!(fen::encode(&b), before);
    assert_eq!(b.hash(), hash);
}
