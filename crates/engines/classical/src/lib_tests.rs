use super::*;
use relic_core::fen;
use relic_core::{Options, Score, Search, SearchContext};

#[test]
fn test_search_composition_runs() {
    let mut b = fen::initial_board();
    let (nodes, score, pv) = search()
        .search(&SearchContext::empty(), &mut b, 2)
        .unwrap();
    assert!(nodes > 0);
    assert_eq!(score, Score::ZERO);
    assert_eq!(pv.len(), 2);
}

#[test]
fn test_engine_takes_the_hanging_queen() {
    let mut e = engine(EngineOptions {
        depth: Some(2),
        hash_mb: 1,
        noise: 0,
    });
    e.reset("k7/8/8/3q4/8/8/8/K2R4 w - - 0 1").unwrap();

    let rx = e.analyze(Options::default()).unwrap();
    let last = rx.last().unwrap();
    assert_eq!(last.moves[0].to_string(), "d1d5");

    let pv = e.halt().unwrap();
    assert_eq!(pv.moves[0].to_string(), "d1d5");
}

#[test]
fn test_engine_finds_mate_in_one() {
    let mut e = engine(EngineOptions {
        depth: Some(4),
        hash_mb: 0,
        noise: 0,
    });
    e.reset("k7/7R/6R1/8/8/8/8/7K w - - 0 1").unwrap();

    let rx = e.analyze(Options::default()).unwrap();
    let last = rx.last().unwrap();
    assert_eq!(last.score, Score::MateIn(1));
    e.halt().unwrap();
}

#[test]
fn test_engine_plays_a_short_game() {
    let mut e = engine(EngineOptions {
        depth: Some(2),
        hash_mb: 1,
        noise: 10,
    });

    let mut played = 0;
    for _ in 0..6 {
        let rx = e.analyze(Options::default()).unwrap();
        let pv = rx.last().unwrap();
        let best = pv.moves.first().copied();
        e.halt().unwrap();

        let Some(best) = best else { break };
        e.play(&best.to_string()).unwrap();
        played += 1;
    }

    assert_eq!(played, 6, "an opening has no dead ends");
    let position = e.position();
    let mut fields = position.split_whitespace();
    assert_eq!(fields.nth(1), Some("w"), "white to move after six plies");
    assert_eq!(fields.nth(3), Some("4"), "fullmove counter advanced");
}
