//! Perft benchmark for profiling move generation.
//!
//! Usage:
//!   cargo run --release --example perft_bench -p relic_core -- [depth] [fen]

use std::env;
use std::time::Instant;

use relic_core::fen;
use relic_core::perft;

const TEST_POSITIONS: &[(&str, &str)] = &[
    ("Starting position", fen::INITIAL),
    (
        "Kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -",
    ),
    ("Position 3", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -"),
    (
        "Position 4",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq -",
    ),
    (
        "Position 5",
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ -",
    ),
    (
        "Position 6",
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/2P1QPPP/R4RK1 w - -",
    ),
];

fn main() {
    let args: Vec<String> = env::args().collect();
    let depth: u32 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(4);

    if let Some(fen_str) = args.get(2) {
        run_position(fen_str, fen_str, depth);
    } else {
        let mut total_nodes = 0u64;
        let start = Instant::now();
        for (name, fen_str) in TEST_POSITIONS {
            total_nodes += run_position(name, fen_str, depth);
        }
        let elapsed = start.elapsed();
        println!(
            "TOTAL: {} nodes in {:.3?} ({:.0} nps)",
            total_nodes,
            elapsed,
            total_nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
        );
    }
}

fn run_position(name: &str, fen_str: &str, depth: u32) -> u64 {
    let mut board = fen::new_board(fen_str).expect("valid FEN");

    let start = Instant::now();
    let nodes = perft(&mut board, depth);
    let elapsed = start.elapsed();

    println!(
        "{name:.<30} {nodes:>12} nodes in {elapsed:>8.3?} ({:>10.0} nps)",
        nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    nodes
}
