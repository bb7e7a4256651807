//! Perft: counts move generation leaves to a fixed depth, for validation
//! against published tables.

use crate::board::Board;
use crate::types::Move;

/// Counts the legal leaves of the move generation tree at the given depth.
pub fn perft(b: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for m in b.position().pseudo_legal_moves(b.turn()) {
        if b.push(m).is_err() {
            continue;
        }
        nodes += perft(b, depth - 1);
        b.pop();
    }
    nodes
}

/// The root move breakdown of [`perft`], for pinpointing generation bugs.
pub fn divide(b: &mut Board, depth: u32) -> Vec<(Move, u64)> {
    let mut out = Vec::new();
    if depth == 0 {
        return out;
    }

    for m in b.position().pseudo_legal_moves(b.turn()) {
        if b.push(m).is_err() {
            continue;
        }
        out.push((m, perft(b, depth - 1)));
        b.pop();
    }
    out
}
