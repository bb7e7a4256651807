//! Position evaluation boundary: the evaluator seam the search consumes,
//! the nominal material scale, and seeded evaluation noise.

use std::sync::{Arc, Mutex};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::board::Board;
use crate::score::Pawns;
use crate::types::{Color, Move, MoveKind, Piece};

/// A static position evaluator. Implementations may read any state on the
/// board, including its history (say, [`Board::has_castled`]), but must not
/// mutate it and must be deterministic for a given board.
pub trait Evaluator: Send + Sync {
    /// The position score in pawns, positive favoring the side to move.
    fn evaluate(&self, b: &Board) -> Pawns;
}

/// The signed unit for the color: +1 for White, -1 for Black.
#[inline(always)]
pub fn unit(c: Color) -> Pawns {
    match c {
        Color::White => 1.0,
        Color::Black => -1.0,
    }
}

/// The absolute nominal value of a piece in pawns. The king has an
/// arbitrary value of 100 pawns, large enough that it never trades.
pub fn nominal_value(p: Piece) -> Pawns {
    match p {
        Piece::Pawn => 1.0,
        Piece::Bishop | Piece::Knight => 3.0,
        Piece::Rook => 5.0,
        Piece::Queen => 9.0,
        Piece::King => 100.0,
        Piece::None => 0.0,
    }
}

/// The nominal material gain of a move.
pub fn nominal_gain(m: Move) -> Pawns {
    match m.kind {
        MoveKind::CapturePromotion => {
            nominal_value(m.capture) + nominal_value(m.promotion) - nominal_value(Piece::Pawn)
        }
        MoveKind::Promotion => nominal_value(m.promotion) - nominal_value(Piece::Pawn),
        MoveKind::Capture => nominal_value(m.capture),
        MoveKind::EnPassant => nominal_value(Piece::Pawn),
        _ => 0.0,
    }
}

/// The nominal material balance for the side to move.
pub struct Material;

impl Evaluator for Material {
    fn evaluate(&self, b: &Board) -> Pawns {
        let pos = b.position();
        let turn = b.turn();

        let mut pawns = 0.0;
        for p in Piece::ALL {
            let balance = pos.piece(turn, p).pop_count() as i32
                - pos.piece(turn.opponent(), p).pop_count() as i32;
            pawns += balance as Pawns * nominal_value(p);
        }
        pawns
    }
}

/// A seeded noise generator perturbing leaf evaluations. The limit is in
/// millipawns: samples fall in `[-limit/2, limit/2] / 1000` pawns. The
/// default generator always returns zero.
#[derive(Clone, Default)]
pub struct Noise {
    limit: u32,
    rng: Option<Arc<Mutex<StdRng>>>,
}

impl Noise {
    pub fn new(limit_millipawns: u32, seed: u64) -> Noise {
        if limit_millipawns == 0 {
            return Noise::none();
        }
        Noise {
            limit: limit_millipawns,
            rng: Some(Arc::new(Mutex::new(StdRng::seed_from_u64(seed)))),
        }
    }

    /// Noise that is always zero.
    pub fn none() -> Noise {
        Noise::default()
    }

    pub fn evaluate(&self, _b: &Board) -> Pawns {
        let Some(rng) = &self.rng else {
            return 0.0;
        };
        let sample = rng.lock().unwrap().gen_range(0..self.limit);
        (sample as i32 - (self.limit / 2) as i32) as Pawns / 1000.0
    }
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
