//! Zobrist position hashing.
//!
//! A position hash is the XOR of pseudo-random values for every piece on
//! its square, the castling rights, the en passant target and the side to
//! move. It hashes positions that are "identical" under the repetition
//! rule to the same value, and it updates incrementally in O(1) per move.
//!
//! See: <https://research.cs.wisc.edu/techreports/1970/TR88.pdf>

use rand::{RngCore, SeedableRng, rngs::StdRng};

use crate::bitboard::{Bitboard, pawn_captures};
use crate::position::Position;
use crate::types::{Color, Move, MoveKind, NUM_CASTLING, NUM_COLORS, NUM_PIECES, Piece, Rank, Square};

/// A position hash for repetition detection and transposition tables.
pub type ZobristHash = u64;

/// A pseudo-randomized table for computing position hashes. The table is a
/// pure function of its seed, so hashes are reproducible across runs.
/// Read-only after construction.
pub struct ZobristTable {
    pieces: [[[ZobristHash; 64]; NUM_PIECES]; NUM_COLORS],
    castling: [ZobristHash; NUM_CASTLING],
    /// Nonzero only for ranks 3 and 6; the H1 "no target" sentinel XORs
    /// zero.
    en_passant: [ZobristHash; 64],
    turn: [ZobristHash; NUM_COLORS],
}

impl ZobristTable {
    pub fn new(seed: u64) -> ZobristTable {
        let mut r = StdRng::seed_from_u64(seed);

        let mut pieces = [[[0u64; 64]; NUM_PIECES]; NUM_COLORS];
        let mut turn = [0u64; NUM_COLORS];
        for c in 0..NUM_COLORS {
            for p in 0..NUM_PIECES {
                for sq in 0..64 {
                    pieces[c][p][sq] = r.next_u64();
                }
            }
            turn[c] = r.next_u64();
        }

        let mut castling = [0u64; NUM_CASTLING];
        for slot in castling.iter_mut() {
            *slot = r.next_u64();
        }

        let mut en_passant = [0u64; 64];
        for sq in Square::all() {
            if sq.rank() == Rank::R3 || sq.rank() == Rank::R6 {
                en_passant[sq.index() as usize] = r.next_u64();
            }
        }

        ZobristTable {
            pieces,
            castling,
            en_passant,
            turn,
        }
    }

    /// Computes the hash of the given position from scratch.
    pub fn hash(&self, pos: &Position, turn: Color) -> ZobristHash {
        let mut hash = 0;

        for sq in Square::all() {
            if let Some((c, p)) = pos.square(sq) {
                hash ^= self.piece_key(c, p, sq);
            }
        }
        hash ^= self.castling[pos.castling().bits() as usize];
        if let Some(ep) = pos.en_passant() {
            hash ^= self.en_passant[ep.index() as usize];
        }
        hash ^= self.turn[turn.idx()];

        hash
    }

    /// Computes the hash of the position after the (legal) move
    /// incrementally, toggling only the bits that changed. Cheaper than
    /// hashing the resulting position directly.
    pub fn apply_move(
        &self,
        h: ZobristHash,
        pos: &Position,
        turn: Color,
        m: Move,
    ) -> ZobristHash {
        let mut hash = h;
        let opp = turn.opponent();

        // (1) Undo the existing metadata.

        hash ^= self.castling[pos.castling().bits() as usize];
        if let Some(ep) = pos.en_passant() {
            hash ^= self.en_passant[ep.index() as usize];
        }
        hash ^= self.turn[turn.idx()];

        // (2) Move the piece.

        hash ^= self.piece_key(turn, m.piece, m.from);

        match m.kind {
            MoveKind::Capture => {
                hash ^= self.piece_key(opp, m.capture, m.to);
                hash ^= self.piece_key(turn, m.piece, m.to);
            }
            MoveKind::Promotion => {
                hash ^= self.piece_key(turn, m.promotion, m.to);
            }
            MoveKind::CapturePromotion => {
                hash ^= self.piece_key(opp, m.capture, m.to);
                hash ^= self.piece_key(turn, m.promotion, m.to);
            }
            MoveKind::EnPassant => {
                hash ^= self.piece_key(turn, m.piece, m.to);
                if let Some(epc) = m.en_passant_capture() {
                    hash ^= self.piece_key(opp, Piece::Pawn, epc);
                }
            }
            MoveKind::KingSideCastle | MoveKind::QueenSideCastle => {
                hash ^= self.piece_key(turn, m.piece, m.to);
                if let Some((rook_from, rook_to)) = m.castling_rook_move() {
                    hash ^= self.piece_key(turn, Piece::Rook, rook_from);
                    hash ^= self.piece_key(turn, Piece::Rook, rook_to);
                }
            }
            _ => {
                hash ^= self.piece_key(turn, m.piece, m.to);
            }
        }

        // (3) Apply the new metadata.

        hash ^= self.castling[pos.castling().after_move(m).bits() as usize];
        // A jump records its target only when an opposing pawn can take it;
        // mirror the condition so the incremental hash stays in sync.
        if let Some(ept) = m.en_passant_target()
            && !(pawn_captures(opp, pos.piece(opp, Piece::Pawn)) & Bitboard::bit(ept)).is_empty()
        {
            hash ^= self.en_passant[ept.index() as usize];
        }
        hash ^= self.turn[opp.idx()];

        hash
    }

    #[inline(always)]
    fn piece_key(&self, c: Color, p: Piece, sq: Square) -> ZobristHash {
        self.pieces[c.idx()][p.idx()][sq.index() as usize]
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        ZobristTable::new(0)
    }
}

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
