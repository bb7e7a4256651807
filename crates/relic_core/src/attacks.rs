//! Precomputed attack tables.
//!
//! King and knight attacks are constant 64-entry tables built by geometric
//! expansion with file-boundary cropping. Sliding attacks use the rotated
//! bitboard scheme: for each square, the occupancy byte of the rank, file
//! or diagonal through it indexes a table of reachable squares. The tables
//! include the first blocker in each direction, so an "attack" covers the
//! blocker square itself and capture generation falls out directly.
//!
//! The four ray tables hold 64 x 256 bitboards each (~512 KB total) and are
//! filled once on first use.

use once_cell::sync::Lazy;

use crate::bitboard::{Bitboard, NUM_LINE_STATES, RotatedBitboard};
use crate::types::{File, Piece, Square};

/// All potential moves/attacks for a king at the given square.
#[inline(always)]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING[sq.index() as usize]
}

/// All potential moves/attacks for a knight at the given square.
#[inline(always)]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT[sq.index() as usize]
}

/// All potential moves/attacks for a rook at the given square, given the
/// rotated occupancy.
#[inline]
pub fn rook_attacks(bb: RotatedBitboard, sq: Square) -> Bitboard {
    let i = sq.index() as usize;
    ROOK_RANK[i][bb.rank_state(sq)] | ROOK_FILE[i][bb.file_state(sq)]
}

/// All potential moves/attacks for a bishop at the given square, given the
/// rotated occupancy.
#[inline]
pub fn bishop_attacks(bb: RotatedBitboard, sq: Square) -> Bitboard {
    let i = sq.index() as usize;
    BISHOP_L[i][bb.diag_l_state(sq)] | BISHOP_R[i][bb.diag_r_state(sq)]
}

/// All potential moves/attacks for a queen at the given square.
#[inline]
pub fn queen_attacks(bb: RotatedBitboard, sq: Square) -> Bitboard {
    rook_attacks(bb, sq) | bishop_attacks(bb, sq)
}

/// All potential moves/attacks for an officer (= non-pawn) at the given
/// square.
pub fn attacks(bb: RotatedBitboard, sq: Square, piece: Piece) -> Bitboard {
    match piece {
        Piece::King => king_attacks(sq),
        Piece::Queen => queen_attacks(bb, sq),
        Piece::Rook => rook_attacks(bb, sq),
        Piece::Bishop => bishop_attacks(bb, sq),
        Piece::Knight => knight_attacks(sq),
        _ => panic!("invalid piece: {piece:?}"),
    }
}

static KING: [Bitboard; 64] = {
    let file_a = Bitboard::file(File::A).0;
    let file_h = Bitboard::file(File::H).0;

    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;
    while sq < 64 {
        // Build mask w/ crop: x -> xxx -> xxx/xxx/xxx -> xxx/x-x/xxx
        let bit = 1u64 << sq;
        let mut tmp = bit;
        tmp |= ((tmp << 1) & !file_h) | ((tmp >> 1) & !file_a);
        tmp |= tmp << 8 | tmp >> 8;
        tmp &= !bit;

        table[sq as usize] = Bitboard(tmp);
        sq += 1;
    }
    table
};

static KNIGHT: [Bitboard; 64] = {
    let file_a = Bitboard::file(File::A).0;
    let file_b = Bitboard::file(File::B).0;
    let file_g = Bitboard::file(File::G).0;
    let file_h = Bitboard::file(File::H).0;

    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;
    while sq < 64 {
        // Build mask w/ crop: x-x + x---x -> --x-x--/-x---x-/-------/-x---x-/--x-x--
        let bit = 1u64 << sq;
        let one = ((bit << 1) & !file_h) | ((bit >> 1) & !file_a);
        let two = ((bit << 2) & !(file_g | file_h)) | ((bit >> 2) & !(file_a | file_b));
        let tmp = one << 16 | one >> 16 | two << 8 | two >> 8;

        table[sq as usize] = Bitboard(tmp);
        sq += 1;
    }
    table
};

type RayTable = Box<[[Bitboard; NUM_LINE_STATES]; 64]>;

/// `(square, rank occupancy byte) -> reachable squares along the rank`.
static ROOK_RANK: Lazy<RayTable> = Lazy::new(|| {
    // Build masks by raytracing each direction.
    //
    // For example,
    //    Rook:    --R-----  (rook on index 2 of the line)
    //    State:   -XX---X-  (pieces on the line)
    //    Attack:  -X-XXXX-  (rook moves/attacks)
    let mut table: RayTable = Box::new([[Bitboard::EMPTY; NUM_LINE_STATES]; 64]);
    for sq in Square::all() {
        let file = sq.file().index() as usize;
        let base = (sq.rank().index() as usize) << 3;
        for state in 0..NUM_LINE_STATES {
            let mut tmp = Bitboard::EMPTY;

            for i in file + 1..8 {
                tmp |= Bitboard(1 << (base + i));
                if state & (1 << i) != 0 {
                    break;
                }
            }
            for i in (0..file).rev() {
                tmp |= Bitboard(1 << (base + i));
                if state & (1 << i) != 0 {
                    break;
                }
            }

            table[sq.index() as usize][state] = tmp;
        }
    }
    table
});

/// `(square, file occupancy byte) -> reachable squares along the file`.
static ROOK_FILE: Lazy<RayTable> = Lazy::new(|| {
    let mut table: RayTable = Box::new([[Bitboard::EMPTY; NUM_LINE_STATES]; 64]);
    for sq in Square::all() {
        let file = sq.file().index() as usize;
        let rank = sq.rank().index() as usize;
        for state in 0..NUM_LINE_STATES {
            let mut tmp = Bitboard::EMPTY;

            for i in rank + 1..8 {
                tmp |= Bitboard(1 << (file + (i << 3)));
                if state & (1 << i) != 0 {
                    break;
                }
            }
            for i in (0..rank).rev() {
                tmp |= Bitboard(1 << (file + (i << 3)));
                if state & (1 << i) != 0 {
                    break;
                }
            }

            table[sq.index() as usize][state] = tmp;
        }
    }
    table
});

/// `(square, 45L diagonal occupancy) -> reachable squares`. The state bit of
/// a diagonal square is its `min(rank, file)` coordinate along the line.
static BISHOP_L: Lazy<RayTable> = Lazy::new(|| {
    let mut table: RayTable = Box::new([[Bitboard::EMPTY; NUM_LINE_STATES]; 64]);
    for sq in Square::all() {
        let file = sq.file().index() as usize;
        let rank = sq.rank().index() as usize;
        let along = rank.min(file);
        for state in 0..=crate::bitboard::MASK45L[sq.index() as usize] {
            let mut tmp = Bitboard::EMPTY;

            for i in 1..(8 - rank).min(8 - file) {
                tmp |= Bitboard(1 << (((rank + i) << 3) + file + i));
                if state & (1 << (along + i)) != 0 {
                    break;
                }
            }
            for i in 1..along + 1 {
                tmp |= Bitboard(1 << (((rank - i) << 3) + file - i));
                if state & (1 << (along - i)) != 0 {
                    break;
                }
            }

            table[sq.index() as usize][state] = tmp;
        }
    }
    table
});

/// `(square, 45R diagonal occupancy) -> reachable squares`. The state bit of
/// a diagonal square is its `min(rank, 7 - file)` coordinate along the line.
static BISHOP_R: Lazy<RayTable> = Lazy::new(|| {
    let mut table: RayTable = Box::new([[Bitboard::EMPTY; NUM_LINE_STATES]; 64]);
    for sq in Square::all() {
        let file = sq.file().index() as usize;
        let rank = sq.rank().index() as usize;
        let along = rank.min(7 - file);
        for state in 0..=crate::bitboard::MASK45R[sq.index() as usize] {
            let mut tmp = Bitboard::EMPTY;

            for i in 1..(8 - rank).min(file + 1) {
                tmp |= Bitboard(1 << (((rank + i) << 3) + file - i));
                if state & (1 << (along + i)) != 0 {
                    break;
                }
            }
            for i in 1..(rank + 1).min(8 - file) {
                tmp |= Bitboard(1 << (((rank - i) << 3) + file + i));
                if state & (1 << (along - i)) != 0 {
                    break;
                }
            }

            table[sq.index() as usize][state] = tmp;
        }
    }
    table
});

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
