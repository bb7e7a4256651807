//! Reading and writing positions in Forsyth-Edwards Notation.

use std::sync::Arc;

use thiserror::Error;

use crate::board::Board;
use crate::position::{Placement, Position};
use crate::types::{Castling, Color, File, Piece, Rank, Square};
use crate::zobrist::ZobristTable;

/// The initial position.
pub const INITIAL: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A malformed FEN record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid FEN '{fen}': {reason}")]
pub struct FenError {
    pub fen: String,
    pub reason: String,
}

fn invalid(fen: &str, reason: impl Into<String>) -> FenError {
    FenError {
        fen: fen.into(),
        reason: reason.into(),
    }
}

/// Decodes a FEN record into a position, the side to move, the no-progress
/// counter and the fullmove number. The counters are optional and default
/// to 0 and 1.
pub fn decode(fen: &str) -> Result<(Position, Color, u32, u32), FenError> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() < 4 || parts.len() > 6 {
        return Err(invalid(fen, "expected 4 to 6 fields"));
    }

    // (1) Piece placement, from white's perspective: rank 8 first, each
    // rank from file a through h.

    let mut placements = Vec::with_capacity(32);
    let mut idx: i32 = 63;
    for c in parts[0].chars() {
        match c {
            '/' => {} // rank separator, cosmetic
            '1'..='8' => idx -= c as i32 - '0' as i32,
            _ => {
                let piece = Piece::parse(c).ok_or_else(|| invalid(fen, format!("bad piece '{c}'")))?;
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                if idx < 0 {
                    return Err(invalid(fen, "too many squares"));
                }
                placements.push(Placement {
                    square: Square::from_index(idx as u8),
                    color,
                    piece,
                });
                idx -= 1;
            }
        }
        if idx < -1 {
            return Err(invalid(fen, "too many squares"));
        }
    }
    if idx != -1 {
        return Err(invalid(fen, "wrong number of squares"));
    }

    // (2) Active color.

    let turn = match parts[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(invalid(fen, format!("bad side to move '{other}'"))),
    };

    // (3) Castling availability.

    let mut castling = Castling::NONE;
    if parts[2] != "-" {
        for c in parts[2].chars() {
            castling = match c {
                'K' => castling.with(Castling::WHITE_KINGSIDE),
                'Q' => castling.with(Castling::WHITE_QUEENSIDE),
                'k' => castling.with(Castling::BLACK_KINGSIDE),
                'q' => castling.with(Castling::BLACK_QUEENSIDE),
                _ => return Err(invalid(fen, format!("bad castling '{c}'"))),
            };
        }
    }

    // (4) En passant target square.

    let en_passant = if parts[3] == "-" {
        None
    } else {
        let sq = Square::parse(parts[3]).map_err(|_| invalid(fen, "bad en passant square"))?;
        if sq.rank() != Rank::R3 && sq.rank() != Rank::R6 {
            return Err(invalid(fen, "bad en passant rank"));
        }
        Some(sq)
    };

    // (5) + (6) Halfmove clock and fullmove number.

    let noprogress: u32 = parts
        .get(4)
        .copied()
        .unwrap_or("0")
        .parse()
        .map_err(|_| invalid(fen, "bad halfmove clock"))?;
    let fullmoves: u32 = parts
        .get(5)
        .copied()
        .unwrap_or("1")
        .parse()
        .map_err(|_| invalid(fen, "bad fullmove number"))?;

    let pos = Position::new(&placements, castling, en_passant)
        .map_err(|e| invalid(fen, e.to_string()))?;
    Ok((pos, turn, noprogress, fullmoves))
}

/// Creates a board from a FEN record, hashing with the default seed.
pub fn new_board(fen: &str) -> Result<Board, FenError> {
    let (pos, turn, noprogress, fullmoves) = decode(fen)?;
    Ok(Board::new(
        Arc::new(ZobristTable::new(0)),
        pos,
        turn,
        noprogress,
        fullmoves,
    ))
}

/// The board at the initial position.
pub fn initial_board() -> Board {
    // The constant is well-formed.
    match new_board(INITIAL) {
        Ok(b) => b,
        Err(e) => unreachable!("initial position: {e}"),
    }
}

/// Encodes the board as a FEN record.
pub fn encode(b: &Board) -> String {
    let pos = b.position();
    let mut out = String::with_capacity(80);

    for rank in (0..8u8).rev() {
        if rank != 7 {
            out.push('/');
        }
        let mut empty = 0;
        for file in (0..8u8).rev() {
            let sq = Square::new(File::from_index(file), Rank::from_index(rank));
            match pos.square(sq) {
                Some((c, p)) => {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    let letter = p.to_string();
                    out.push_str(&if c == Color::White {
                        letter.to_uppercase()
                    } else {
                        letter
                    });
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push_str(&empty.to_string());
        }
    }

    let ep = match pos.en_passant() {
        Some(sq) => sq.to_string(),
        None => "-".to_string(),
    };
    out.push_str(&format!(
        " {} {} {} {} {}",
        b.turn(),
        pos.castling(),
        ep,
        b.no_progress(),
        b.fullmoves()
    ));
    out
}

/// The first four space-separated FEN fields: piece placement, side to
/// move, castling rights and en passant target. Positions identical under
/// the repetition rule share a key, so it suits callers keyed on position
/// alone, such as opening books.
pub fn key(fen: &str) -> String {
    fen.split_whitespace()
        .take(4)
        .collect::<Vec<&str>>()
        .join(" ")
}

#[cfg(test)]
#[path = "fen_tests.rs"]
mod fen_tests;
