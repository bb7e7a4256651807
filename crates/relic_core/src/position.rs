//! Board position: piece placement, pseudo-legal move generation and the
//! legality checks applied when a move is made.

use std::fmt;

use thiserror::Error;

use crate::attacks::{attacks, bishop_attacks, king_attacks, knight_attacks, rook_attacks};
use crate::bitboard::{Bitboard, RotatedBitboard, jump_rank, pawn_captures, pawn_pushes, promotion_rank};
use crate::types::{Castling, Color, Move, MoveKind, NUM_COLORS, NUM_PIECES, Piece, Square};

/// A piece placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub square: Square,
    pub color: Color,
    pub piece: Piece,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", print_piece(self.color, self.piece), self.square)
    }
}

/// An invalid piece placement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("duplicate placement: {0}")]
    DuplicatePlacement(Placement),
    #[error("invalid number of kings")]
    InvalidKings,
    #[error("kings cannot be adjacent")]
    AdjacentKings,
}

/// A board position suitable for move generation. It includes castling
/// rights and the en passant target, but not the game metadata needed for
/// draw adjudication (see [`Board`](crate::board::Board)).
///
/// Invariants: exactly one king per color; kings not adjacent; if the en
/// passant target is set, its rank is 3 or 6.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    /// Per-color piece boards; index 0 (`Piece::None`) holds all pieces of
    /// that color.
    pieces: [[Bitboard; NUM_PIECES]; NUM_COLORS],
    rotated: RotatedBitboard,
    castling: Castling,
    /// `Square::H1` means "no target": the previous move was not a jump.
    en_passant: Square,
}

impl Position {
    pub fn new(
        placements: &[Placement],
        castling: Castling,
        en_passant: Option<Square>,
    ) -> Result<Position, PositionError> {
        let mut ret = Position {
            pieces: [[Bitboard::EMPTY; NUM_PIECES]; NUM_COLORS],
            rotated: RotatedBitboard::EMPTY,
            castling,
            en_passant: en_passant.unwrap_or(Square::H1),
        };

        for &p in placements {
            if !ret.is_empty(p.square) {
                return Err(PositionError::DuplicatePlacement(p));
            }
            ret.xor(p.square, p.color, p.piece);
        }

        if ret.piece(Color::White, Piece::King).pop_count() != 1
            || ret.piece(Color::Black, Piece::King).pop_count() != 1
        {
            return Err(PositionError::InvalidKings);
        }
        if let Some(wk) = ret.piece(Color::White, Piece::King).first_square()
            && !(king_attacks(wk) & ret.piece(Color::Black, Piece::King)).is_empty()
        {
            return Err(PositionError::AdjacentKings);
        }
        Ok(ret)
    }

    /// The castling rights.
    #[inline(always)]
    pub fn castling(&self) -> Castling {
        self.castling
    }

    /// The en passant target square, if the previous move was a jump that
    /// an opposing pawn can actually capture on. For example, after e2e4
    /// the target is e3 only if black has a pawn on d4 or f4; a target no
    /// pawn can take would make otherwise identical positions compare and
    /// hash apart under the repetition rule.
    #[inline(always)]
    pub fn en_passant(&self) -> Option<Square> {
        if self.en_passant == Square::H1 {
            None
        } else {
            Some(self.en_passant)
        }
    }

    /// The pieces of the given color; `Piece::None` returns all of them.
    #[inline(always)]
    pub fn piece(&self, c: Color, p: Piece) -> Bitboard {
        self.pieces[c.idx()][p.idx()]
    }

    /// All pieces of the given color.
    #[inline(always)]
    pub fn all(&self, c: Color) -> Bitboard {
        self.pieces[c.idx()][Piece::None.idx()]
    }

    /// The rotated occupancy of all pieces.
    #[inline(always)]
    pub fn rotated(&self) -> RotatedBitboard {
        self.rotated
    }

    #[inline(always)]
    pub fn is_empty(&self, sq: Square) -> bool {
        !self.rotated.mask().is_set(sq)
    }

    /// The content of the given square, if any.
    pub fn square(&self, sq: Square) -> Option<(Color, Piece)> {
        if self.is_empty(sq) {
            return None;
        }
        for c in Color::ALL {
            if !self.all(c).is_set(sq) {
                continue;
            }
            for p in Piece::ALL {
                if self.piece(c, p).is_set(sq) {
                    return Some((c, p));
                }
            }
        }
        None
    }

    /// Returns true iff the square is attacked by the opponent of `c`. En
    /// passant is not considered an attack.
    pub fn is_attacked(&self, c: Color, sq: Square) -> bool {
        let opp = c.opponent();

        let bishops = self.piece(opp, Piece::Bishop) | self.piece(opp, Piece::Queen);
        if !bishops.is_empty() && !(bishop_attacks(self.rotated, sq) & bishops).is_empty() {
            return true;
        }
        let knights = self.piece(opp, Piece::Knight);
        if !knights.is_empty() && !(knight_attacks(sq) & knights).is_empty() {
            return true;
        }
        let rooks = self.piece(opp, Piece::Rook) | self.piece(opp, Piece::Queen);
        if !rooks.is_empty() && !(rook_attacks(self.rotated, sq) & rooks).is_empty() {
            return true;
        }
        if !(king_attacks(sq) & self.piece(opp, Piece::King)).is_empty() {
            return true;
        }
        !(pawn_captures(opp, self.piece(opp, Piece::Pawn)) & Bitboard::bit(sq)).is_empty()
    }

    /// Returns true iff the color is in check.
    pub fn is_checked(&self, c: Color) -> bool {
        match self.piece(c, Piece::King).first_square() {
            Some(king) => self.is_attacked(c, king),
            None => false,
        }
    }

    /// Returns true iff the color is checkmated: in check with no legal move.
    pub fn is_checkmate(&self, c: Color) -> bool {
        self.is_checked(c) && !self.has_legal_move(c)
    }

    /// Returns true iff the color has at least one legal move.
    pub fn has_legal_move(&self, turn: Color) -> bool {
        self.pseudo_legal_moves(turn)
            .iter()
            .any(|&m| self.apply(m).is_some())
    }

    /// Generates the moves that respect piece movement rules and do not
    /// capture own pieces, but may leave the own king in check. Castling is
    /// emitted whenever the rights are present and the squares between king
    /// and rook are empty; transit-square attacks are rejected by
    /// [`Position::apply`]. Underpromotions are included.
    ///
    /// The generation order is an implementation detail.
    pub fn pseudo_legal_moves(&self, turn: Color) -> Vec<Move> {
        let mut out = Vec::with_capacity(64);
        let own = self.all(turn);

        // Sliding pieces and knights.
        for piece in [Piece::Bishop, Piece::Rook, Piece::Queen, Piece::Knight] {
            let mut origins = self.piece(turn, piece);
            while let Some(from) = origins.pop_first() {
                let mut targets = attacks(self.rotated, from, piece) & !own;
                while let Some(to) = targets.pop_first() {
                    out.push(self.officer_move(piece, from, to));
                }
            }
        }

        self.pawn_moves(turn, &mut out);

        let mut kings = self.piece(turn, Piece::King);
        while let Some(from) = kings.pop_first() {
            let mut targets = king_attacks(from) & !own;
            while let Some(to) = targets.pop_first() {
                out.push(self.officer_move(Piece::King, from, to));
            }
        }

        self.castling_moves(turn, &mut out);
        out
    }

    fn officer_move(&self, piece: Piece, from: Square, to: Square) -> Move {
        let mut m = Move {
            kind: MoveKind::Normal,
            from,
            to,
            piece,
            ..Move::null()
        };
        if let Some((_, captured)) = self.square(to) {
            m.kind = MoveKind::Capture;
            m.capture = captured;
        }
        m
    }

    fn pawn_moves(&self, turn: Color, out: &mut Vec<Move>) {
        let all = self.rotated.mask();
        let theirs = self.all(turn.opponent());
        let promo = promotion_rank(turn);
        let jump = jump_rank(turn);

        let mut pawns = self.piece(turn, Piece::Pawn);
        while let Some(from) = pawns.pop_first() {
            let origin = Bitboard::bit(from);

            // Captures, including capture-promotions.
            let mut targets = pawn_captures(turn, origin) & theirs;
            while let Some(to) = targets.pop_first() {
                let Some((_, captured)) = self.square(to) else {
                    continue;
                };
                if promo.is_set(to) {
                    for p in [Piece::Queen, Piece::Rook, Piece::Knight, Piece::Bishop] {
                        out.push(Move {
                            kind: MoveKind::CapturePromotion,
                            from,
                            to,
                            piece: Piece::Pawn,
                            capture: captured,
                            promotion: p,
                        });
                    }
                } else {
                    out.push(Move {
                        kind: MoveKind::Capture,
                        from,
                        to,
                        piece: Piece::Pawn,
                        capture: captured,
                        ..Move::null()
                    });
                }
            }

            // Single push, promotions, and the jump continuation.
            let push = pawn_pushes(turn, origin, all);
            if let Some(to) = push.first_square() {
                if promo.is_set(to) {
                    for p in [Piece::Queen, Piece::Rook, Piece::Knight, Piece::Bishop] {
                        out.push(Move {
                            kind: MoveKind::Promotion,
                            from,
                            to,
                            piece: Piece::Pawn,
                            promotion: p,
                            ..Move::null()
                        });
                    }
                } else {
                    out.push(Move {
                        kind: MoveKind::Push,
                        from,
                        to,
                        piece: Piece::Pawn,
                        ..Move::null()
                    });
                }

                if let Some(to) = (pawn_pushes(turn, push, all) & jump).first_square() {
                    out.push(Move {
                        kind: MoveKind::Jump,
                        from,
                        to,
                        piece: Piece::Pawn,
                        ..Move::null()
                    });
                }
            }

            // En passant: the origin attacks the target square.
            if let Some(ep) = self.en_passant()
                && !(pawn_captures(turn, origin) & Bitboard::bit(ep)).is_empty()
            {
                out.push(Move {
                    kind: MoveKind::EnPassant,
                    from,
                    to: ep,
                    piece: Piece::Pawn,
                    ..Move::null()
                });
            }
        }
    }

    fn castling_moves(&self, turn: Color, out: &mut Vec<Move>) {
        let all = self.rotated.mask();
        let (kingside, queenside, from) = match turn {
            Color::White => (
                Castling::WHITE_KINGSIDE,
                Castling::WHITE_QUEENSIDE,
                Square::E1,
            ),
            Color::Black => (
                Castling::BLACK_KINGSIDE,
                Castling::BLACK_QUEENSIDE,
                Square::E8,
            ),
        };

        if self.castling.is_allowed(kingside) {
            let between = match turn {
                Color::White => Bitboard::bit(Square::F1) | Bitboard::bit(Square::G1),
                Color::Black => Bitboard::bit(Square::F8) | Bitboard::bit(Square::G8),
            };
            if (all & between).is_empty() {
                out.push(Move {
                    kind: MoveKind::KingSideCastle,
                    from,
                    to: match turn {
                        Color::White => Square::G1,
                        Color::Black => Square::G8,
                    },
                    piece: Piece::King,
                    ..Move::null()
                });
            }
        }
        if self.castling.is_allowed(queenside) {
            let between = match turn {
                Color::White => {
                    Bitboard::bit(Square::B1) | Bitboard::bit(Square::C1) | Bitboard::bit(Square::D1)
                }
                Color::Black => {
                    Bitboard::bit(Square::B8) | Bitboard::bit(Square::C8) | Bitboard::bit(Square::D8)
                }
            };
            if (all & between).is_empty() {
                out.push(Move {
                    kind: MoveKind::QueenSideCastle,
                    from,
                    to: match turn {
                        Color::White => Square::C1,
                        Color::Black => Square::C8,
                    },
                    piece: Piece::King,
                    ..Move::null()
                });
            }
        }
    }

    /// Returns the position after the move, or `None` when the move is not
    /// legal: the from-square is empty, the own king would be left in
    /// check, or castling would move the king through an attacked square
    /// (origin included).
    pub fn apply(&self, m: Move) -> Option<Position> {
        let (turn, piece) = self.square(m.from)?;

        let mut next = self.clone();
        next.en_passant = Square::H1;
        next.xor(m.from, turn, piece);

        match m.kind {
            MoveKind::Normal | MoveKind::Push => next.xor(m.to, turn, piece),
            MoveKind::Jump => {
                next.xor(m.to, turn, piece);
                let target = m.en_passant_target()?;
                let takers = self.piece(turn.opponent(), Piece::Pawn);
                if !(pawn_captures(turn.opponent(), takers) & Bitboard::bit(target)).is_empty() {
                    next.en_passant = target;
                }
            }
            MoveKind::Capture => {
                next.xor(m.to, turn.opponent(), m.capture);
                next.xor(m.to, turn, piece);
            }
            MoveKind::EnPassant => {
                next.xor(m.en_passant_capture()?, turn.opponent(), Piece::Pawn);
                next.xor(m.to, turn, piece);
            }
            MoveKind::Promotion => next.xor(m.to, turn, m.promotion),
            MoveKind::CapturePromotion => {
                next.xor(m.to, turn.opponent(), m.capture);
                next.xor(m.to, turn, m.promotion);
            }
            MoveKind::KingSideCastle | MoveKind::QueenSideCastle => {
                next.xor(m.to, turn, piece);
                let (rook_from, rook_to) = m.castling_rook_move()?;
                next.xor(rook_from, turn, Piece::Rook);
                next.xor(rook_to, turn, Piece::Rook);
            }
        }
        next.castling = self.castling.after_move(m);

        if m.is_castle() {
            for sq in castle_transit(m)? {
                if self.is_attacked(turn, sq) {
                    return None;
                }
            }
        }
        if next.is_checked(turn) {
            return None;
        }
        Some(next)
    }

    /// Returns true for K vs K, K+minor vs K, and K+B vs K+B with both
    /// bishops on the same square color. Callers decide when to consult
    /// this (typically after a capture or a minor promotion).
    pub fn has_insufficient_material(&self) -> bool {
        let all = self.all(Color::White) | self.all(Color::Black);
        let kings = self.piece(Color::White, Piece::King) | self.piece(Color::Black, Piece::King);
        if all == kings {
            return true;
        }

        let minors = self.piece(Color::White, Piece::Bishop)
            | self.piece(Color::White, Piece::Knight)
            | self.piece(Color::Black, Piece::Bishop)
            | self.piece(Color::Black, Piece::Knight);
        if all == (kings | minors) && minors.pop_count() == 1 {
            return true;
        }

        let wb = self.piece(Color::White, Piece::Bishop);
        let bb = self.piece(Color::Black, Piece::Bishop);
        if all == (kings | wb | bb)
            && wb.pop_count() == 1
            && bb.pop_count() == 1
            && let (Some(w), Some(b)) = (wb.first_square(), bb.first_square())
        {
            return square_shade(w) == square_shade(b);
        }
        false
    }

    fn xor(&mut self, sq: Square, color: Color, piece: Piece) {
        self.rotated = self.rotated.xor(sq);
        self.pieces[color.idx()][Piece::None.idx()] ^= Bitboard::bit(sq);
        self.pieces[color.idx()][piece.idx()] ^= Bitboard::bit(sq);
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..64u8 {
            if i != 0 && i % 8 == 0 {
                write!(f, "/")?;
            }
            match self.square(Square::from_index(63 - i)) {
                Some((c, p)) => write!(f, "{}", print_piece(c, p))?,
                None => write!(f, "-")?,
            }
        }
        let ep = match self.en_passant() {
            Some(sq) => sq.to_string(),
            None => "-".to_string(),
        };
        write!(f, " {}({})", self.castling, ep)
    }
}

/// The king's transit squares of a castling move, origin included.
fn castle_transit(m: Move) -> Option<[Square; 3]> {
    match (m.kind, m.to) {
        (MoveKind::KingSideCastle, Square::G1) => Some([Square::E1, Square::F1, Square::G1]),
        (MoveKind::KingSideCastle, Square::G8) => Some([Square::E8, Square::F8, Square::G8]),
        (MoveKind::QueenSideCastle, Square::C1) => Some([Square::E1, Square::D1, Square::C1]),
        (MoveKind::QueenSideCastle, Square::C8) => Some([Square::E8, Square::D8, Square::C8]),
        _ => None,
    }
}

/// Square shade for same-colored-bishop detection: 0 for dark, 1 for light.
fn square_shade(sq: Square) -> u8 {
    (sq.file().index() + sq.rank().index()) % 2
}

fn print_piece(c: Color, p: Piece) -> String {
    match c {
        Color::White => p.to_string().to_uppercase(),
        Color::Black => p.to_string(),
    }
}

#[cfg(test)]
#[path = "position_tests.rs"]
mod position_tests;
