//! Core board geometry: colors, pieces, squares and moves.
//!
//! Squares are numbered H1=0 .. A8=63 so that a square is directly a bit
//! index into the bitboard layout:
//!
//! ```text
//!  A8=63 B8=62 C8=61 D8=60 E8=59 F8=58 G8=57 H8=56
//!  A7=55 ...                                 H7=48
//!  ...
//!  A1=7  B1=6  C1=5  D1=4  E1=3  F1=2  G1=1  H1=0
//! ```
//!
//! Files are numbered H=0 .. A=7 to match.

use std::fmt;
use thiserror::Error;

/// The playing side: white or black.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Color {
    #[default]
    White,
    Black,
}

pub const NUM_COLORS: usize = 2;

impl Color {
    #[inline(always)]
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline(always)]
    pub const fn idx(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    pub const ALL: [Color; 2] = [Color::White, Color::Black];
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "w"),
            Color::Black => write!(f, "b"),
        }
    }
}

/// A chess piece without color. `None` doubles as the "all pieces" slot in
/// the per-color bitboard arrays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Piece {
    #[default]
    None = 0,
    Pawn,
    Bishop,
    Knight,
    Rook,
    Queen,
    King,
}

pub const NUM_PIECES: usize = 7;

impl Piece {
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Bishop,
        Piece::Knight,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    #[inline(always)]
    pub const fn idx(self) -> usize {
        self as usize
    }

    #[inline(always)]
    pub const fn is_valid(self) -> bool {
        !matches!(self, Piece::None)
    }

    pub fn parse(c: char) -> Option<Piece> {
        match c.to_ascii_lowercase() {
            'p' => Some(Piece::Pawn),
            'b' => Some(Piece::Bishop),
            'n' => Some(Piece::Knight),
            'r' => Some(Piece::Rook),
            'q' => Some(Piece::Queen),
            'k' => Some(Piece::King),
            _ => None,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Piece::None => ' ',
            Piece::Pawn => 'p',
            Piece::Bishop => 'b',
            Piece::Knight => 'n',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        };
        write!(f, "{c}")
    }
}

/// A board file, H=0 .. A=7. The numbering is reversed to match [`Square`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct File(u8);

pub const NUM_FILES: u8 = 8;

impl File {
    pub const H: File = File(0);
    pub const G: File = File(1);
    pub const F: File = File(2);
    pub const E: File = File(3);
    pub const D: File = File(4);
    pub const C: File = File(5);
    pub const B: File = File(6);
    pub const A: File = File(7);

    #[inline(always)]
    pub const fn from_index(i: u8) -> File {
        debug_assert!(i < 8);
        File(i)
    }

    #[inline(always)]
    pub const fn index(self) -> u8 {
        self.0
    }

    pub fn parse(c: char) -> Option<File> {
        match c.to_ascii_lowercase() {
            'a' => Some(File::A),
            'b' => Some(File::B),
            'c' => Some(File::C),
            'd' => Some(File::D),
            'e' => Some(File::E),
            'f' => Some(File::F),
            'g' => Some(File::G),
            'h' => Some(File::H),
            _ => None,
        }
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", (b'h' - self.0) as char)
    }
}

/// A board rank, R1=0 .. R8=7.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank(u8);

pub const NUM_RANKS: u8 = 8;

impl Rank {
    pub const R1: Rank = Rank(0);
    pub const R2: Rank = Rank(1);
    pub const R3: Rank = Rank(2);
    pub const R4: Rank = Rank(3);
    pub const R5: Rank = Rank(4);
    pub const R6: Rank = Rank(5);
    pub const R7: Rank = Rank(6);
    pub const R8: Rank = Rank(7);

    #[inline(always)]
    pub const fn from_index(i: u8) -> Rank {
        debug_assert!(i < 8);
        Rank(i)
    }

    #[inline(always)]
    pub const fn index(self) -> u8 {
        self.0
    }

    pub fn parse(c: char) -> Option<Rank> {
        match c {
            '1'..='8' => Some(Rank(c as u8 - b'1')),
            _ => None,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", (b'1' + self.0) as char)
    }
}

/// A square on the board, H1=0 .. A8=63. A square is a bit index into the
/// bitboard layout; 6 bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

pub const NUM_SQUARES: u8 = 64;

macro_rules! square_consts {
    ($($name:ident = $idx:expr),* $(,)?) => {
        impl Square { $(pub const $name: Square = Square($idx);)* }
    };
}

square_consts! {
    H1 = 0, G1 = 1, F1 = 2, E1 = 3, D1 = 4, C1 = 5, B1 = 6, A1 = 7,
    H2 = 8, G2 = 9, F2 = 10, E2 = 11, D2 = 12, C2 = 13, B2 = 14, A2 = 15,
    H3 = 16, G3 = 17, F3 = 18, E3 = 19, D3 = 20, C3 = 21, B3 = 22, A3 = 23,
    H4 = 24, G4 = 25, F4 = 26, E4 = 27, D4 = 28, C4 = 29, B4 = 30, A4 = 31,
    H5 = 32, G5 = 33, F5 = 34, E5 = 35, D5 = 36, C5 = 37, B5 = 38, A5 = 39,
    H6 = 40, G6 = 41, F6 = 42, E6 = 43, D6 = 44, C6 = 45, B6 = 46, A6 = 47,
    H7 = 48, G7 = 49, F7 = 50, E7 = 51, D7 = 52, C7 = 53, B7 = 54, A7 = 55,
    H8 = 56, G8 = 57, F8 = 58, E8 = 59, D8 = 60, C8 = 61, B8 = 62, A8 = 63,
}

impl Square {
    #[inline(always)]
    pub const fn new(file: File, rank: Rank) -> Square {
        Square((rank.index() << 3) | file.index())
    }

    #[inline(always)]
    pub const fn from_index(i: u8) -> Square {
        debug_assert!(i < 64);
        Square(i)
    }

    #[inline(always)]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub const fn file(self) -> File {
        File(self.0 & 0x7)
    }

    #[inline(always)]
    pub const fn rank(self) -> Rank {
        Rank((self.0 >> 3) & 0x7)
    }

    /// Iterate all 64 squares in index order (H1 first, A8 last).
    pub fn all() -> impl Iterator<Item = Square> {
        (0..NUM_SQUARES).map(Square)
    }

    pub fn parse(s: &str) -> Result<Square, MoveError> {
        let mut it = s.chars();
        match (it.next(), it.next(), it.next()) {
            (Some(f), Some(r), None) => {
                let file = File::parse(f).ok_or_else(|| MoveError::Invalid(s.into()))?;
                let rank = Rank::parse(r).ok_or_else(|| MoveError::Invalid(s.into()))?;
                Ok(Square::new(file, rank))
            }
            _ => Err(MoveError::Invalid(s.into())),
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// The set of castling rights. 4 bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Castling(u8);

pub const NUM_CASTLING: usize = 16;

impl Castling {
    pub const NONE: Castling = Castling(0);
    pub const WHITE_KINGSIDE: Castling = Castling(1);
    pub const WHITE_QUEENSIDE: Castling = Castling(2);
    pub const BLACK_KINGSIDE: Castling = Castling(4);
    pub const BLACK_QUEENSIDE: Castling = Castling(8);
    pub const ALL: Castling = Castling(15);

    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true iff any of the given rights are allowed.
    #[inline(always)]
    pub const fn is_allowed(self, rights: Castling) -> bool {
        self.0 & rights.0 != 0
    }

    #[inline(always)]
    pub const fn with(self, rights: Castling) -> Castling {
        Castling(self.0 | rights.0)
    }

    #[inline(always)]
    pub const fn without(self, rights: Castling) -> Castling {
        Castling(self.0 & !rights.0)
    }

    /// Rights remaining after the given move. Rights drop when the king or a
    /// rook leaves its starting square, or when a rook's starting square is
    /// the destination of a capture.
    pub fn after_move(self, m: Move) -> Castling {
        let mut kept = Castling::ALL;
        for sq in [m.from, m.to] {
            kept = match sq {
                Square::E1 => kept.without(Castling::WHITE_KINGSIDE.with(Castling::WHITE_QUEENSIDE)),
                Square::H1 => kept.without(Castling::WHITE_KINGSIDE),
                Square::A1 => kept.without(Castling::WHITE_QUEENSIDE),
                Square::E8 => kept.without(Castling::BLACK_KINGSIDE.with(Castling::BLACK_QUEENSIDE)),
                Square::H8 => kept.without(Castling::BLACK_KINGSIDE),
                Square::A8 => kept.without(Castling::BLACK_QUEENSIDE),
                _ => kept,
            };
        }
        Castling(self.0 & kept.0)
    }
}

impl fmt::Display for Castling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "-");
        }
        if self.is_allowed(Castling::WHITE_KINGSIDE) {
            write!(f, "K")?;
        }
        if self.is_allowed(Castling::WHITE_QUEENSIDE) {
            write!(f, "Q")?;
        }
        if self.is_allowed(Castling::BLACK_KINGSIDE) {
            write!(f, "k")?;
        }
        if self.is_allowed(Castling::BLACK_QUEENSIDE) {
            write!(f, "q")?;
        }
        Ok(())
    }
}

/// The type of a move. The no-progress counter resets on any non-`Normal`
/// move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MoveKind {
    #[default]
    Normal,
    /// Pawn single-step move.
    Push,
    /// Pawn two-square move.
    Jump,
    /// Implicitly a pawn capture.
    EnPassant,
    QueenSideCastle,
    KingSideCastle,
    Capture,
    Promotion,
    CapturePromotion,
}

/// A not-necessarily-legal move along with contextual metadata.
///
/// `capture` is set iff the kind is `Capture` or `CapturePromotion`;
/// `promotion` is set iff the kind is `Promotion` or `CapturePromotion`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Move {
    pub kind: MoveKind,
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub capture: Piece,
    pub promotion: Piece,
}

/// A syntactically or semantically rejected move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// Malformed coordinate notation: bad square or promotion letter.
    #[error("invalid move: '{0}'")]
    Invalid(String),
    /// Pseudo-legal but rejected by legality checks (self-check, castling
    /// through check), or not a member of the generated move set.
    #[error("illegal move: '{0}'")]
    Illegal(String),
}

impl Move {
    /// The null move, rendered as `0000`. Used as the best move of terminal
    /// positions.
    pub const fn null() -> Move {
        Move {
            kind: MoveKind::Normal,
            from: Square::H1,
            to: Square::H1,
            piece: Piece::None,
            capture: Piece::None,
            promotion: Piece::None,
        }
    }

    #[inline(always)]
    pub fn is_null(self) -> bool {
        self.from == self.to
    }

    /// Parses a move in pure coordinate notation, such as `a2a4` or `a7a8q`.
    /// The parsed move does not contain contextual information like castling
    /// or en passant; use [`Move::matches`] against generated moves.
    pub fn parse(s: &str) -> Result<Move, MoveError> {
        let chars: Vec<char> = s.chars().collect();
        if !s.is_ascii() || chars.len() < 4 || chars.len() > 5 {
            return Err(MoveError::Invalid(s.into()));
        }

        let from = Square::parse(&s[0..2]).map_err(|_| MoveError::Invalid(s.into()))?;
        let to = Square::parse(&s[2..4]).map_err(|_| MoveError::Invalid(s.into()))?;

        let mut m = Move {
            from,
            to,
            ..Move::null()
        };
        if chars.len() == 5 {
            let promo = Piece::parse(chars[4]).ok_or_else(|| MoveError::Invalid(s.into()))?;
            if matches!(promo, Piece::Pawn | Piece::King) {
                return Err(MoveError::Invalid(s.into()));
            }
            m.promotion = promo;
        }
        Ok(m)
    }

    /// Identity match on from/to/promotion, ignoring contextual metadata.
    /// Parsed, pondered and table-cached moves carry no kind or capture
    /// information, so they compare against generated moves with this.
    #[inline(always)]
    pub fn matches(self, o: Move) -> bool {
        self.from == o.from && self.to == o.to && self.promotion == o.promotion
    }

    #[inline(always)]
    pub fn is_capture(self) -> bool {
        matches!(
            self.kind,
            MoveKind::Capture | MoveKind::CapturePromotion | MoveKind::EnPassant
        )
    }

    #[inline(always)]
    pub fn is_promotion(self) -> bool {
        matches!(self.kind, MoveKind::Promotion | MoveKind::CapturePromotion)
    }

    #[inline(always)]
    pub fn is_castle(self) -> bool {
        matches!(
            self.kind,
            MoveKind::KingSideCastle | MoveKind::QueenSideCastle
        )
    }

    /// The square jumped over by a pawn `Jump`, i.e. the en passant target
    /// for the opponent's reply.
    pub fn en_passant_target(self) -> Option<Square> {
        match self.kind {
            // Same file, two ranks apart: the index average is the square
            // in between.
            MoveKind::Jump => Some(Square::from_index(
                (self.from.index() + self.to.index()) / 2,
            )),
            _ => None,
        }
    }

    /// The square of the pawn captured by an `EnPassant` move: the file of
    /// the destination at the rank of the origin.
    pub fn en_passant_capture(self) -> Option<Square> {
        match self.kind {
            MoveKind::EnPassant => Some(Square::new(self.to.file(), self.from.rank())),
            _ => None,
        }
    }

    /// The rook relocation for a castling move.
    pub fn castling_rook_move(self) -> Option<(Square, Square)> {
        match (self.kind, self.to) {
            (MoveKind::KingSideCastle, Square::G1) => Some((Square::H1, Square::F1)),
            (MoveKind::KingSideCastle, Square::G8) => Some((Square::H8, Square::F8)),
            (MoveKind::QueenSideCastle, Square::C1) => Some((Square::A1, Square::D1)),
            (MoveKind::QueenSideCastle, Square::C8) => Some((Square::A8, Square::D8)),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "0000");
        }
        if self.promotion.is_valid() {
            write!(f, "{}{}{}", self.from, self.to, self.promotion)
        } else {
            write!(f, "{}{}", self.from, self.to)
        }
    }
}

/// Formats a move list as space-separated coordinate notation.
pub fn print_moves(moves: &[Move]) -> String {
    let strs: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
    strs.join(" ")
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
