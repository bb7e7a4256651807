//! Game board: a chain of positions with the metadata needed to adjudicate
//! results, notably the draw conditions.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::bitboard::Bitboard;
use crate::position::Position;
use crate::types::{Color, Move, MoveKind, Piece};
use crate::zobrist::{ZobristHash, ZobristTable};

const REPETITION3_LIMIT: u32 = 3;
const REPETITION5_LIMIT: u32 = 5;
const NO_PROGRESS_PLY_LIMIT: u32 = 100;

/// The outcome of a game, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Outcome {
    Unknown,
    #[default]
    Undecided,
    WhiteWins,
    BlackWins,
    Draw,
}

impl Outcome {
    /// The outcome where the given color loses.
    pub const fn loss(c: Color) -> Outcome {
        match c {
            Color::White => Outcome::BlackWins,
            Color::Black => Outcome::WhiteWins,
        }
    }
}

/// Why a result was reached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResultReason {
    #[default]
    None,
    Checkmate,
    Stalemate,
    Repetition3,
    Repetition5,
    NoProgress,
    InsufficientMaterial,
    Adjudication,
}

/// A game result with its reason.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameResult {
    pub outcome: Outcome,
    pub reason: ResultReason,
}

impl GameResult {
    pub const UNDECIDED: GameResult = GameResult {
        outcome: Outcome::Undecided,
        reason: ResultReason::None,
    };

    pub const fn draw(reason: ResultReason) -> GameResult {
        GameResult {
            outcome: Outcome::Draw,
            reason,
        }
    }
}

/// A rejected [`Board::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PushError {
    /// The position is checkmate or stalemate: there are no legal moves.
    #[error("no legal moves in a terminal position")]
    Terminal,
    /// The move is not legal in the current position.
    #[error("illegal move: {0}")]
    Illegal(Move),
}

/// A link in the backward chain of positions. Nodes are immutable once
/// created and shared between forks by reference count; the move that
/// produced a node is stored on the node itself, so past nodes never need
/// to change when the future does.
struct Node {
    pos: Position,
    hash: ZobristHash,
    noprogress: u32,
    /// The move that produced this position; `None` at the root.
    played: Option<Move>,
    prev: Option<Arc<Node>>,
}

/// A chess board: the current position, its history, and the bookkeeping
/// for repetition, no-progress and material draws. Not thread-safe; a
/// search takes an exclusive [`Board::fork`].
#[derive(Clone)]
pub struct Board {
    zobrist: Arc<ZobristTable>,
    repetitions: HashMap<ZobristHash, u32>,

    fullmoves: u32,
    turn: Color,
    result: GameResult,
    current: Arc<Node>,
}

impl Board {
    pub fn new(
        zobrist: Arc<ZobristTable>,
        pos: Position,
        turn: Color,
        noprogress: u32,
        fullmoves: u32,
    ) -> Board {
        let hash = zobrist.hash(&pos, turn);
        let current = Arc::new(Node {
            pos,
            hash,
            noprogress,
            played: None,
            prev: None,
        });

        Board {
            zobrist,
            repetitions: HashMap::from([(hash, 1)]),
            fullmoves,
            turn,
            result: GameResult::UNDECIDED,
            current,
        }
    }

    /// Branches off an independent board sharing the past node chain. The
    /// shared nodes are immutable, so the boards cannot invalidate each
    /// other; each fork appends and pops on its own head.
    pub fn fork(&self) -> Board {
        self.clone()
    }

    #[inline(always)]
    pub fn position(&self) -> &Position {
        &self.current.pos
    }

    #[inline(always)]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline(always)]
    pub fn hash(&self) -> ZobristHash {
        self.current.hash
    }

    #[inline(always)]
    pub fn result(&self) -> GameResult {
        self.result
    }

    /// Half-moves since the last capture or pawn move.
    #[inline(always)]
    pub fn no_progress(&self) -> u32 {
        self.current.noprogress
    }

    #[inline(always)]
    pub fn fullmoves(&self) -> u32 {
        self.fullmoves
    }

    /// The absolute half-move index of the current position, starting at 0.
    pub fn ply(&self) -> u32 {
        (self.fullmoves.saturating_sub(1)) * 2 + if self.turn == Color::Black { 1 } else { 0 }
    }

    /// The last move, if any.
    pub fn last_move(&self) -> Option<Move> {
        self.current.played
    }

    /// Attempts to make a pseudo-legal move.
    pub fn push(&mut self, m: Move) -> Result<(), PushError> {
        if matches!(
            self.result.reason,
            ResultReason::Checkmate | ResultReason::Stalemate
        ) {
            return Err(PushError::Terminal); // there are no legal moves
        } // else: ignore draws, which are not always called

        let pos = self.current.pos.apply(m).ok_or(PushError::Illegal(m))?;

        // (1) Move is legal. Append the new node.

        let hash = self
            .zobrist
            .apply_move(self.current.hash, &self.current.pos, self.turn, m);
        let noprogress = if m.kind == MoveKind::Normal {
            self.current.noprogress + 1
        } else {
            0
        };
        self.current = Arc::new(Node {
            pos,
            hash,
            noprogress,
            played: Some(m),
            prev: Some(Arc::clone(&self.current)),
        });

        // (2) Update the board-level metadata.

        self.turn = self.turn.opponent();
        *self.repetitions.entry(hash).or_insert(0) += 1;
        if self.turn == Color::White {
            self.fullmoves += 1;
        }

        // (3) Determine whether a draw condition applies.

        if self.repetitions[&hash] >= REPETITION3_LIMIT {
            match self.identical_position_count() {
                n if n >= REPETITION5_LIMIT => {
                    self.result = GameResult::draw(ResultReason::Repetition5);
                }
                n if n >= REPETITION3_LIMIT => {
                    self.result = GameResult::draw(ResultReason::Repetition3);
                }
                _ => {} // zobrist collision: not an actual repetition
            }
        }

        if self.current.noprogress >= NO_PROGRESS_PLY_LIMIT {
            self.result = GameResult::draw(ResultReason::NoProgress);
        }

        let minor_promotion = matches!(m.kind, MoveKind::Promotion | MoveKind::CapturePromotion)
            && matches!(m.promotion, Piece::Bishop | Piece::Knight);
        if (m.kind == MoveKind::Capture || minor_promotion)
            && self.current.pos.has_insufficient_material()
        {
            self.result = GameResult::draw(ResultReason::InsufficientMaterial);
        }

        Ok(())
    }

    /// Reverses the most recent push, returning the move taken back. The
    /// result is restored to undecided: a legal move had been available.
    pub fn pop(&mut self) -> Option<Move> {
        let prev = self.current.prev.clone()?;
        let played = self.current.played;

        self.turn = self.turn.opponent();
        if let Some(count) = self.repetitions.get_mut(&self.current.hash) {
            *count -= 1;
            if *count == 0 {
                self.repetitions.remove(&self.current.hash);
            }
        }
        self.result = GameResult::UNDECIDED;
        if self.turn == Color::Black {
            self.fullmoves -= 1;
        }

        self.current = prev;
        played
    }

    /// Adjudicates the position assuming no legal moves exist: checkmate if
    /// the side to move is in check, stalemate otherwise.
    pub fn adjudicate_no_legal_moves(&mut self) -> GameResult {
        let result = if self.current.pos.is_checked(self.turn) {
            GameResult {
                outcome: Outcome::loss(self.turn),
                reason: ResultReason::Checkmate,
            }
        } else {
            GameResult::draw(ResultReason::Stalemate)
        };
        self.adjudicate(result);
        result
    }

    /// Adjudicates the position as given.
    pub fn adjudicate(&mut self, result: GameResult) {
        self.result = result;
    }

    /// Returns true iff the color has castled.
    pub fn has_castled(&self, c: Color) -> bool {
        let mut t = self.turn.opponent();
        let mut node = Some(&self.current);

        while let Some(n) = node {
            let Some(m) = n.played else {
                break;
            };
            if t == c && m.is_castle() {
                return true;
            }
            t = t.opponent();
            node = n.prev.as_ref();
        }
        false
    }

    /// The squares that were the origin of a move within the last
    /// `halfmoves` half-moves.
    pub fn has_moved(&self, halfmoves: u32) -> Bitboard {
        let mut out = Bitboard::EMPTY;
        let mut node = Some(&self.current);
        let mut i = 0;

        while let Some(n) = node
            && i < halfmoves
        {
            let Some(m) = n.played else {
                break;
            };
            out |= Bitboard::bit(m.from);
            node = n.prev.as_ref();
            i += 1;
        }
        out
    }

    /// Counts positions along the chain that are exactly equal to the
    /// current one, including it. The walk is bounded by the no-progress
    /// counter: any capture or pawn move makes earlier repetitions
    /// unreachable. Hash matches are confirmed by position comparison.
    fn identical_position_count(&self) -> u32 {
        let head = &self.current;
        let mut count = 1;

        let mut t = self.turn.opponent();
        let mut node = head.prev.as_ref();
        let mut i = 1;
        while i <= head.noprogress
            && let Some(n) = node
        {
            if n.hash == head.hash && t == self.turn && n.pos == head.pos {
                count += 1;
            }
            t = t.opponent();
            node = n.prev.as_ref();
            i += 1;
        }
        count
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "board{{pos={}, turn={}, hash={:x} ({}) noprogress={}, fullmoves={}, result={:?}}}",
            self.current.pos,
            self.turn,
            self.current.hash,
            self.repetitions.get(&self.current.hash).copied().unwrap_or(0),
            self.current.noprogress,
            self.fullmoves,
            self.result,
        )
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
