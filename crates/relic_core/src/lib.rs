//! Chess engine core: rotated-bitboard move generation, a board history
//! with draw adjudication, a family of serial cancellable search drivers
//! with iterative deepening, and a lock-free transposition table.
//!
//! Engines compose this core with their own static evaluators and move
//! selection policies through the [`Evaluator`] and
//! [`Exploration`] seams; the [`engine::Engine`] driver wraps a composed
//! search for protocol front-ends.

pub mod alphabeta;
pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod engine;
pub mod eval;
pub mod exploration;
pub mod fen;
pub mod iterative;
pub mod minimax;
pub mod movelist;
pub mod perft;
pub mod position;
pub mod pvs;
pub mod quiescence;
pub mod score;
pub mod search;
pub mod time_control;
pub mod transposition;
pub mod types;
pub mod zobrist;

// Re-export the core game and search vocabulary.
pub use bitboard::{Bitboard, RotatedBitboard};
pub use board::{Board, GameResult, Outcome, PushError, ResultReason};
pub use position::{Placement, Position, PositionError};
pub use score::{Pawns, Score};
pub use search::{
    Hooked, Leaf, Pv, QuietSearch, Search, SearchContext, SearchError, StopSignal,
};
pub use types::{
    Castling, Color, File, Move, MoveError, MoveKind, Piece, Rank, Square,
};

pub use alphabeta::AlphaBeta;
pub use engine::{Book, Engine, EngineError, EngineOptions, TableFactory};
pub use eval::{Evaluator, Material, Noise};
pub use exploration::{Considerable, Exploration, Full, NoMoves, Plausible, QuickGain};
pub use iterative::{Iterative, Launcher, Options, PvReceiver, PvSender, SearchHandle};
pub use minimax::Minimax;
pub use movelist::{MoveList, Priority};
pub use perft::perft;
pub use pvs::Pvs;
pub use quiescence::{OnePlyIfChecked, Quiescence};
pub use time_control::TimeControl;
pub use transposition::{Bound, NoTable, Table, TranspositionTable, WriteLimited};
pub use zobrist::{ZobristHash, ZobristTable};
