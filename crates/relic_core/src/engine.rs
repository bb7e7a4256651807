//! The engine driver boundary: one board, one optional active search, and
//! the knobs a protocol front-end manipulates. Protocol loops (UCI,
//! console) live outside the core and drive this type.

use std::sync::Arc;

use log::info;
use thiserror::Error;

use crate::board::Board;
use crate::eval::Noise;
use crate::fen::{self, FenError};
use crate::iterative::{Iterative, Launcher, Options, PvReceiver, SearchHandle};
use crate::search::{Pv, Search};
use crate::transposition::{NoTable, Table, TranspositionTable};
use crate::types::{Move, MoveError};
use crate::zobrist::ZobristTable;

/// A failed engine operation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A second concurrent analyze on the same engine.
    #[error("search already active")]
    SearchAlreadyActive,
    #[error("no active search")]
    NoActiveSearch,
    #[error("no move to take back")]
    NoMoveToTakeBack,
    #[error(transparent)]
    Fen(#[from] FenError),
    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Engine-level defaults, applied on [`Engine::reset`].
#[derive(Clone, Copy, Debug, Default)]
pub struct EngineOptions {
    /// Default search depth limit; `None` means no limit.
    pub depth: Option<u32>,
    /// Transposition table size in MB; zero disables the table.
    pub hash_mb: u64,
    /// Leaf evaluation noise in millipawns; zero disables it.
    pub noise: u32,
}

/// Builds the transposition table for a requested byte size. Engines whose
/// evaluations depend on recent history substitute a
/// [`WriteLimited`](crate::transposition::WriteLimited) factory here.
pub type TableFactory = Box<dyn Fn(u64) -> Arc<dyn TranspositionTable> + Send + Sync>;

/// An opening book, keyed by the four-field FEN of a position (see
/// [`fen::key`]). Drivers consult it between searches, never from within
/// one; once it returns an empty list, the game is out of book.
pub trait Book: Send + Sync {
    fn lookup(&self, fen_key: &str) -> Vec<Move>;
}

/// Game-playing logic around a root search: position bookkeeping, search
/// lifecycle, and the options a front-end exposes.
pub struct Engine {
    name: String,
    author: String,

    launcher: Box<dyn Launcher>,
    factory: TableFactory,
    zobrist: Arc<ZobristTable>,
    opts: EngineOptions,

    board: Board,
    tt: Arc<dyn TranspositionTable>,
    noise: Noise,
    seed: u64,
    active: Option<Arc<dyn SearchHandle>>,
}

impl Engine {
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
        root: impl Search + 'static,
        opts: EngineOptions,
    ) -> Engine {
        let mut e = Engine {
            name: name.into(),
            author: author.into(),
            launcher: Box::new(Iterative::new(root)),
            factory: Box::new(|size| Arc::new(Table::new(size))),
            zobrist: Arc::new(ZobristTable::new(0)),
            opts,
            board: fen::initial_board(),
            tt: Arc::new(NoTable),
            noise: Noise::none(),
            seed: 0,
            active: None,
        };
        // The initial constant is well-formed; reset cannot fail on it.
        let _ = e.reset(fen::INITIAL);

        info!("initialized engine: {}, options={:?}", e.name, e.opts);
        e
    }

    /// Replaces the transposition table factory.
    pub fn with_table_factory(mut self, factory: TableFactory) -> Engine {
        self.factory = factory;
        let _ = self.reset(fen::INITIAL);
        self
    }

    /// Uses the given seed for the Zobrist table and the noise generator
    /// instead of the default of zero.
    pub fn with_seed(mut self, seed: u64) -> Engine {
        self.seed = seed;
        self.zobrist = Arc::new(ZobristTable::new(seed));
        let _ = self.reset(fen::INITIAL);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn options(&self) -> EngineOptions {
        self.opts
    }

    pub fn set_depth(&mut self, depth: Option<u32>) {
        self.opts.depth = depth;
    }

    pub fn set_hash(&mut self, megabytes: u64) {
        self.opts.hash_mb = megabytes;
    }

    pub fn set_noise(&mut self, millipawns: u32) {
        self.opts.noise = millipawns;
    }

    /// A forked board for external inspection or a private search.
    pub fn board(&self) -> Board {
        self.board.fork()
    }

    /// The current position in FEN. Convenience function.
    pub fn position(&self) -> String {
        fen::encode(&self.board)
    }

    /// Resets the engine to a new starting position in FEN, rebuilding the
    /// transposition table and noise generator from the current options.
    pub fn reset(&mut self, position: &str) -> Result<(), EngineError> {
        info!(
            "reset {position}, depth={:?}, tt={}MB, noise={}mp",
            self.opts.depth, self.opts.hash_mb, self.opts.noise
        );

        self.halt_if_active();

        let (pos, turn, noprogress, fullmoves) = fen::decode(position)?;
        self.board = Board::new(Arc::clone(&self.zobrist), pos, turn, noprogress, fullmoves);

        self.tt = if self.opts.hash_mb > 0 {
            (self.factory)(self.opts.hash_mb << 20)
        } else {
            Arc::new(NoTable)
        };
        self.noise = Noise::new(self.opts.noise, self.seed);

        info!("new board: {}", self.board);
        Ok(())
    }

    /// Selects the given move in pure coordinate notation, usually an
    /// opponent move.
    pub fn play(&mut self, pcan: &str) -> Result<(), EngineError> {
        let candidate = Move::parse(pcan)?;

        self.halt_if_active();

        for m in self.board.position().pseudo_legal_moves(self.board.turn()) {
            if !candidate.matches(m) {
                continue;
            }
            // The candidate is at least pseudo-legal.
            return match self.board.push(m) {
                Ok(()) => {
                    info!("move {m}: {}", self.board);
                    Ok(())
                }
                Err(_) => Err(MoveError::Illegal(pcan.into()).into()),
            };
        }
        Err(MoveError::Invalid(pcan.into()).into())
    }

    /// Undoes the latest move.
    pub fn take_back(&mut self) -> Result<Move, EngineError> {
        self.halt_if_active();
        self.board.pop().ok_or(EngineError::NoMoveToTakeBack)
    }

    /// Analyzes the current position on a background search, returning the
    /// stream of principal variations. The engine-level depth limit
    /// applies unless the options override it.
    pub fn analyze(&mut self, mut opt: Options) -> Result<PvReceiver, EngineError> {
        if opt.depth_limit.is_none() {
            opt.depth_limit = self.opts.depth;
        }

        info!("analyze {}, opt={opt}", self.board);

        if self.active.is_some() {
            return Err(EngineError::SearchAlreadyActive);
        }

        let (handle, out) = self.launcher.launch(
            self.board.fork(),
            Arc::clone(&self.tt),
            self.noise.clone(),
            opt,
        );
        self.active = Some(handle);
        Ok(out)
    }

    /// Halts the active search and returns its principal variation.
    pub fn halt(&mut self) -> Result<Pv, EngineError> {
        match self.active.take() {
            Some(handle) => Ok(handle.halt()),
            None => Err(EngineError::NoActiveSearch),
        }
    }

    fn halt_if_active(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.halt();
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
