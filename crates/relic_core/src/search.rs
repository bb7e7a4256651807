//! Search driver traits and the state shared across one search.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;

use crate::board::Board;
use crate::eval::{Evaluator, Noise};
use crate::score::{Pawns, Score};
use crate::transposition::{NoTable, TranspositionTable};
use crate::types::{Move, print_moves};

/// A failed search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The search was cancelled mid-iteration; callers should fall back to
    /// the last published principal variation.
    #[error("search halted")]
    Halted,
}

/// An asynchronous cancellation signal, observed by polling. Each
/// recursive search entry polls it; the deepest in-flight call returns the
/// `Invalid` score sentinel, which unwinds to a [`SearchError::Halted`] at
/// the top.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> StopSignal {
        StopSignal::default()
    }

    /// Signals cancellation. Idempotent.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[inline(always)]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The principal variation for some search depth.
#[derive(Clone, Debug, Default)]
pub struct Pv {
    /// Depth of the search.
    pub depth: u32,
    /// The expected line of play.
    pub moves: Vec<Move>,
    /// Evaluation at depth.
    pub score: Score,
    /// Interior and leaf nodes searched.
    pub nodes: u64,
    /// Time taken by the search.
    pub elapsed: Duration,
    /// Transposition table utilization in `[0, 1]`.
    pub hash_used: f64,
}

impl fmt::Display for Pv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "depth={} score={} nodes={} time={:?} hash={}% pv={}",
            self.depth,
            self.score,
            self.nodes,
            self.elapsed,
            (100.0 * self.hash_used) as u32,
            print_moves(&self.moves)
        )
    }
}

/// State shared by the drivers of one search: the aspiration window, the
/// transposition table, evaluation noise, an optional line to force from
/// the root, and the cancellation signal.
#[derive(Clone)]
pub struct SearchContext {
    /// Lower window bound; `Invalid` means negative infinity.
    pub alpha: Score,
    /// Upper window bound; `Invalid` means positive infinity.
    pub beta: Score,
    pub tt: Arc<dyn TranspositionTable>,
    pub noise: Noise,
    /// Moves forced from the root, one per ply, regardless of exploration.
    pub ponder: Vec<Move>,
    pub stop: StopSignal,
}

impl SearchContext {
    pub fn new(tt: Arc<dyn TranspositionTable>, noise: Noise) -> SearchContext {
        SearchContext {
            alpha: Score::Invalid,
            beta: Score::Invalid,
            tt,
            noise,
            ponder: Vec::new(),
            stop: StopSignal::new(),
        }
    }

    /// A context with no table and no noise.
    pub fn empty() -> SearchContext {
        SearchContext::new(Arc::new(NoTable), Noise::none())
    }

    /// The concrete search window, with the infinities substituted for
    /// unset bounds.
    pub fn window(&self) -> (Score, Score) {
        let alpha = if self.alpha.is_invalid() {
            Score::NegInf
        } else {
            self.alpha
        };
        let beta = if self.beta.is_invalid() {
            Score::Inf
        } else {
            self.beta
        };
        (alpha, beta)
    }
}

/// Search of the game tree to a given depth. Implementations must be
/// usable from the harness worker thread.
pub trait Search: Send + Sync {
    /// Searches the board to the given depth, returning the nodes visited,
    /// the score and the principal variation.
    fn search(
        &self,
        sctx: &SearchContext,
        b: &mut Board,
        depth: u32,
    ) -> Result<(u64, Score, Vec<Move>), SearchError>;
}

impl<T: Search + ?Sized> Search for &T {
    fn search(
        &self,
        sctx: &SearchContext,
        b: &mut Board,
        depth: u32,
    ) -> Result<(u64, Score, Vec<Move>), SearchError> {
        (**self).search(sctx, b, depth)
    }
}

impl<T: Search + ?Sized> Search for Arc<T> {
    fn search(
        &self,
        sctx: &SearchContext,
        b: &mut Board,
        depth: u32,
    ) -> Result<(u64, Score, Vec<Move>), SearchError> {
        (**self).search(sctx, b, depth)
    }
}

/// The depth-0 delegate of the full-width drivers: a quiescence search or
/// plain leaf evaluation.
pub trait QuietSearch: Send + Sync {
    /// Evaluates the board within the context window, returning the nodes
    /// visited and the score.
    fn quiet_search(&self, sctx: &SearchContext, b: &mut Board) -> (u64, Score);
}

impl<T: QuietSearch + ?Sized> QuietSearch for &T {
    fn quiet_search(&self, sctx: &SearchContext, b: &mut Board) -> (u64, Score) {
        (**self).quiet_search(sctx, b)
    }
}

impl<T: QuietSearch + ?Sized> QuietSearch for Arc<T> {
    fn quiet_search(&self, sctx: &SearchContext, b: &mut Board) -> (u64, Score) {
        (**self).quiet_search(sctx, b)
    }
}

/// A plain leaf: one node, the static evaluation plus noise.
pub struct Leaf<E> {
    pub eval: E,
}

impl<E: Evaluator> Leaf<E> {
    pub fn evaluate(&self, sctx: &SearchContext, b: &Board) -> Pawns {
        self.eval.evaluate(b) + sctx.noise.evaluate(b)
    }
}

impl<E: Evaluator> QuietSearch for Leaf<E> {
    fn quiet_search(&self, sctx: &SearchContext, b: &mut Board) -> (u64, Score) {
        (1, Score::Heuristic(self.evaluate(sctx, b)))
    }
}

/// A root wrapper that invokes a stateful reset hook with the root board
/// before delegating. Used by evaluators that cache ply-0 state, such as a
/// material ceiling relative to the root position.
pub struct Hooked<S> {
    pub search: S,
    pub hook: Arc<dyn Fn(&Board) + Send + Sync>,
}

impl<S: Search> Search for Hooked<S> {
    fn search(
        &self,
        sctx: &SearchContext,
        b: &mut Board,
        depth: u32,
    ) -> Result<(u64, Score, Vec<Move>), SearchError> {
        (self.hook)(b);
        self.search.search(sctx, b, depth)
    }
}
