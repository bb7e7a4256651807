//! Principal variation search.
//!
//! The first child of each node is searched with the full window; later
//! children get a null window just below −α and are re-searched with the
//! full window when they fail high.
//!
//! ```text
//! function pvs(node, depth, α, β) is
//!     if depth = 0 or node is terminal then
//!         return the heuristic value of node
//!     for each child of node do
//!         if child is first child then
//!             score := −pvs(child, depth − 1, −β, −α)
//!         else
//!             score := −pvs(child, depth − 1, −α − 1, −α)
//!             if α < score then
//!                 score := −pvs(child, depth − 1, −β, −α)
//!         α := max(α, score)
//!         if α ≥ β then
//!             break (* beta cut-off *)
//!     return α
//! ```
//!
//! See: <https://en.wikipedia.org/wiki/Principal_variation_search>

use std::sync::Arc;

use crate::board::{Board, Outcome, ResultReason};
use crate::eval::Noise;
use crate::exploration::{Exploration, Full};
use crate::movelist::{MoveList, first};
use crate::score::Score;
use crate::search::{QuietSearch, Search, SearchContext, SearchError, StopSignal};
use crate::transposition::{Bound, TranspositionTable};
use crate::types::Move;

/// Principal variation search over the exploration policy, with the given
/// quiescence or leaf evaluation at depth 0.
pub struct Pvs<X, Q> {
    pub explore: X,
    pub eval: Q,
}

impl<Q: QuietSearch> Pvs<Full, Q> {
    /// Full-width search: every move is explored.
    pub fn full_width(eval: Q) -> Pvs<Full, Q> {
        Pvs {
            explore: Full,
            eval,
        }
    }
}

impl<X: Exploration, Q: QuietSearch> Search for Pvs<X, Q> {
    fn search(
        &self,
        sctx: &SearchContext,
        b: &mut Board,
        depth: u32,
    ) -> Result<(u64, Score, Vec<Move>), SearchError> {
        let mut run = Run {
            explore: &self.explore,
            eval: &self.eval,
            tt: Arc::clone(&sctx.tt),
            noise: sctx.noise.clone(),
            stop: sctx.stop.clone(),
            ponder: sctx.ponder.clone(),
            nodes: 0,
        };

        let (alpha, beta) = sctx.window();
        let (score, moves) = run.search(b, depth, alpha, beta);
        if run.stop.is_stopped() {
            return Err(SearchError::Halted);
        }
        Ok((run.nodes, score, moves))
    }
}

struct Run<'a, X, Q> {
    explore: &'a X,
    eval: &'a Q,
    tt: Arc<dyn TranspositionTable>,
    noise: Noise,
    stop: StopSignal,
    ponder: Vec<Move>,
    nodes: u64,
}

impl<X: Exploration, Q: QuietSearch> Run<'_, X, Q> {
    /// Returns the positive score for the side to move.
    fn search(&mut self, b: &mut Board, depth: u32, mut alpha: Score, beta: Score) -> (Score, Vec<Move>) {
        if self.stop.is_stopped() {
            return (Score::Invalid, Vec::new());
        }
        if b.result().outcome == Outcome::Draw {
            return (Score::ZERO, Vec::new());
        }

        let mut best = Move::null();
        if let Some((bound, d, score, m)) = self.tt.read(b.hash()) {
            best = m;
            if depth == d && bound == Bound::Exact {
                return (score, Vec::new()); // cutoff
            }
        }

        if depth == 0 {
            let leaf_ctx = SearchContext {
                alpha,
                beta,
                tt: Arc::clone(&self.tt),
                noise: self.noise.clone(),
                ponder: Vec::new(),
                stop: self.stop.clone(),
            };
            let (nodes, score) = self.eval.quiet_search(&leaf_ctx, b);
            self.nodes += nodes;

            if self.stop.is_stopped() {
                return (Score::Invalid, Vec::new());
            }
            self.tt
                .write(b.hash(), Bound::Exact, b.ply(), 0, score, Move::null());
            return (score, Vec::new());
        }

        self.nodes += 1;

        let mut has_legal_move = false;
        let mut searched_first = false;
        let mut bound = Bound::Exact;
        let mut pv: Vec<Move> = Vec::new();

        let (priority, explore) = self.explore.exploration(b);

        let forced = if self.ponder.is_empty() {
            None
        } else {
            Some(self.ponder.remove(0))
        };

        let moves = MoveList::new(b.position().pseudo_legal_moves(b.turn()), first(best, priority));
        for m in moves {
            if b.push(m).is_err() {
                continue; // skip: not legal
            }

            let explored = match forced {
                Some(f) => f.matches(m),
                None => explore(b, m),
            };
            if explored {
                // The first explored child gets the full window; later
                // children a null window just below −α, re-searched with
                // the full window on a fail-high.
                let (mut raw, mut rem) = if !searched_first {
                    self.search(b, depth - 1, beta.negate(), alpha.negate())
                } else {
                    self.search(b, depth - 1, alpha.negate().step_down(), alpha.negate())
                };
                if searched_first && alpha.less(raw.increment_mate_distance().negate()) {
                    (raw, rem) = self.search(b, depth - 1, beta.negate(), alpha.negate());
                }
                searched_first = true;

                let score = raw.increment_mate_distance().negate();
                if alpha.less(score) {
                    alpha = score;
                    pv = std::iter::once(m).chain(rem).collect();
                }
            }

            b.pop();
            has_legal_move = true;

            if !alpha.less(beta) {
                bound = Bound::Lower;
                break; // cutoff
            }
        }

        if self.stop.is_stopped() {
            return (Score::Invalid, Vec::new());
        }

        if !has_legal_move {
            if b.adjudicate_no_legal_moves().reason == ResultReason::Checkmate {
                return (Score::NegInf, Vec::new());
            }
            return (Score::ZERO, Vec::new());
        }

        if bound == Bound::Exact {
            self.tt.write(
                b.hash(),
                bound,
                b.ply(),
                depth,
                alpha,
                pv.first().copied().unwrap_or(Move::null()),
            );
        }
        (alpha, pv)
    }
}

#[cfg(test)]
#[path = "pvs_tests.rs"]
mod pvs_tests;
