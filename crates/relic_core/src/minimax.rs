//! Naive minimax search. Useful for cross-validation of the pruning
//! drivers: same scores, strictly more nodes.
//!
//! ```text
//! function minimax(node, depth) is
//!     if depth = 0 or node is terminal then
//!         return the heuristic value of node
//!     value := −∞
//!     for each child of node do
//!         value := max(value, −minimax(child, depth − 1))
//!     return value
//! ```
//!
//! See: <https://en.wikipedia.org/wiki/Minimax>

use crate::board::{Board, Outcome, ResultReason};
use crate::eval::Evaluator;
use crate::score::Score;
use crate::search::{Search, SearchContext, SearchError, StopSignal};
use crate::types::Move;

pub struct Minimax<E> {
    pub eval: E,
}

impl<E: Evaluator> Search for Minimax<E> {
    fn search(
        &self,
        sctx: &SearchContext,
        b: &mut Board,
        depth: u32,
    ) -> Result<(u64, Score, Vec<Move>), SearchError> {
        let mut run = Run {
            eval: &self.eval,
            stop: sctx.stop.clone(),
            nodes: 0,
        };
        let (score, moves) = run.search(b, depth);
        if run.stop.is_stopped() {
            return Err(SearchError::Halted);
        }
        Ok((run.nodes, score, moves))
    }
}

struct Run<'a, E> {
    eval: &'a E,
    stop: StopSignal,
    nodes: u64,
}

impl<E: Evaluator> Run<'_, E> {
    /// Returns the positive score for the side to move.
    fn search(&mut self, b: &mut Board, depth: u32) -> (Score, Vec<Move>) {
        self.nodes += 1;

        if self.stop.is_stopped() {
            return (Score::ZERO, Vec::new());
        }
        if b.result().outcome == Outcome::Draw {
            return (Score::ZERO, Vec::new());
        }
        if depth == 0 {
            return (Score::Heuristic(self.eval.evaluate(b)), Vec::new());
        }

        let mut has_legal_move = false;
        let mut score = Score::NegInf;
        let mut pv: Vec<Move> = Vec::new();

        for m in b.position().pseudo_legal_moves(b.turn()) {
            if b.push(m).is_err() {
                continue;
            }
            let (s, rem) = self.search(b, depth - 1);
            b.pop();

            has_legal_move = true;
            let s = s.increment_mate_distance().negate();
            if score.less(s) {
                score = s;
                pv = std::iter::once(m).chain(rem).collect();
            }
        }

        if !has_legal_move {
            if b.adjudicate_no_legal_moves().reason == ResultReason::Checkmate {
                return (Score::NegInf, Vec::new());
            }
            return (Score::ZERO, Vec::new());
        }

        (score, pv)
    }
}
