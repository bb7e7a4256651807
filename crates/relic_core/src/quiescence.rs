//! Selective quiescence search and related leaf extensions.

use crate::board::{Board, Outcome, ResultReason};
use crate::eval::Evaluator;
use crate::exploration::Exploration;
use crate::movelist::MoveList;
use crate::score::Score;
use crate::search::{Leaf, QuietSearch, Search, SearchContext};
use crate::alphabeta::AlphaBeta;

/// A configurable alpha-beta quiet search: the exploration policy decides
/// which moves keep the search going past depth 0.
pub struct Quiescence<X, E> {
    pub explore: X,
    pub eval: E,
}

impl<X: Exploration, E: Evaluator> QuietSearch for Quiescence<X, E> {
    fn quiet_search(&self, sctx: &SearchContext, b: &mut Board) -> (u64, Score) {
        let mut run = Run {
            explore: &self.explore,
            eval: &self.eval,
            sctx,
            nodes: 0,
        };
        let (alpha, beta) = sctx.window();
        let score = run.search(b, alpha, beta);
        (run.nodes, score)
    }
}

struct Run<'a, X, E> {
    explore: &'a X,
    eval: &'a E,
    sctx: &'a SearchContext,
    nodes: u64,
}

impl<X: Exploration, E: Evaluator> Run<'_, X, E> {
    /// Returns the positive score for the side to move.
    fn search(&mut self, b: &mut Board, mut alpha: Score, beta: Score) -> Score {
        if self.sctx.stop.is_stopped() {
            return Score::ZERO;
        }
        if b.result().outcome == Outcome::Draw {
            return Score::ZERO;
        }

        self.nodes += 1;

        let stand_pat =
            Score::Heuristic(self.eval.evaluate(b) + self.sctx.noise.evaluate(b));
        alpha = alpha.max(stand_pat);

        // NOTE: no cutoff on the standing evaluation before at least one
        // legal move has been seen. A mate-in-X must not be reported from
        // a position that turns out to be terminal.

        let mut has_legal_move = false;
        let (priority, explore) = self.explore.exploration(b);

        let moves = MoveList::new(b.position().pseudo_legal_moves(b.turn()), priority);
        for m in moves {
            if b.push(m).is_err() {
                continue; // skip: not legal
            }

            if explore(b, m) {
                let score = self.search(b, beta.negate(), alpha.negate());
                alpha = alpha.max(score.increment_mate_distance().negate());
            }

            b.pop();
            has_legal_move = true;

            if !alpha.less(beta) {
                break; // cutoff
            }
        }

        if !has_legal_move {
            if b.adjudicate_no_legal_moves().reason == ResultReason::Checkmate {
                return Score::NegInf;
            }
            return Score::ZERO;
        }
        alpha
    }
}

/// A leaf extension that searches one ply of full-width alpha-beta when
/// the side to move is in check, so that material is never evaluated in a
/// stale, checked position.
pub struct OnePlyIfChecked<E> {
    pub leaf: Leaf<E>,
}

impl<E: Evaluator> QuietSearch for OnePlyIfChecked<E> {
    fn quiet_search(&self, sctx: &SearchContext, b: &mut Board) -> (u64, Score) {
        if !b.position().is_checked(b.turn()) {
            return (1, Score::Heuristic(self.leaf.evaluate(sctx, b)));
        }

        let extension = AlphaBeta::full_width(&self.leaf);
        match extension.search(sctx, b, 1) {
            Ok((nodes, score, _)) => (nodes, score),
            Err(_) => (0, Score::Invalid),
        }
    }
}

#[cfg(test)]
#[path = "quiescence_tests.rs"]
mod quiescence_tests;
