//! Move exploration policies.
//!
//! An exploration decides, per node, how moves are ordered and which of
//! them are searched deeper. Limited exploration is what makes quiescence
//! selective; full search normally explores everything but may use the
//! same seam for forward pruning.

use std::collections::HashMap;

use crate::board::Board;
use crate::eval::nominal_value;
use crate::movelist::{Priority, mvv_lva};
use crate::types::Move;

/// Move order priority for a node.
pub type MovePriorityFn = Box<dyn Fn(Move) -> Priority + Send>;

/// Whether the move just made should be searched deeper. Consulted with
/// the board in the post-move state.
pub type MovePredicateFn = Box<dyn Fn(&Board, Move) -> bool + Send>;

/// A per-node move selection and ordering policy.
pub trait Exploration: Send + Sync {
    /// The priority and exploration predicate for the given node. The
    /// board is in the pre-move state here; the predicate later sees it in
    /// the post-move state.
    fn exploration(&self, b: &Board) -> (MovePriorityFn, MovePredicateFn);
}

/// Explore every move in MVV/LVA order. The default for full-width search.
pub struct Full;

impl Exploration for Full {
    fn exploration(&self, _b: &Board) -> (MovePriorityFn, MovePredicateFn) {
        (Box::new(mvv_lva), Box::new(|_, _| true))
    }
}

/// Explore nothing. Disables quiescence.
pub struct NoMoves;

impl Exploration for NoMoves {
    fn exploration(&self, _b: &Board) -> (MovePriorityFn, MovePredicateFn) {
        (Box::new(mvv_lva), Box::new(|_, _| false))
    }
}

/// Explore immediate material gains: promotions, and captures that win
/// value or land on an undefended square.
pub struct QuickGain;

impl Exploration for QuickGain {
    fn exploration(&self, _b: &Board) -> (MovePriorityFn, MovePredicateFn) {
        let predicate = |b: &Board, m: Move| {
            let mut explore = m.is_promotion();
            if m.is_capture() {
                if nominal_value(m.piece) < nominal_value(m.capture) {
                    explore = true;
                }
                // After the move, the opponent of the side to move is the
                // mover; the destination is undefended if the victim's
                // side does not attack it.
                if !b.position().is_attacked(b.turn().opponent(), m.to) {
                    explore = true;
                }
            }
            explore
        };
        (Box::new(mvv_lva), Box::new(predicate))
    }
}

/// The selective "considerable moves" rule set:
/// (1) re-captures on the square of the last move,
/// (2) captures of undefended pieces,
/// (3) captures of higher-value pieces,
/// (4) checkmate-delivering moves.
pub struct Considerable;

impl Exploration for Considerable {
    fn exploration(&self, b: &Board) -> (MovePriorityFn, MovePredicateFn) {
        let turn = b.turn();
        let recapture = b.last_move().filter(|m| m.is_capture()).map(|m| m.to);

        let predicate = move |b: &Board, m: Move| {
            if b.position().is_checkmate(turn.opponent()) {
                return true;
            }
            if m.is_capture() {
                if recapture == Some(m.to) {
                    return true;
                }
                if nominal_value(m.piece) < nominal_value(m.capture) {
                    return true;
                }
                if !b.position().is_attacked(turn, m.to) {
                    return true;
                }
            }
            false
        };
        (Box::new(mvv_lva), Box::new(predicate))
    }
}

/// A move order and pick-list over the given moves: earlier entries rank
/// higher, moves not on the list are not explored.
pub fn selection(list: &[Move]) -> (MovePriorityFn, MovePredicateFn) {
    let mut rank: HashMap<Move, Priority> = HashMap::with_capacity(list.len());
    for (i, &m) in list.iter().enumerate() {
        rank.entry(m).or_insert((list.len() - i) as Priority);
    }

    let picks = rank.clone();
    (
        Box::new(move |m| rank.get(&m).copied().unwrap_or(0)),
        Box::new(move |_, m| picks.contains_key(&m)),
    )
}

/// A plausible-move policy: a domain rule set nominates at most K moves
/// per position, and only those are explored, in nomination order.
pub struct Plausible<F> {
    pub moves: F,
}

impl<F> Exploration for Plausible<F>
where
    F: Fn(&Board) -> Vec<Move> + Send + Sync,
{
    fn exploration(&self, b: &Board) -> (MovePriorityFn, MovePredicateFn) {
        selection(&(self.moves)(b))
    }
}

#[cfg(test)]
#[path = "exploration_tests.rs"]
mod exploration_tests;
