//! Score algebra for search: heuristic pawn values, mate distances and the
//! infinities, under a single total order.

use std::fmt;

/// A position or move valuation in pawns. Positive favors the side to move.
pub type Pawns = f32;

/// A tagged search score.
///
/// The total order is
/// `NegInf < MateIn(-1) < MateIn(-2) < .. < Heuristic(x) < .. < MateIn(2) <
/// MateIn(1) < Inf`: mates order by closeness to checkmate within their
/// sign group, so being mated later is preferred and delivering mate sooner
/// is preferred.
///
/// `Invalid` is a sentinel for "no value", returned by cancelled searches
/// and empty table probes. It never participates in the ordering relation;
/// for robustness it compares below everything.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Score {
    #[default]
    Invalid,
    NegInf,
    /// Plies to forced mate: positive when delivering mate, negative when
    /// being mated. Zero is forbidden.
    MateIn(i8),
    Heuristic(Pawns),
    Inf,
}

impl Score {
    pub const ZERO: Score = Score::Heuristic(0.0);

    pub fn heuristic(pawns: Pawns) -> Score {
        Score::Heuristic(pawns)
    }

    pub fn mate_in(plies: i8) -> Score {
        debug_assert!(plies != 0, "MateIn(0) is forbidden");
        Score::MateIn(plies)
    }

    #[inline(always)]
    pub fn is_invalid(self) -> bool {
        matches!(self, Score::Invalid)
    }

    /// The strict total order over valid scores.
    pub fn less(self, o: Score) -> bool {
        let (a, b) = (self.group(), o.group());
        if a != b {
            return a < b;
        }
        match (self, o) {
            // Within a sign group, more plies means further from mate:
            // worse when winning, better when losing. Either way the
            // larger ply count sorts lower.
            (Score::MateIn(x), Score::MateIn(y)) => x > y,
            (Score::Heuristic(x), Score::Heuristic(y)) => x < y,
            _ => false,
        }
    }

    pub fn max(self, o: Score) -> Score {
        if self.less(o) { o } else { self }
    }

    pub fn min(self, o: Score) -> Score {
        if o.less(self) { o } else { self }
    }

    /// Flips the score to the opponent's point of view.
    pub fn negate(self) -> Score {
        match self {
            Score::Invalid => Score::Invalid,
            Score::NegInf => Score::Inf,
            Score::Inf => Score::NegInf,
            Score::MateIn(k) => Score::MateIn(-k),
            Score::Heuristic(x) => Score::Heuristic(-x),
        }
    }

    /// Adds one ply of mate distance: the infinities become mate-in-one and
    /// mate scores move one ply further from zero, saturating at the i8
    /// bounds. Heuristic scores are unchanged.
    pub fn increment_mate_distance(self) -> Score {
        match self {
            Score::Inf => Score::MateIn(1),
            Score::NegInf => Score::MateIn(-1),
            Score::MateIn(k) if k > 0 => Score::MateIn(k.saturating_add(1)),
            Score::MateIn(k) => Score::MateIn(k.saturating_sub(1).max(-i8::MAX)),
            other => other,
        }
    }

    /// Plies to forced mate, regardless of which side mates.
    pub fn mate_distance(self) -> Option<i8> {
        match self {
            Score::MateIn(k) => Some(k.abs()),
            _ => None,
        }
    }

    /// The order-predecessor: the largest representable score strictly
    /// below this one. Heuristic scores step down one centipawn. Used for
    /// null-window searches.
    pub fn step_down(self) -> Score {
        match self {
            Score::Inf => Score::MateIn(1),
            Score::MateIn(k) if k > 0 => Score::MateIn(k.saturating_add(1)),
            Score::MateIn(-1) => Score::NegInf,
            Score::MateIn(k) => Score::MateIn(k + 1),
            Score::Heuristic(x) => Score::Heuristic(x - 0.01),
            Score::NegInf => Score::NegInf,
            Score::Invalid => Score::Invalid,
        }
    }

    fn group(self) -> i8 {
        match self {
            Score::Invalid => -1,
            Score::NegInf => 0,
            Score::MateIn(k) if k < 0 => 1,
            Score::Heuristic(_) => 2,
            Score::MateIn(_) => 3,
            Score::Inf => 4,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Invalid => write!(f, "invalid"),
            Score::NegInf => write!(f, "-inf"),
            Score::Inf => write!(f, "inf"),
            Score::MateIn(k) => write!(f, "#{k}"),
            Score::Heuristic(x) => write!(f, "{x:.2}"),
        }
    }
}

#[cfg(test)]
#[path = "score_tests.rs"]
mod score_tests;
