//! Time control: the soft and hard budget for one move.

use std::fmt;
use std::time::Duration;

use crate::types::Color;

/// Remaining clock time for both sides and, optionally, the number of
/// moves to the next time control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeControl {
    pub white: Duration,
    pub black: Duration,
    /// Moves to go; 0 means the rest of the game.
    pub moves: u32,
}

impl TimeControl {
    /// The soft and hard limits for the side to move. After the soft limit
    /// no new iteration should start; at the hard limit the search is
    /// halted.
    ///
    /// With remaining time T, assume M = 40 moves to end the game if
    /// nothing else is known, giving soft = T/(2·M) and hard = 3·soft.
    pub fn limits(&self, c: Color) -> (Duration, Duration) {
        let remaining = match c {
            Color::White => self.white,
            Color::Black => self.black,
        };

        let moves = if self.moves > 0 { self.moves + 1 } else { 40 };
        let soft = remaining / (2 * moves);
        let hard = 3 * soft;
        (soft, hard)
    }
}

impl fmt::Display for TimeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.moves == 0 {
            write!(
                f,
                "{:.1}<>{:.1}",
                self.white.as_secs_f64(),
                self.black.as_secs_f64()
            )
        } else {
            write!(
                f,
                "{:.1}<>{:.1}[moves={}]",
                self.white.as_secs_f64(),
                self.black.as_secs_f64(),
                self.moves
            )
        }
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
