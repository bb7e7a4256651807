//! Classical reference engine.
//!
//! Composes the core the way the historical engines do: a full-width
//! alpha-beta root over a quick-gain quiescence, evaluated on nominal
//! material. This is the baseline composition for cross-checking engines
//! with richer evaluators.

mod eval;

use relic_core::{
    AlphaBeta, Engine, EngineOptions, Full, QuickGain, Quiescence,
};

pub use eval::{GradedMaterial, piece_value};

pub const NAME: &str = "classical";
pub const AUTHOR: &str = "relic contributors";

/// The root search: alpha-beta over quick-gain quiescence.
pub fn search() -> AlphaBeta<Full, Quiescence<QuickGain, GradedMaterial>> {
    AlphaBeta::full_width(Quiescence {
        explore: QuickGain,
        eval: GradedMaterial,
    })
}

/// A ready-to-drive engine with the given options.
pub fn engine(opts: EngineOptions) -> Engine {
    Engine::new(NAME, AUTHOR, search(), opts)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod lib_tests;
