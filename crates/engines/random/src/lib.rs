//! Capture-Biased Random Engine
//!
//! The local move policy every strategy falls back to:
//! - enumerate every pseudo-legal move for the side to move
//! - if captures exist, take one of them with probability `capture_bias`
//! - otherwise pick uniformly among all moves
//!
//! It never blocks and always answers, so a game can progress even when the
//! remote advisor is slow or unreachable.

use blitz_core::{Agent, Candidate, Choice, GameState};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::trace;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod lib_tests;

/// Probability of preferring a capture when one is available.
pub const DEFAULT_CAPTURE_BIAS: f64 = 0.6;

/// Picks a move from `moves`: a uniform capture with probability `capture_bias`
/// when any exist, else a uniform move. `None` only for an empty list.
pub fn pick_capture_biased<R: Rng + ?Sized>(
    moves: &[Candidate],
    capture_bias: f64,
    rng: &mut R,
) -> Option<Candidate> {
    let captures: Vec<Candidate> = moves.iter().copied().filter(Candidate::is_capture).collect();

    if !captures.is_empty() && rng.gen_bool(capture_bias.clamp(0.0, 1.0)) {
        return captures.choose(rng).copied();
    }
    moves.choose(rng).copied()
}

/// A chess agent that plays random moves, leaning towards captures.
#[derive(Debug, Clone)]
pub struct RandomEngine {
    rng: StdRng,
    capture_bias: f64,
    name: String,
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomEngine {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            capture_bias: DEFAULT_CAPTURE_BIAS,
            name: "Random".to_string(),
        }
    }

    /// Reproducible engine: the same seed and positions replay the same choices.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new()
        }
    }

    pub fn with_capture_bias(mut self, capture_bias: f64) -> Self {
        self.capture_bias = capture_bias.clamp(0.0, 1.0);
        self
    }

    /// Label used in logs, e.g. "Minimax" for a strategy that maps onto this policy.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn capture_bias(&self) -> f64 {
        self.capture_bias
    }
}

impl Agent for RandomEngine {
    fn choose(&mut self, state: &GameState) -> Option<Choice> {
        let moves = state.legal_moves();
        let picked = pick_capture_biased(&moves, self.capture_bias, &mut self.rng)?;
        trace!(
            engine = %self.name,
            candidates = moves.len(),
            capture = picked.is_capture(),
            "picked {} -> {}",
            picked.from,
            picked.to
        );
        Some(picked.into())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
