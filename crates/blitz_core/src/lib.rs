pub mod board;
pub mod error;
pub mod eval;
pub mod movegen;
pub mod notation;
pub mod state;
pub mod types;

// Re-export core game logic (not agent-specific)
pub use board::*;
pub use error::*;
pub use eval::*;
pub use movegen::*;
pub use notation::notation;
pub use state::*;
pub use types::*;

// =============================================================================
// Agent trait: implemented by every local move-selection policy
// =============================================================================

/// A move picked by an agent for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub from: Square,
    pub to: Square,
}

impl From<Candidate> for Choice {
    fn from(c: Candidate) -> Self {
        Self {
            from: c.from,
            to: c.to,
        }
    }
}

/// Trait for synchronous move-selection policies.
///
/// Agents never block: remote advice is layered on top of an agent by the
/// orchestrator, so there is always a local answer available.
pub trait Agent: Send {
    /// Pick a move for `state.turn`, or `None` if that side has no legal move.
    fn choose(&mut self, state: &GameState) -> Option<Choice>;

    /// Name shown in logs and reports
    fn name(&self) -> &str;

    /// Reset internal state for a new game
    fn new_game(&mut self) {}
}
