//! Remote Advisor
//!
//! This crate talks to a hosted language model for two things:
//! 1. **Move advice**: given the whole position, suggest a `(from, to)` pair
//! 2. **Commentary**: one line of period colour about the latest move
//!
//! Neither call is trusted. A suggestion is only checked for shape (both
//! endpoints present and on the board); anything else is an [`AdvisorError`]
//! and the caller plays a local move instead. Commentary failures degrade to
//! canned lines.
//!
//! # Backends
//!
//! - [`GeminiAdvisor`]: Google Gemini `generateContent` over HTTPS
//! - [`OfflineAdvisor`]: always unavailable; games play purely locally

mod error;
mod gemini;
mod prompt;

use async_trait::async_trait;
use blitz_core::{GameState, PieceKind, Side, Square};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use error::AdvisorError;
pub use gemini::{GeminiAdvisor, GeminiConfig, API_KEY_VARS, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use prompt::{commentary_prompt, move_prompt, parse_suggestion, tidy_commentary};

/// Shown when the model answers with nothing.
pub const EMPTY_COMMENTARY: &str = "A bold maneuver upon the field of honor!";
/// Shown when the commentary call fails outright.
pub const FAILED_COMMENTARY: &str = "The lines hold steady, for now.";

/// One piece as described to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceSummary {
    #[serde(rename = "t")]
    pub kind: PieceKind,
    #[serde(rename = "s")]
    pub side: Side,
    #[serde(rename = "p")]
    pub position: Square,
}

/// Everything the model sees when asked for a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdviceRequest {
    pub turn: Side,
    pub pieces: Vec<PieceSummary>,
    pub history: Vec<String>,
}

impl AdviceRequest {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            turn: state.turn,
            pieces: state
                .board
                .pieces()
                .map(|p| PieceSummary {
                    kind: p.kind,
                    side: p.side,
                    position: p.position,
                })
                .collect(),
            history: state.history.iter().map(|m| m.notation.clone()).collect(),
        }
    }
}

/// A move recommendation, already known to be on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub from: Square,
    pub to: Square,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentaryRequest {
    pub notation: String,
    pub evaluation: i32,
}

/// A remote collaborator that can suggest moves and narrate the game.
///
/// Implementations must be cheap to share; the orchestrator holds them behind
/// an `Arc` and calls them from background tasks.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Ask for a move. No retries: one failure means "no recommendation".
    async fn recommend_move(&self, request: &AdviceRequest) -> Result<Suggestion, AdvisorError>;

    /// Ask for a line of commentary on the latest move.
    async fn commentary(&self, request: &CommentaryRequest) -> Result<String, AdvisorError>;

    /// Name used in logs
    fn name(&self) -> &str;
}

/// Commentary with the canned fallbacks applied. Never fails.
pub async fn commentary_or_fallback(advisor: &dyn Advisor, request: &CommentaryRequest) -> String {
    match advisor.commentary(request).await {
        Ok(text) => {
            let text = tidy_commentary(&text);
            if text.is_empty() {
                EMPTY_COMMENTARY.to_string()
            } else {
                text
            }
        }
        Err(e) => {
            warn!(advisor = advisor.name(), error = %e, "commentary unavailable");
            FAILED_COMMENTARY.to_string()
        }
    }
}

/// An advisor with no backend. Every call reports [`AdvisorError::Unavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAdvisor;

#[async_trait]
impl Advisor for OfflineAdvisor {
    async fn recommend_move(&self, _request: &AdviceRequest) -> Result<Suggestion, AdvisorError> {
        Err(AdvisorError::Unavailable)
    }

    async fn commentary(&self, _request: &CommentaryRequest) -> Result<String, AdvisorError> {
        Err(AdvisorError::Unavailable)
    }

    fn name(&self) -> &str {
        "offline"
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod lib_tests;
