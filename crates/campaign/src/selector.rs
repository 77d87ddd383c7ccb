//! Move selection for the side to move.

use blitz_core::{Agent, GameState, Square};
use oracle_engine::{AdviceRequest, Advisor};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Strategy;

/// Where a selected move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    Remote,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub from: Square,
    pub to: Square,
    pub source: SelectionSource,
}

/// Chooses a move for `state.turn`.
///
/// For [`Strategy::Gemini`] the advisor is asked first, bounded by
/// `advice_timeout`; a suggestion with both endpoints on the board is taken
/// verbatim. Every other case plays the local agent. `None` means the side to
/// move has no legal move at all.
pub async fn select_move(
    state: &GameState,
    strategy: Strategy,
    advisor: &dyn Advisor,
    local: &mut dyn Agent,
    advice_timeout: Duration,
) -> Option<Selection> {
    if strategy.is_remote() {
        let request = AdviceRequest::from_state(state);
        match tokio::time::timeout(advice_timeout, advisor.recommend_move(&request)).await {
            Ok(Ok(s)) => {
                debug!(advisor = advisor.name(), "advice {} -> {}", s.from, s.to);
                return Some(Selection {
                    from: s.from,
                    to: s.to,
                    source: SelectionSource::Remote,
                });
            }
            Ok(Err(e)) => {
                warn!(advisor = advisor.name(), error = %e, "no usable advice, playing locally");
            }
            Err(_) => {
                warn!(
                    advisor = advisor.name(),
                    timeout_ms = advice_timeout.as_millis() as u64,
                    "advice timed out, playing locally"
                );
            }
        }
    }

    local.choose(state).map(|c| Selection {
        from: c.from,
        to: c.to,
        source: SelectionSource::Local,
    })
}
