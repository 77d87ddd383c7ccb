//! Text HUD for published snapshots.

use blitz_core::{army_power, GameState, Phase, PieceValues, Side, Winner};
use std::fmt::Write;

use crate::config::Strategy;

/// Number of log entries shown under the board.
pub const LOG_TAIL: usize = 8;

pub const FRENCH_VICTORY: &str = "Napoleon has shattered the coalition lines!";
pub const BRITISH_VICTORY: &str = "The British defensive lines held firm!";
pub const TRUCE: &str = "Neither side could find a decisive advantage on the field.";

/// Headline and epilogue for a finished game.
pub fn end_of_game(winner: Winner) -> (&'static str, &'static str) {
    match winner {
        Winner::Side(Side::White) => ("Victory!", FRENCH_VICTORY),
        Winner::Side(Side::Black) => ("Victory!", BRITISH_VICTORY),
        Winner::Draw => ("Truce Declared", TRUCE),
    }
}

/// Army that played ply `index` of `state.history`.
///
/// Every applied move flips the turn, so plies alternate backwards from the
/// side that moved last.
fn mover_of(state: &GameState, index: usize) -> Side {
    let last = state.turn.other();
    if (state.history.len() - 1 - index) % 2 == 0 {
        last
    } else {
        state.turn
    }
}

/// Renders one snapshot: header, board diagram, army power and the tail of
/// the battlefield log, newest first.
pub fn render_hud(state: &GameState, strategies: [Strategy; 2], commentary: &str) -> String {
    let mut out = String::new();

    let status = match state.phase {
        Phase::Playing => format!("{} to move", state.turn.army()),
        Phase::GameOver(Winner::Side(side)) => format!("{} victory", side.army()),
        Phase::GameOver(Winner::Draw) => "truce".to_string(),
    };
    let _ = writeln!(
        out,
        "French ({}) vs British ({})  |  ply {}  |  {}",
        strategies[0],
        strategies[1],
        state.history.len(),
        status
    );
    let _ = writeln!(out);
    let _ = write!(out, "{}", state.board);
    let _ = writeln!(out);

    let display = PieceValues::display();
    let _ = writeln!(
        out,
        "Eval {:+}   French power {}   British power {}",
        state.evaluation,
        army_power(&state.board, Side::White, &display),
        army_power(&state.board, Side::Black, &display)
    );
    let _ = writeln!(out, "\"{commentary}\"");

    if let Some(winner) = state.winner() {
        let (headline, epilogue) = end_of_game(winner);
        let _ = writeln!(out);
        let _ = writeln!(out, "*** {headline} ***");
        let _ = writeln!(out, "{epilogue}");
        let _ = writeln!(out, "(r: new campaign, q: quit)");
    }

    if !state.history.is_empty() {
        let _ = writeln!(out);
        for (i, record) in state.history.iter().enumerate().rev().take(LOG_TAIL) {
            let _ = writeln!(
                out,
                "{:>4}. {:<8} {:<7} {}",
                i + 1,
                mover_of(state, i).army(),
                record.notation,
                record.timestamp.format("%H:%M:%S")
            );
        }
    }

    out
}
