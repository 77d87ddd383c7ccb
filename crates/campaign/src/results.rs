//! Series results storage and reporting

use blitz_core::{GameState, Side, Winner};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::config::Strategy;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of a single game from one participant's point of view
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

/// Win/loss/draw tally
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl Tally {
    pub fn record(&mut self, result: GameResult) {
        match result {
            GameResult::Win => self.wins += 1,
            GameResult::Loss => self.losses += 1,
            GameResult::Draw => self.draws += 1,
        }
    }

    pub fn total_games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// 1 for a win, 0.5 for a draw, 0 for a loss; 0.5 with no games
    pub fn score(&self) -> f64 {
        let total = self.total_games() as f64;
        if total == 0.0 {
            return 0.5;
        }
        (self.wins as f64 + 0.5 * self.draws as f64) / total
    }
}

/// One finished game of a series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntry {
    pub white: Strategy,
    pub black: Strategy,
    /// `None` if the game was cut short before it ended
    pub winner: Option<Winner>,
    pub half_moves: usize,
    pub final_evaluation: i32,
    pub moves: Vec<String>,
}

impl GameEntry {
    pub fn result_for(&self, side: Side) -> Option<GameResult> {
        Some(match self.winner? {
            Winner::Draw => GameResult::Draw,
            Winner::Side(s) if s == side => GameResult::Win,
            Winner::Side(_) => GameResult::Loss,
        })
    }
}

/// Complete series results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeriesResults {
    pub games: Vec<GameEntry>,
    /// Indexed by side: French first
    pub by_side: [Tally; 2],
    pub by_strategy: BTreeMap<String, Tally>,
}

impl SeriesResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finished game
    pub fn record(&mut self, white: Strategy, black: Strategy, end: &GameState) {
        let entry = GameEntry {
            white,
            black,
            winner: end.winner(),
            half_moves: end.history.len(),
            final_evaluation: end.evaluation,
            moves: end.history.iter().map(|m| m.notation.clone()).collect(),
        };

        for (side, strategy) in [(Side::White, white), (Side::Black, black)] {
            if let Some(result) = entry.result_for(side) {
                self.by_side[side.idx()].record(result);
                // Self-play of one strategy against itself counts once per side
                self.by_strategy
                    .entry(strategy.label().to_string())
                    .or_default()
                    .record(result);
            }
        }
        self.games.push(entry);
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Save results to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Generate a text report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== Campaign series: {} games ===\n\n", self.len()));

        report.push_str(&format!(
            "{:<4} {:<14} vs {:<14} {:<16} {:>6} {:>6}\n",
            "#", "French", "British", "Outcome", "Plies", "Eval"
        ));
        report.push_str(&"-".repeat(66));
        report.push('\n');
        for (i, game) in self.games.iter().enumerate() {
            let outcome = match game.winner {
                Some(Winner::Side(side)) => format!("{} win", side.army()),
                Some(Winner::Draw) => "truce".to_string(),
                None => "unfinished".to_string(),
            };
            report.push_str(&format!(
                "{:<4} {:<14} vs {:<14} {:<16} {:>6} {:>6}\n",
                i + 1,
                game.white.label(),
                game.black.label(),
                outcome,
                game.half_moves,
                game.final_evaluation
            ));
        }

        report.push_str("\nBy army:\n");
        for side in Side::ALL {
            let t = self.by_side[side.idx()];
            report.push_str(&format!(
                "  {:<14} {:>3}W {:>3}L {:>3}D\n",
                side.army(),
                t.wins,
                t.losses,
                t.draws
            ));
        }

        report.push_str("\nBy strategy:\n");
        for (name, t) in &self.by_strategy {
            report.push_str(&format!(
                "  {:<14} {:>3}W {:>3}L {:>3}D  score {:.2}\n",
                name,
                t.wins,
                t.losses,
                t.draws,
                t.score()
            ));
        }

        report
    }
}
