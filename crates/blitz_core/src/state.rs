//! Game state snapshots and the move transition.
//!
//! A [`GameState`] is never mutated once built; [`GameState::apply`] derives
//! the next snapshot from the previous one.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::{Board, SideSetup};
use crate::error::SetupError;
use crate::eval::{army_power, evaluate, PieceValues};
use crate::movegen::{legal_moves, Candidate};
use crate::notation::notation;
use crate::types::*;

/// Who won a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Side(Side),
    Draw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    GameOver(Winner),
}

/// One half-move in the battlefield log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    pub piece: PieceId,
    pub captured: Option<PieceId>,
    pub notation: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub turn: Side,
    pub history: Vec<MoveRecord>,
    pub phase: Phase,
    /// Material balance, positive favours White.
    pub evaluation: i32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

impl GameState {
    /// Standard deployment: French on ranks 1-2, British on ranks 7-8.
    pub fn initial() -> Self {
        let board = Board::from_setups(&[
            SideSetup::standard(Side::White),
            SideSetup::standard(Side::Black),
        ])
        .unwrap_or_default();
        Self::with_board(board, Side::White)
    }

    pub fn new(setups: &[SideSetup; 2]) -> Result<Self, SetupError> {
        Ok(Self::with_board(Board::from_setups(setups)?, Side::White))
    }

    /// A fresh, in-progress game on an arbitrary board.
    pub fn with_board(board: Board, turn: Side) -> Self {
        let evaluation = evaluate(&board);
        Self {
            board,
            turn,
            history: Vec::new(),
            phase: Phase::Playing,
            evaluation,
        }
    }

    /// Builds a position from a FEN-style placement field, e.g.
    /// `"4k3/8/8/8/8/8/8/R3K3"`. Pawns away from their home rank count as moved.
    pub fn from_placement(placement: &str, turn: Side) -> Result<Self, SetupError> {
        let ranks: Vec<&str> = placement.trim().split('/').collect();
        if ranks.len() != 8 {
            return Err(SetupError::RankCount { found: ranks.len() });
        }

        let mut board = Board::empty();
        for (idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - idx as i8;
            let mut file: usize = 0;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    file += d as usize;
                    continue;
                }
                let (kind, side) =
                    PieceKind::from_symbol(ch).ok_or(SetupError::UnknownSymbol { symbol: ch })?;
                let sq = Square::new(rank, file as i8).ok_or(SetupError::FileCount {
                    rank: rank as u8,
                    files: file + 1,
                })?;
                let id = board.place(kind, side, sq)?;
                let home = match side {
                    Side::White => 1,
                    Side::Black => 6,
                };
                if kind == PieceKind::Pawn && sq.rank() != home {
                    board.set_has_moved(id, true);
                }
                file += 1;
            }
            if file != 8 {
                return Err(SetupError::FileCount {
                    rank: rank as u8,
                    files: file,
                });
            }
        }
        Ok(Self::with_board(board, turn))
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    pub fn winner(&self) -> Option<Winner> {
        match self.phase {
            Phase::Playing => None,
            Phase::GameOver(w) => Some(w),
        }
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    /// Pseudo-legal moves for the side to move.
    pub fn legal_moves(&self) -> Vec<Candidate> {
        legal_moves(&self.board, self.turn)
    }

    pub fn army_power(&self, side: Side) -> i32 {
        army_power(&self.board, side, &PieceValues::CANONICAL)
    }

    /// Plays `from` → `to` for the side to move, stamped with the current time.
    pub fn apply(&self, from: Square, to: Square) -> Cow<'_, GameState> {
        self.apply_at(from, to, Utc::now())
    }

    /// Plays `from` → `to` with an explicit timestamp.
    ///
    /// Returns the unchanged state when the game is over, `from` does not hold
    /// a piece of the side to move, or the squares coincide. Whatever stands on
    /// `to` is removed, friend or foe. Capturing a king ends the game in the
    /// mover's favour.
    pub fn apply_at(&self, from: Square, to: Square, timestamp: DateTime<Utc>) -> Cow<'_, GameState> {
        if self.is_game_over() || from == to {
            return Cow::Borrowed(self);
        }
        let Some(mover) = self.board.piece_at(from).copied() else {
            return Cow::Borrowed(self);
        };
        if mover.side != self.turn {
            return Cow::Borrowed(self);
        }

        let mut board = self.board.clone();
        let captured = board.relocate(from, to);

        let mut history = Vec::with_capacity(self.history.len() + 1);
        history.extend_from_slice(&self.history);
        history.push(MoveRecord {
            from,
            to,
            piece: mover.id,
            captured: captured.map(|p| p.id),
            notation: notation(mover.kind, to, captured.is_some()),
            timestamp,
        });

        let phase = match captured {
            Some(victim) if victim.kind == PieceKind::King => {
                Phase::GameOver(Winner::Side(mover.side))
            }
            _ => Phase::Playing,
        };
        let evaluation = evaluate(&board);

        Cow::Owned(GameState {
            board,
            turn: self.turn.other(),
            history,
            phase,
            evaluation,
        })
    }

    /// Ends a game in progress as a draw. A finished game is returned as is.
    pub fn declare_draw(&self) -> Cow<'_, GameState> {
        if self.is_game_over() {
            return Cow::Borrowed(self);
        }
        let mut next = self.clone();
        next.phase = Phase::GameOver(Winner::Draw);
        Cow::Owned(next)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
