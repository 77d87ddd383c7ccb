use std::collections::BTreeMap;
use std::fmt;

use crate::error::SetupError;
use crate::types::*;

/// Back-rank order shared by both armies.
pub const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Where and how one army is deployed at the start of a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SideSetup {
    pub side: Side,
    pub back_rank: [PieceKind; 8],
    pub main_rank: u8,
    pub pawn_rank: u8,
}

impl SideSetup {
    pub fn standard(side: Side) -> Self {
        let (main_rank, pawn_rank) = match side {
            Side::White => (0, 1),
            Side::Black => (7, 6),
        };
        Self {
            side,
            back_rank: BACK_RANK,
            main_rank,
            pawn_rank,
        }
    }
}

/// Occupancy grid plus the piece records it points at.
///
/// Every id stored in `grid` has a record in `pieces` whose position is that
/// cell, and every record is referenced by exactly one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    grid: [[Option<PieceId>; 8]; 8],
    pieces: BTreeMap<PieceId, Piece>,
    next_id: u8,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub fn empty() -> Self {
        Self {
            grid: [[None; 8]; 8],
            pieces: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Deploys each army in order: back rank first, then pawns.
    pub fn from_setups(setups: &[SideSetup]) -> Result<Self, SetupError> {
        let mut board = Board::empty();
        for setup in setups {
            for rank in [setup.main_rank, setup.pawn_rank] {
                if rank > 7 {
                    return Err(SetupError::InvalidRank { rank });
                }
            }
            for (file, &kind) in setup.back_rank.iter().enumerate() {
                let sq = Square::new(setup.main_rank as i8, file as i8)
                    .ok_or(SetupError::InvalidRank { rank: setup.main_rank })?;
                board.place(kind, setup.side, sq)?;
            }
            for file in 0..8 {
                let sq = Square::new(setup.pawn_rank as i8, file)
                    .ok_or(SetupError::InvalidRank { rank: setup.pawn_rank })?;
                board.place(PieceKind::Pawn, setup.side, sq)?;
            }
        }
        Ok(board)
    }

    /// Puts a new, unmoved piece on an empty square and returns its id.
    pub fn place(&mut self, kind: PieceKind, side: Side, sq: Square) -> Result<PieceId, SetupError> {
        if self.id_at(sq).is_some() {
            return Err(SetupError::Collision { square: sq });
        }
        let id = PieceId(self.next_id);
        self.next_id = self.next_id.checked_add(1).ok_or(SetupError::TooManyPieces)?;
        self.grid[sq.rank() as usize][sq.file() as usize] = Some(id);
        self.pieces.insert(
            id,
            Piece {
                id,
                kind,
                side,
                position: sq,
                has_moved: false,
            },
        );
        Ok(id)
    }

    pub fn id_at(&self, sq: Square) -> Option<PieceId> {
        self.grid[sq.rank() as usize][sq.file() as usize]
    }

    pub fn piece_at(&self, sq: Square) -> Option<&Piece> {
        self.id_at(sq).and_then(|id| self.pieces.get(&id))
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    /// All live pieces in id order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = &Piece> {
        self.pieces.values().filter(move |p| p.side == side)
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub(crate) fn set_has_moved(&mut self, id: PieceId, has_moved: bool) {
        if let Some(p) = self.pieces.get_mut(&id) {
            p.has_moved = has_moved;
        }
    }

    /// Moves the piece on `from` to `to`, removing whatever stood on `to`.
    /// Returns the removed piece.
    pub(crate) fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        let id = self.id_at(from)?;
        let captured = self
            .id_at(to)
            .and_then(|victim| self.pieces.remove(&victim));

        self.grid[from.rank() as usize][from.file() as usize] = None;
        self.grid[to.rank() as usize][to.file() as usize] = Some(id);
        if let Some(p) = self.pieces.get_mut(&id) {
            p.position = to;
            p.has_moved = true;
        }
        captured
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let c = Square::new(rank, file)
                    .and_then(|sq| self.piece_at(sq))
                    .map(|p| p.kind.symbol(p.side))
                    .unwrap_or('.');
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
