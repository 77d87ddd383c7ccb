//! Material evaluation.

use crate::board::Board;
use crate::types::{PieceKind, Side};

/// Factor between the canonical table and the "army power" display table.
pub const DISPLAY_SCALE: i32 = 10;

/// Per-kind material values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceValues {
    values: [i32; 6],
}

impl PieceValues {
    /// Pawn 1, knight 3, bishop 3, rook 5, queen 9, king 100.
    pub const CANONICAL: PieceValues = PieceValues {
        values: [1, 3, 3, 5, 9, 100],
    };

    pub const fn new(values: [i32; 6]) -> Self {
        Self { values }
    }

    pub fn value(&self, kind: PieceKind) -> i32 {
        self.values[kind.idx()]
    }

    pub fn scaled(&self, factor: i32) -> Self {
        let mut values = self.values;
        for v in values.iter_mut() {
            *v *= factor;
        }
        Self { values }
    }

    /// Canonical values times [`DISPLAY_SCALE`], used for army power.
    pub fn display() -> Self {
        Self::CANONICAL.scaled(DISPLAY_SCALE)
    }
}

impl Default for PieceValues {
    fn default() -> Self {
        Self::CANONICAL
    }
}

/// Material balance from White's point of view.
pub fn evaluate(board: &Board) -> i32 {
    evaluate_with(board, &PieceValues::CANONICAL)
}

pub fn evaluate_with(board: &Board, values: &PieceValues) -> i32 {
    board
        .pieces()
        .map(|p| p.side.sign() * values.value(p.kind))
        .sum()
}

/// Total material still fielded by one side.
pub fn army_power(board: &Board, side: Side, values: &PieceValues) -> i32 {
    board.pieces_of(side).map(|p| values.value(p.kind)).sum()
}
