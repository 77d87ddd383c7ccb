//! Error types for board construction.
//!
//! Move application never errors: an invalid move leaves the state unchanged.

use thiserror::Error;

use crate::types::Square;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    #[error("square [{rank}, {file}] is off the board")]
    OutOfBounds { rank: u8, file: u8 },
}

/// Errors raised while building a position from setup parameters or a placement string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// Two pieces were asked to stand on the same square
    #[error("square {square} is occupied twice")]
    Collision { square: Square },

    /// Rank index outside the board
    #[error("rank {rank} is off the board")]
    InvalidRank { rank: u8 },

    /// Placement string does not have eight ranks
    #[error("placement has {found} ranks, expected 8")]
    RankCount { found: usize },

    /// A placement rank describes more or fewer than eight files
    #[error("placement rank {rank} covers {files} files, expected 8")]
    FileCount { rank: u8, files: usize },

    /// Unknown piece letter in a placement string
    #[error("unknown piece symbol '{symbol}'")]
    UnknownSymbol { symbol: char },

    /// More pieces than identifiers available
    #[error("too many pieces on the board")]
    TooManyPieces,
}
