use crate::board::{Color, Square};

/// Errors raised while building or editing a position.
///
/// Illegal candidate moves are never reported here: move generation simply
/// leaves them out. A position with no legal moves is a normal terminal state.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("FEN error: {0}")]
    InvalidFen(String),

    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("illegal move: {0}")]
    InvalidMove(String),

    /// A playable position needs one king per side.
    #[error("no {0:?} king on the board")]
    MissingKing(Color),

    #[error("more than one {0:?} king on the board")]
    ExtraKing(Color),

    /// A piece whose kind/state combination has no fingerprint class.
    #[error("corrupt piece state on {square}")]
    CorruptPiece { square: Square },
}

pub type PositionResult<T> = Result<T, PositionError>;
