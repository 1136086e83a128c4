use std::fmt;

use super::piece::PieceKind;
use super::types::Square;

/// How a move is executed once the moving piece leaves `from`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Quiet,
    /// Pawn two-square advance; opens the en-passant window.
    DoubleStep,
    Capture,
    /// Pawn capture of a pawn that just double-stepped past it.
    EnPassant,
    /// King two squares towards a rook; the rook hops over.
    Castle,
    Promotion { piece: PieceKind, capture: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
}

impl Move {
    pub fn new(from: Square, to: Square, kind: MoveKind) -> Self { Self { from, to, kind } }

    pub fn is_capture(&self) -> bool {
        matches!(
            self.kind,
            MoveKind::Capture | MoveKind::EnPassant | MoveKind::Promotion { capture: true, .. }
        )
    }

    pub fn promotion(&self) -> Option<PieceKind> {
        match self.kind {
            MoveKind::Promotion { piece, .. } => Some(piece),
            _ => None,
        }
    }

    pub fn is_castle(&self) -> bool { self.kind == MoveKind::Castle }

    /// Square of the captured piece, which differs from `to` for en passant.
    pub fn capture_square(&self) -> Option<Square> {
        match self.kind {
            MoveKind::EnPassant => Some(Square::new(self.to.file(), self.from.rank())),
            _ if self.is_capture() => Some(self.to),
            _ => None,
        }
    }

    /// Rook origin and destination for a castling move.
    pub fn castle_rook_squares(&self) -> Option<(Square, Square)> {
        if !self.is_castle() {
            return None;
        }
        let rank = self.from.rank();
        if self.to.file() > self.from.file() {
            Some((Square::new(7, rank), Square::new(5, rank)))
        } else {
            Some((Square::new(0, rank), Square::new(3, rank)))
        }
    }
}

/// Long algebraic form, e.g. `e2e4` or `e7e8q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece) = self.promotion() {
            write!(f, "{}", piece.symbol())?;
        }
        Ok(())
    }
}
