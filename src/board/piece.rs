use super::movegen::{self, Movement};
use super::moves::Move;
use super::position::Position;
use super::types::{Color, Square};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Promotion choices, strongest first.
    pub const PROMOTIONS: [PieceKind; 4] = [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight];

    /// Lowercase FEN letter.
    pub fn symbol(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_symbol(c: char) -> Option<PieceKind> {
        PieceKind::ALL.into_iter().find(|k| k.symbol() == c.to_ascii_lowercase())
    }

    /// Movement rules shared by every piece of this kind.
    pub fn rules(self) -> &'static dyn Movement {
        match self {
            PieceKind::Pawn => &movegen::Pawn,
            PieceKind::Knight => &movegen::Knight,
            PieceKind::Bishop => &movegen::Bishop,
            PieceKind::Rook => &movegen::Rook,
            PieceKind::Queen => &movegen::Queen,
            PieceKind::King => &movegen::King,
        }
    }
}

/// A piece on the board with its per-game bookkeeping.
///
/// `moved` decides castling eligibility for kings and rooks. `double_step` is
/// only ever set on a pawn that advanced two squares on the last move applied
/// to the position; the next move application clears it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub(crate) kind: PieceKind,
    pub(crate) color: Color,
    pub(crate) square: Square,
    pub(crate) moved: bool,
    pub(crate) double_step: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color, square: Square) -> Self {
        Self { kind, color, square, moved: false, double_step: false }
    }

    /// A fresh piece of the same kind and side on `square`.
    pub fn respawn(&self, square: Square) -> Self { Piece::new(self.kind, self.color, square) }

    pub fn with_moved(mut self, moved: bool) -> Self {
        self.moved = moved;
        self
    }

    pub(crate) fn with_double_step(mut self, double_step: bool) -> Self {
        self.double_step = double_step;
        self
    }

    pub fn kind(&self) -> PieceKind { self.kind }
    pub fn color(&self) -> Color { self.color }
    pub fn square(&self) -> Square { self.square }
    pub fn has_moved(&self) -> bool { self.moved }

    /// True for a pawn that can be taken en passant right now.
    pub fn just_double_stepped(&self) -> bool { self.double_step }

    /// FEN letter, uppercase for White.
    pub fn symbol(&self) -> char {
        let c = self.kind.symbol();
        if self.color == Color::White { c.to_ascii_uppercase() } else { c }
    }

    /// Bookkeeping for the piece that just moved to `to`.
    pub fn mark_moved(&mut self, to: Square) {
        self.double_step = self.kind == PieceKind::Pawn && self.square.rank().abs_diff(to.rank()) == 2;
        self.square = to;
        self.moved = true;
    }

    /// Bookkeeping for every piece that did not move this ply.
    pub fn mark_not_moved(&mut self) { self.double_step = false; }

    pub fn pseudo_moves(&self, position: &Position, out: &mut Vec<Move>) {
        self.kind.rules().pseudo_moves(self, position, out)
    }

    pub fn attacks(&self, position: &Position, out: &mut Vec<Square>) {
        self.kind.rules().attacks(self, position, out)
    }

    pub fn is_pseudo_legal(&self, position: &Position, to: Square) -> bool {
        self.kind.rules().is_pseudo_legal(self, position, to)
    }

    /// Pseudo-legal moves that do not leave this piece's king attacked.
    pub fn legal_moves(&self, position: &Position) -> Vec<Move> {
        let mut moves = Vec::with_capacity(16);
        self.pseudo_moves(position, &mut moves);
        moves.retain(|&mv| position.keeps_king_safe(mv, self.color));
        moves
    }
}
