use super::moves::{Move, MoveKind};
use super::piece::{Piece, PieceKind};
use super::position::Position;
use super::types::Square;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
const KING_OFFSETS: [(i8, i8); 8] = [(1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1)];
const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Movement rules of one piece kind.
pub trait Movement: Sync {
    /// Moves matching the piece's pattern, ignoring checks on its own king.
    fn pseudo_moves(&self, piece: &Piece, position: &Position, out: &mut Vec<Move>);

    /// Squares the piece attacks. Squares held by its own side count as
    /// attacked (defended); checks against its own king are ignored.
    fn attacks(&self, piece: &Piece, position: &Position, out: &mut Vec<Square>);

    fn is_pseudo_legal(&self, piece: &Piece, position: &Position, to: Square) -> bool {
        let mut moves = Vec::with_capacity(16);
        self.pseudo_moves(piece, position, &mut moves);
        moves.iter().any(|m| m.to == to)
    }
}

pub struct Pawn;
pub struct Knight;
pub struct Bishop;
pub struct Rook;
pub struct Queen;
pub struct King;

fn push_pawn_move(piece: &Piece, to: Square, capture: bool, out: &mut Vec<Move>) {
    if to.rank() == piece.color.promotion_rank() {
        for kind in PieceKind::PROMOTIONS {
            out.push(Move::new(piece.square, to, MoveKind::Promotion { piece: kind, capture }));
        }
    } else {
        let kind = if capture { MoveKind::Capture } else { MoveKind::Quiet };
        out.push(Move::new(piece.square, to, kind));
    }
}

impl Movement for Pawn {
    fn pseudo_moves(&self, piece: &Piece, position: &Position, out: &mut Vec<Move>) {
        let fwd = piece.color.forward();
        if let Some(one) = piece.square.offset(0, fwd) {
            if position.piece_at(one).is_none() {
                push_pawn_move(piece, one, false, out);
                if piece.square.rank() == piece.color.pawn_rank() {
                    if let Some(two) = one.offset(0, fwd) {
                        if position.piece_at(two).is_none() {
                            out.push(Move::new(piece.square, two, MoveKind::DoubleStep));
                        }
                    }
                }
            }
        }
        for df in [-1, 1] {
            let Some(target) = piece.square.offset(df, fwd) else { continue };
            match position.piece_at(target) {
                Some(victim) if victim.color != piece.color => push_pawn_move(piece, target, true, out),
                Some(_) => {}
                None => {
                    let beside = piece.square.offset(df, 0);
                    let en_passant = beside.and_then(|sq| position.piece_at(sq)).is_some_and(|p| {
                        p.kind == PieceKind::Pawn && p.color != piece.color && p.double_step
                    });
                    if en_passant {
                        out.push(Move::new(piece.square, target, MoveKind::EnPassant));
                    }
                }
            }
        }
    }

    fn attacks(&self, piece: &Piece, _position: &Position, out: &mut Vec<Square>) {
        let fwd = piece.color.forward();
        out.extend([-1, 1].into_iter().filter_map(|df| piece.square.offset(df, fwd)));
    }

    fn is_pseudo_legal(&self, piece: &Piece, position: &Position, to: Square) -> bool {
        let fwd = piece.color.forward() as i16;
        let dr = to.rank() as i16 - piece.square.rank() as i16;
        let df = to.file() as i16 - piece.square.file() as i16;
        if df == 0 {
            let one_empty = piece.square.offset(0, fwd as i8).is_some_and(|sq| position.piece_at(sq).is_none());
            return (dr == fwd && one_empty)
                || (dr == 2 * fwd
                    && piece.square.rank() == piece.color.pawn_rank()
                    && one_empty
                    && position.piece_at(to).is_none());
        }
        if df.abs() != 1 || dr != fwd {
            return false;
        }
        match position.piece_at(to) {
            Some(victim) => victim.color != piece.color,
            None => position
                .piece_at(Square::new(to.file(), piece.square.rank()))
                .is_some_and(|p| p.kind == PieceKind::Pawn && p.color != piece.color && p.double_step),
        }
    }
}

fn step_moves(piece: &Piece, position: &Position, offsets: &[(i8, i8)], out: &mut Vec<Move>) {
    for &(df, dr) in offsets {
        let Some(to) = piece.square.offset(df, dr) else { continue };
        match position.piece_at(to) {
            None => out.push(Move::new(piece.square, to, MoveKind::Quiet)),
            Some(p) if p.color != piece.color => out.push(Move::new(piece.square, to, MoveKind::Capture)),
            Some(_) => {}
        }
    }
}

fn step_attacks(piece: &Piece, offsets: &[(i8, i8)], out: &mut Vec<Square>) {
    out.extend(offsets.iter().filter_map(|&(df, dr)| piece.square.offset(df, dr)));
}

// Rays stop on the first occupied square; it is a capture only if it holds an opponent.
fn ray_moves(piece: &Piece, position: &Position, dirs: &[(i8, i8)], out: &mut Vec<Move>) {
    for &(df, dr) in dirs {
        let mut cur = piece.square;
        while let Some(to) = cur.offset(df, dr) {
            match position.piece_at(to) {
                None => out.push(Move::new(piece.square, to, MoveKind::Quiet)),
                Some(p) => {
                    if p.color != piece.color {
                        out.push(Move::new(piece.square, to, MoveKind::Capture));
                    }
                    break;
                }
            }
            cur = to;
        }
    }
}

fn ray_attacks(piece: &Piece, position: &Position, dirs: &[(i8, i8)], out: &mut Vec<Square>) {
    for &(df, dr) in dirs {
        let mut cur = piece.square;
        while let Some(to) = cur.offset(df, dr) {
            out.push(to);
            if position.piece_at(to).is_some() {
                break;
            }
            cur = to;
        }
    }
}

impl Movement for Knight {
    fn pseudo_moves(&self, piece: &Piece, position: &Position, out: &mut Vec<Move>) {
        step_moves(piece, position, &KNIGHT_OFFSETS, out)
    }

    fn attacks(&self, piece: &Piece, _position: &Position, out: &mut Vec<Square>) {
        step_attacks(piece, &KNIGHT_OFFSETS, out)
    }
}

impl Movement for Bishop {
    fn pseudo_moves(&self, piece: &Piece, position: &Position, out: &mut Vec<Move>) {
        ray_moves(piece, position, &DIAGONAL, out)
    }

    fn attacks(&self, piece: &Piece, position: &Position, out: &mut Vec<Square>) {
        ray_attacks(piece, position, &DIAGONAL, out)
    }
}

impl Movement for Rook {
    fn pseudo_moves(&self, piece: &Piece, position: &Position, out: &mut Vec<Move>) {
        ray_moves(piece, position, &ORTHOGONAL, out)
    }

    fn attacks(&self, piece: &Piece, position: &Position, out: &mut Vec<Square>) {
        ray_attacks(piece, position, &ORTHOGONAL, out)
    }
}

impl Movement for Queen {
    fn pseudo_moves(&self, piece: &Piece, position: &Position, out: &mut Vec<Move>) {
        ray_moves(piece, position, &ORTHOGONAL, out);
        ray_moves(piece, position, &DIAGONAL, out);
    }

    fn attacks(&self, piece: &Piece, position: &Position, out: &mut Vec<Square>) {
        ray_attacks(piece, position, &ORTHOGONAL, out);
        ray_attacks(piece, position, &DIAGONAL, out);
    }
}

impl Movement for King {
    fn pseudo_moves(&self, piece: &Piece, position: &Position, out: &mut Vec<Move>) {
        step_moves(piece, position, &KING_OFFSETS, out);
        castle_moves(piece, position, out);
    }

    // Castling never attacks anything, so it stays out of the attack set.
    fn attacks(&self, piece: &Piece, _position: &Position, out: &mut Vec<Square>) {
        step_attacks(piece, &KING_OFFSETS, out)
    }
}

/// (rook file, king destination file, files that must be empty, files the king crosses)
const CASTLE_WINGS: [(u8, u8, &[u8], &[u8]); 2] = [(7, 6, &[5, 6], &[5, 6]), (0, 2, &[1, 2, 3], &[3, 2])];

fn castle_moves(king: &Piece, position: &Position, out: &mut Vec<Move>) {
    let rank = king.color.home_rank();
    if king.moved || king.square != Square::new(4, rank) {
        return;
    }
    let enemy = king.color.opponent();
    let mut in_check = None;
    for (rook_file, to_file, empty, crossed) in CASTLE_WINGS {
        let rook_ok = position.piece_at(Square::new(rook_file, rank)).is_some_and(|r| {
            r.kind == PieceKind::Rook && r.color == king.color && !r.moved
        });
        if !rook_ok || empty.iter().any(|&f| position.piece_at(Square::new(f, rank)).is_some()) {
            continue;
        }
        if *in_check.get_or_insert_with(|| position.is_attacked(king.square, enemy)) {
            return;
        }
        if crossed.iter().any(|&f| position.is_attacked(Square::new(f, rank), enemy)) {
            continue;
        }
        out.push(Move::new(king.square, Square::new(to_file, rank), MoveKind::Castle));
    }
}
