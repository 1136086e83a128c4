use super::piece::{Piece, PieceKind};
use super::position::Position;
use super::types::{Color, Square};
use crate::error::{PositionError, PositionResult};

fn fen_err(msg: impl Into<String>) -> PositionError { PositionError::InvalidFen(msg.into()) }

/// Parses a FEN string into a position and the side to move.
///
/// Only placement is mandatory; missing fields default to White to move,
/// no castling rights and no en-passant square. Move counters are ignored.
/// Castling rights become the moved flags of kings and rooks; the en-passant
/// square marks the pawn that just double-stepped.
pub fn parse(fen: &str) -> PositionResult<(Position, Color)> {
    let mut fields = fen.split_whitespace();
    let placement = fields.next().ok_or_else(|| fen_err("empty FEN"))?;
    let side = match fields.next().unwrap_or("w") {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(fen_err(format!("bad side to move '{other}'"))),
    };
    let castling = fields.next().unwrap_or("-");
    let en_passant = fields.next().unwrap_or("-");

    let mut pieces = parse_placement(placement)?;

    for p in pieces.iter_mut() {
        p.moved = match p.kind {
            PieceKind::Pawn => p.square.rank() != p.color.pawn_rank(),
            PieceKind::King | PieceKind::Rook => true,
            _ => false,
        };
    }
    if castling != "-" {
        for c in castling.chars() {
            let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
            let rook_file = match c.to_ascii_lowercase() {
                'k' => 7,
                'q' => 0,
                _ => return Err(fen_err(format!("bad castling right '{c}'"))),
            };
            let rank = color.home_rank();
            for (file, kind) in [(4, PieceKind::King), (rook_file, PieceKind::Rook)] {
                let sq = Square::new(file, rank);
                let piece = pieces
                    .iter_mut()
                    .find(|p| p.square == sq && p.kind == kind && p.color == color)
                    .ok_or_else(|| fen_err(format!("castling right '{c}' without {kind:?} on {sq}")))?;
                piece.moved = false;
            }
        }
    }
    if en_passant != "-" {
        let target: Square = en_passant.parse().map_err(|_| fen_err(format!("bad en-passant square '{en_passant}'")))?;
        let mover = side.opponent();
        let pawn_sq = target
            .offset(0, mover.forward())
            .ok_or_else(|| fen_err(format!("bad en-passant square '{en_passant}'")))?;
        let pawn = pieces
            .iter_mut()
            .find(|p| p.square == pawn_sq && p.kind == PieceKind::Pawn && p.color == mover)
            .ok_or_else(|| fen_err(format!("no pawn to take en passant on {en_passant}")))?;
        *pawn = pawn.with_double_step(true);
    }

    Ok((Position::from_pieces(pieces)?, side))
}

fn parse_placement(placement: &str) -> PositionResult<Vec<Piece>> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(fen_err(format!("expected 8 ranks, got {}", rows.len())));
    }
    let mut pieces = Vec::with_capacity(32);
    for (i, row) in rows.iter().enumerate() {
        let rank = 7 - i as u8;
        let mut file = 0u8;
        for c in row.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as u8;
            } else {
                let kind = PieceKind::from_symbol(c).ok_or_else(|| fen_err(format!("bad piece '{c}'")))?;
                if file >= 8 {
                    return Err(fen_err(format!("rank {} overflows", rank + 1)));
                }
                let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
                pieces.push(Piece::new(kind, color, Square::new(file, rank)));
                file += 1;
            }
            if file > 8 {
                return Err(fen_err(format!("rank {} overflows", rank + 1)));
            }
        }
        if file != 8 {
            return Err(fen_err(format!("rank {} has {} files", rank + 1, file)));
        }
    }
    Ok(pieces)
}

pub fn format(position: &Position, side_to_move: Color) -> String {
    let mut out = String::with_capacity(90);
    for rank in (0..8).rev() {
        let mut empty = 0;
        for file in 0..8 {
            match position.piece_at(Square::new(file, rank)) {
                Some(p) => {
                    if empty > 0 {
                        out.push(char::from(b'0' + empty));
                        empty = 0;
                    }
                    out.push(p.symbol());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push(char::from(b'0' + empty));
        }
        if rank > 0 {
            out.push('/');
        }
    }
    out.push_str(if side_to_move == Color::White { " w " } else { " b " });

    let mut castling = String::new();
    for (color, rights) in [(Color::White, "KQ"), (Color::Black, "kq")] {
        let rank = color.home_rank();
        let unmoved = |file: u8, kind: PieceKind| {
            position
                .piece_at(Square::new(file, rank))
                .is_some_and(|p| p.kind == kind && p.color == color && !p.has_moved())
        };
        if !unmoved(4, PieceKind::King) {
            continue;
        }
        for (right, rook_file) in rights.chars().zip([7, 0]) {
            if unmoved(rook_file, PieceKind::Rook) {
                castling.push(right);
            }
        }
    }
    out.push_str(if castling.is_empty() { "-" } else { &castling });

    let ep = position
        .pieces()
        .find(|p| p.just_double_stepped())
        .and_then(|p| p.square().offset(0, -p.color().forward()));
    match ep {
        Some(sq) => out.push_str(&format!(" {sq}")),
        None => out.push_str(" -"),
    }
    out.push_str(&format!(" 0 {}", position.ply() / 2 + 1));
    out
}
