use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use super::fen;
use super::hash;
use super::history::History;
use super::moves::{Move, MoveKind};
use super::piece::{Piece, PieceKind};
use super::types::{Color, Square};
use crate::error::{PositionError, PositionResult};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// How much bookkeeping a move application performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyMode {
    /// A move of the game: pieces update their moved state and the
    /// resulting position is appended to the history.
    Play,
    /// Board setup: pieces are relocated and nothing else changes.
    Edit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawReason {
    Stalemate,
    Repetition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    Ongoing,
    WhiteWins,
    BlackWins,
    Draw(DrawReason),
}

impl GameResult {
    pub fn winner(self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            _ => None,
        }
    }

    pub fn is_over(self) -> bool { self != GameResult::Ongoing }
}

/// PGN-style result tag: `1-0`, `0-1`, `1/2-1/2` or `*`.
impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameResult::Ongoing => "*",
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw(_) => "1/2-1/2",
        };
        f.write_str(s)
    }
}

/// An 8x8 board. Side to move is not part of the position; every query
/// takes the side it is asked for.
///
/// Equality and `Hash` go through [`Position::fingerprint`], so two distinct
/// placements that collide compare equal.
#[derive(Clone, Debug)]
pub struct Position {
    squares: [Option<Piece>; Square::COUNT],
    kings: [Option<Square>; 2],
    fingerprint: OnceLock<u64>,
    history: History,
}

impl Position {
    pub fn startpos() -> Self {
        let mut squares = [None; Square::COUNT];
        const BACK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for color in Color::ALL {
            for (file, kind) in BACK.into_iter().enumerate() {
                let sq = Square::new(file as u8, color.home_rank());
                squares[sq.index()] = Some(Piece::new(kind, color, sq));
                let pawn_sq = Square::new(file as u8, color.pawn_rank());
                squares[pawn_sq.index()] = Some(Piece::new(PieceKind::Pawn, color, pawn_sq));
            }
        }
        let kings = [Some(Square::new(4, 0)), Some(Square::new(4, 7))];
        let mut pos = Self { squares, kings, fingerprint: OnceLock::new(), history: History::default() };
        pos.history.record(pos.fingerprint());
        pos
    }

    pub fn from_fen(fen: &str) -> PositionResult<Self> { fen::parse(fen).map(|(pos, _)| pos) }

    /// Builds a position from explicit pieces, each placed on its own square.
    pub fn from_pieces(pieces: impl IntoIterator<Item = Piece>) -> PositionResult<Self> {
        let mut squares = [None; Square::COUNT];
        for piece in pieces {
            let slot = &mut squares[piece.square.index()];
            if slot.is_some() {
                return Err(PositionError::CorruptPiece { square: piece.square });
            }
            *slot = Some(piece);
        }
        let mut kings = [None; 2];
        for piece in squares.iter().flatten() {
            validate_piece(piece)?;
            if piece.kind == PieceKind::King {
                let slot = &mut kings[piece.color.index()];
                if slot.is_some() {
                    return Err(PositionError::ExtraKing(piece.color));
                }
                *slot = Some(piece.square);
            }
        }
        for color in Color::ALL {
            if kings[color.index()].is_none() {
                return Err(PositionError::MissingKing(color));
            }
        }
        let mut pos = Self { squares, kings, fingerprint: OnceLock::new(), history: History::default() };
        pos.history.record(pos.fingerprint());
        Ok(pos)
    }

    pub fn to_fen(&self, side_to_move: Color) -> String { fen::format(self, side_to_move) }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> { self.squares[sq.index()] }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> { self.squares.iter().flatten() }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces().filter(move |p| p.color == color)
    }

    pub fn king_square(&self, side: Color) -> Option<Square> { self.kings[side.index()] }

    pub fn history(&self) -> &History { &self.history }

    /// Number of moves played since the position was set up.
    pub fn ply(&self) -> usize { self.history.len().saturating_sub(1) }

    pub fn fingerprint(&self) -> u64 { *self.fingerprint.get_or_init(|| hash::fingerprint(self.pieces())) }

    /// How many times the current placement has occurred with the same side to move.
    pub fn repetitions(&self) -> usize { self.history.repetitions() }

    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        let mut targets = Vec::with_capacity(32);
        for piece in self.pieces_of(by) {
            targets.clear();
            piece.attacks(self, &mut targets);
            if targets.contains(&sq) {
                return true;
            }
        }
        false
    }

    pub fn king_in_check(&self, side: Color) -> bool {
        self.king_square(side).is_some_and(|k| self.is_attacked(k, side.opponent()))
    }

    /// Same placement and piece state with an empty game history. Search
    /// nodes and exchange probes never read the history, so they copy this.
    pub fn search_copy(&self) -> Position {
        Position {
            squares: self.squares,
            kings: self.kings,
            fingerprint: self.fingerprint.clone(),
            history: History::default(),
        }
    }

    /// True if `mv`, played by `side`, leaves `side`'s king unattacked.
    pub fn keeps_king_safe(&self, mv: Move, side: Color) -> bool {
        let mut probe = self.search_copy();
        probe.apply(mv, ApplyMode::Edit);
        !probe.king_in_check(side)
    }

    pub fn pseudo_moves(&self, side: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        for piece in self.pieces_of(side) {
            piece.pseudo_moves(self, &mut moves);
        }
        moves
    }

    pub fn legal_moves(&self, side: Color) -> Vec<Move> {
        let mut moves = self.pseudo_moves(side);
        moves.retain(|&mv| self.keeps_king_safe(mv, side));
        moves
    }

    pub fn has_legal_move(&self, side: Color) -> bool {
        self.pseudo_moves(side).into_iter().any(|mv| self.keeps_king_safe(mv, side))
    }

    /// Raw reachability of every `side` piece, including squares it defends.
    /// A move is tagged as a capture when the target holds an opponent.
    pub fn attack_moves(&self, side: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        let mut targets = Vec::with_capacity(32);
        for piece in self.pieces_of(side) {
            targets.clear();
            piece.attacks(self, &mut targets);
            for &to in &targets {
                let capture = self.piece_at(to).is_some_and(|p| p.color != side);
                let kind = if capture { MoveKind::Capture } else { MoveKind::Quiet };
                moves.push(Move::new(piece.square, to, kind));
            }
        }
        moves
    }

    /// Legal captures of `side`. Quiet moves are dropped before the legality probe.
    pub fn capture_moves(&self, side: Color) -> Vec<Move> {
        let mut moves = self.pseudo_moves(side);
        moves.retain(|&mv| mv.is_capture() && self.keeps_king_safe(mv, side));
        moves
    }

    /// Legal captures by `side` landing on `target`. Only pieces attacking
    /// `target` generate moves.
    pub fn captures_on(&self, side: Color, target: Square) -> Vec<Move> {
        let mut moves = Vec::new();
        let mut targets = Vec::with_capacity(32);
        let mut candidates = Vec::with_capacity(32);
        for piece in self.pieces_of(side) {
            targets.clear();
            piece.attacks(self, &mut targets);
            if !targets.contains(&target) {
                continue;
            }
            candidates.clear();
            piece.pseudo_moves(self, &mut candidates);
            moves.extend(
                candidates
                    .iter()
                    .copied()
                    .filter(|mv| mv.to == target && mv.is_capture() && self.keeps_king_safe(*mv, side)),
            );
        }
        moves
    }

    pub fn is_legal_move(&self, from: Square, to: Square, side: Color) -> bool {
        let Some(piece) = self.piece_at(from) else { return false };
        if piece.color != side || self.piece_at(to).is_some_and(|p| p.color == side) {
            return false;
        }
        if !piece.is_pseudo_legal(self, to) {
            return false;
        }
        let mut moves = Vec::with_capacity(16);
        piece.pseudo_moves(self, &mut moves);
        moves.into_iter().any(|mv| mv.to == to && self.keeps_king_safe(mv, side))
    }

    /// The legal move of `side` matching the squares and promotion piece.
    pub fn find_move(&self, from: Square, to: Square, promotion: Option<PieceKind>, side: Color) -> Option<Move> {
        let piece = self.piece_at(from).filter(|p| p.color == side)?;
        piece
            .legal_moves(self)
            .into_iter()
            .find(|mv| mv.to == to && mv.promotion() == promotion)
    }

    /// Parses and plays a long-algebraic move such as `e2e4` or `a7a8q`.
    pub fn play_uci(&mut self, uci: &str, side: Color) -> PositionResult<Move> {
        let invalid = || PositionError::InvalidMove(uci.to_string());
        if !(4..=5).contains(&uci.len()) || !uci.is_ascii() {
            return Err(invalid());
        }
        let from: Square = uci[0..2].parse().map_err(|_| invalid())?;
        let to: Square = uci[2..4].parse().map_err(|_| invalid())?;
        let promotion = match uci[4..].chars().next() {
            Some(c) => Some(PieceKind::from_symbol(c).ok_or_else(invalid)?),
            None => None,
        };
        let mv = self.find_move(from, to, promotion, side).ok_or_else(invalid)?;
        self.apply(mv, ApplyMode::Play);
        Ok(mv)
    }

    pub fn make_move(&mut self, mv: Move) -> PositionResult<()> { self.make_move_with(mv, ApplyMode::Play) }

    /// Applies `mv` without checking legality. Rejects moves that start on an
    /// empty square or would take a king off the board.
    pub fn make_move_with(&mut self, mv: Move, mode: ApplyMode) -> PositionResult<()> {
        if self.piece_at(mv.from).is_none() {
            return Err(PositionError::InvalidMove(mv.to_string()));
        }
        let victim = self.piece_at(mv.capture_square().unwrap_or(mv.to));
        if victim.is_some_and(|p| p.kind == PieceKind::King) {
            return Err(PositionError::InvalidMove(mv.to_string()));
        }
        self.apply(mv, mode);
        Ok(())
    }

    /// Executes a move produced by move generation.
    pub(crate) fn apply(&mut self, mv: Move, mode: ApplyMode) {
        let Some(mut piece) = self.squares[mv.from.index()].take() else { return };
        match mv.kind {
            MoveKind::EnPassant => {
                let victim = Square::new(mv.to.file(), mv.from.rank());
                self.squares[victim.index()] = None;
            }
            MoveKind::Castle => {
                if let Some((rook_from, rook_to)) = mv.castle_rook_squares() {
                    if let Some(mut rook) = self.squares[rook_from.index()].take() {
                        relocate(&mut rook, rook_to, mode);
                        self.squares[rook_to.index()] = Some(rook);
                    }
                }
            }
            MoveKind::Promotion { piece: kind, .. } => piece.kind = kind,
            _ => {}
        }
        relocate(&mut piece, mv.to, mode);
        self.squares[mv.to.index()] = Some(piece);
        if piece.kind == PieceKind::King {
            self.kings[piece.color.index()] = Some(mv.to);
        }
        if mode == ApplyMode::Play {
            for (idx, slot) in self.squares.iter_mut().enumerate() {
                if idx == mv.to.index() {
                    continue;
                }
                if let Some(other) = slot {
                    other.mark_not_moved();
                }
            }
        }
        self.fingerprint = OnceLock::new();
        if mode == ApplyMode::Play {
            self.history.record(self.fingerprint());
        }
    }

    /// Classifies the game: checkmate first, then stalemate, then repetition.
    pub fn result(&self) -> GameResult {
        let black_stuck = !self.has_legal_move(Color::Black);
        let white_stuck = !self.has_legal_move(Color::White);
        if black_stuck && self.king_in_check(Color::Black) {
            return GameResult::WhiteWins;
        }
        if white_stuck && self.king_in_check(Color::White) {
            return GameResult::BlackWins;
        }
        if black_stuck || white_stuck {
            return GameResult::Draw(DrawReason::Stalemate);
        }
        if self.repetitions() >= 3 {
            return GameResult::Draw(DrawReason::Repetition);
        }
        GameResult::Ongoing
    }
}

fn relocate(piece: &mut Piece, to: Square, mode: ApplyMode) {
    match mode {
        ApplyMode::Play => piece.mark_moved(to),
        ApplyMode::Edit => piece.square = to,
    }
}

fn validate_piece(piece: &Piece) -> PositionResult<()> {
    let corrupt = Err(PositionError::CorruptPiece { square: piece.square });
    if piece.kind == PieceKind::Pawn {
        let rank = piece.square.rank();
        if rank == 0 || rank == 7 {
            return corrupt;
        }
        // a pawn that just double-stepped sits on its fourth rank
        if piece.double_step && rank != (piece.color.pawn_rank() as i8 + 2 * piece.color.forward()) as u8 {
            return corrupt;
        }
    } else if piece.double_step {
        return corrupt;
    }
    Ok(())
}

impl Default for Position {
    fn default() -> Self { Self::startpos() }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool { self.fingerprint() == other.fingerprint() }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) { self.fingerprint().hash(state) }
}

/// Plain text diagram, rank 8 at the top.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{}  ", rank + 1)?;
            for file in 0..8 {
                let c = self.piece_at(Square::new(file, rank)).map_or('.', |p| p.symbol());
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        write!(f, "\n    a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square { s.parse().unwrap() }

    #[test]
    fn startpos_has_twenty_moves_per_side() {
        let pos = Position::startpos();
        assert_eq!(pos.legal_moves(Color::White).len(), 20);
        assert_eq!(pos.legal_moves(Color::Black).len(), 20);
        assert_eq!(pos.king_square(Color::Black), Some(sq("e8")));
        assert_eq!(pos.result(), GameResult::Ongoing);
    }

    #[test]
    fn from_pieces_requires_both_kings() {
        let lone = [Piece::new(PieceKind::King, Color::White, sq("e1"))];
        assert_eq!(Position::from_pieces(lone).unwrap_err(), PositionError::MissingKing(Color::Black));

        let pieces = [
            Piece::new(PieceKind::King, Color::White, sq("e1")),
            Piece::new(PieceKind::King, Color::White, sq("e2")),
            Piece::new(PieceKind::King, Color::Black, sq("e8")),
        ];
        assert_eq!(Position::from_pieces(pieces).unwrap_err(), PositionError::ExtraKing(Color::White));
    }

    #[test]
    fn pawn_on_back_rank_is_corrupt() {
        let pieces = [
            Piece::new(PieceKind::King, Color::White, sq("e1")),
            Piece::new(PieceKind::King, Color::Black, sq("e8")),
            Piece::new(PieceKind::Pawn, Color::White, sq("a8")),
        ];
        assert_eq!(Position::from_pieces(pieces).unwrap_err(), PositionError::CorruptPiece { square: sq("a8") });
    }

    #[test]
    fn king_square_follows_the_king() {
        let mut pos = Position::startpos();
        for (uci, side) in [("e2e4", Color::White), ("e7e5", Color::Black), ("e1e2", Color::White)] {
            pos.play_uci(uci, side).unwrap();
        }
        assert_eq!(pos.king_square(Color::White), Some(sq("e2")));
        assert_eq!(pos.ply(), 3);
    }

    #[test]
    fn display_draws_rank_eight_first() {
        let text = Position::startpos().to_string();
        let first = text.lines().next().unwrap();
        assert_eq!(first, "8   r n b q k b n r");
    }

    #[test]
    fn search_copy_drops_only_the_history() {
        let mut pos = Position::startpos();
        for (uci, side) in [("e2e4", Color::White), ("e7e5", Color::Black), ("g1f3", Color::White)] {
            pos.play_uci(uci, side).unwrap();
        }
        let copy = pos.search_copy();
        assert!(copy.history().is_empty());
        assert_eq!(copy.fingerprint(), pos.fingerprint());
        assert_eq!(copy.legal_moves(Color::Black), pos.legal_moves(Color::Black));
        assert_eq!(copy.to_fen(Color::Black), pos.to_fen(Color::Black));
    }

    #[test]
    fn capture_lists_match_filtered_legal_moves() {
        let (pos, side) = fen::parse("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
        for side in [side, !side] {
            let mut expected = pos.legal_moves(side);
            expected.retain(Move::is_capture);
            assert_eq!(pos.capture_moves(side), expected);
            for target in Square::all() {
                let on_target: Vec<Move> = expected.iter().copied().filter(|m| m.to == target).collect();
                let mut got = pos.captures_on(side, target);
                got.sort_by_key(|m| (m.from.index(), m.to.index(), m.promotion().map(PieceKind::symbol)));
                let mut want = on_target;
                want.sort_by_key(|m| (m.from.index(), m.to.index(), m.promotion().map(PieceKind::symbol)));
                assert_eq!(got, want, "captures on {target}");
            }
        }
    }

    #[test]
    fn capturing_a_king_is_rejected() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 0 1").unwrap();
        let mv = Move::new(sq("h1"), sq("e8"), MoveKind::Capture);
        assert!(pos.make_move_with(mv, ApplyMode::Edit).is_err());
    }
}
