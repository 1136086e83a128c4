use std::collections::HashSet;
use std::sync::OnceLock;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::piece::{Piece, PieceKind};
use super::types::{Color, Square};

/// Fingerprint class of a piece: kind plus the special state that changes
/// which moves are available (en passant, castling).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashClass {
    PawnEnPassant,
    Pawn,
    Knight,
    Bishop,
    RookCastle,
    Rook,
    Queen,
    KingCastle,
    King,
}

impl HashClass {
    pub const PER_SIDE: usize = 9;

    pub fn of(piece: &Piece) -> HashClass {
        match piece.kind {
            PieceKind::Pawn if piece.double_step => HashClass::PawnEnPassant,
            PieceKind::Pawn => HashClass::Pawn,
            PieceKind::Knight => HashClass::Knight,
            PieceKind::Bishop => HashClass::Bishop,
            PieceKind::Rook if !piece.moved => HashClass::RookCastle,
            PieceKind::Rook => HashClass::Rook,
            PieceKind::Queen => HashClass::Queen,
            PieceKind::King if !piece.moved => HashClass::KingCastle,
            PieceKind::King => HashClass::King,
        }
    }

    /// Row in the key table; White uses 0..9, Black 9..18.
    pub fn index(self, color: Color) -> usize { color.index() * Self::PER_SIDE + self as usize }
}

const CLASSES: usize = 2 * HashClass::PER_SIDE;
const SEED: u64 = 0xC0FF_EE00_5EED_1234;

static TABLE: OnceLock<[[u64; Square::COUNT]; CLASSES]> = OnceLock::new();

fn table() -> &'static [[u64; Square::COUNT]; CLASSES] {
    TABLE.get_or_init(|| {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut seen = HashSet::with_capacity(CLASSES * Square::COUNT);
        let mut t = [[0u64; Square::COUNT]; CLASSES];
        for row in t.iter_mut() {
            for v in row.iter_mut() {
                *v = loop {
                    let k: u64 = rng.gen();
                    if k != 0 && seen.insert(k) { break k; }
                };
            }
        }
        t
    })
}

pub fn piece_key(piece: &Piece) -> u64 {
    table()[HashClass::of(piece).index(piece.color)][piece.square.index()]
}

/// XOR of the keys of every occupied square. Distinct positions can collide;
/// callers treat equal fingerprints as equal positions.
pub fn fingerprint<'a>(pieces: impl IntoIterator<Item = &'a Piece>) -> u64 {
    pieces.into_iter().fold(0, |acc, p| acc ^ piece_key(p))
}
