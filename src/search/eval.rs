use crate::board::{Color, PieceKind, Position};

pub type Score = i32;

const PAWN: Score = 100;
const KNIGHT: Score = 320;
const BISHOP: Score = 330;
const ROOK: Score = 500;
const QUEEN: Score = 900;

// Mate scoring helpers. Evaluator output is clamped to EVAL_LIMIT so it can
// never reach a mate score; INFINITY bounds every real score.
pub const MATE_SCORE: Score = 1_000_000;
pub const INFINITY: Score = 1_100_000;
pub const EVAL_LIMIT: Score = 900_000;
pub const DRAW_SCORE: Score = 0;

/// Scores a position; positive favours White.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, position: &Position) -> Score;
}

impl<F> Evaluator for F
where
    F: Fn(&Position) -> Score + Send + Sync,
{
    fn evaluate(&self, position: &Position) -> Score { self(position) }
}

pub fn piece_value(kind: PieceKind) -> Score {
    match kind {
        PieceKind::Pawn => PAWN,
        PieceKind::Knight => KNIGHT,
        PieceKind::Bishop => BISHOP,
        PieceKind::Rook => ROOK,
        PieceKind::Queen => QUEEN,
        PieceKind::King => 0,
    }
}

// Side-agnostic material in centipawns: positive means White has more material.
pub fn material_eval_cp(position: &Position) -> Score {
    position
        .pieces()
        .map(|p| if p.color() == Color::White { piece_value(p.kind()) } else { -piece_value(p.kind()) })
        .sum()
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialEvaluator;

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, position: &Position) -> Score { material_eval_cp(position) }
}

pub fn is_mate_score(score: Score) -> bool { score.abs() > EVAL_LIMIT }

/// Plies to mate encoded in a mate score.
pub fn mate_distance(score: Score) -> Option<u32> {
    is_mate_score(score).then(|| (MATE_SCORE - score.abs()) as u32)
}
