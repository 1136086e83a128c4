use crate::board::{Move, Position};
use crate::search::eval::piece_value;

/// Reorders a move list before the search walks it. Implementations must be
/// deterministic: equal inputs give equal orders, which keeps cutoffs and
/// tie-breaks reproducible.
pub trait MoveSorter: Send + Sync {
    fn sort(&self, moves: &mut Vec<Move>, position: &Position);
}

/// Leaves moves in generation order.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenerationOrder;

impl MoveSorter for GenerationOrder {
    fn sort(&self, _moves: &mut Vec<Move>, _position: &Position) {}
}

/// Captures first by MVV-LVA, then promotions, then quiet moves in
/// generation order.
#[derive(Clone, Copy, Debug, Default)]
pub struct CaptureFirstSorter;

const CAPTURE_BONUS: i32 = 100_000;
const PROMOTION_BONUS: i32 = 50_000;

fn order_score(mv: &Move, position: &Position) -> i32 {
    let mut score = 0;
    if let Some(victim) = mv.capture_square().and_then(|sq| position.piece_at(sq)) {
        let attacker = position.piece_at(mv.from).map_or(0, |p| piece_value(p.kind()));
        score += CAPTURE_BONUS + piece_value(victim.kind()) * 10 - attacker;
    }
    if let Some(kind) = mv.promotion() {
        score += PROMOTION_BONUS + piece_value(kind);
    }
    score
}

impl MoveSorter for CaptureFirstSorter {
    fn sort(&self, moves: &mut Vec<Move>, position: &Position) {
        // sort_by_cached_key is stable; negate to get highest-score moves first.
        moves.sort_by_cached_key(|m| -order_score(m, position));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;

    #[test]
    fn captures_come_first_most_valuable_victim_leading() {
        // Ra1xa8 takes the queen, Nd1xc3 takes a pawn
        let pos = Position::from_fen("q3k3/8/8/8/8/2p5/8/R2NK3 w - - 0 1").unwrap();
        let mut moves = pos.legal_moves(Color::White);
        CaptureFirstSorter.sort(&mut moves, &pos);
        assert_eq!(moves[0].to_string(), "a1a8");
        assert_eq!(moves[1].to_string(), "d1c3");
        assert!(moves[2..].iter().all(|m| !m.is_capture()));
    }

    #[test]
    fn generation_order_is_untouched() {
        let pos = Position::startpos();
        let moves = pos.legal_moves(Color::White);
        let mut sorted = moves.clone();
        GenerationOrder.sort(&mut sorted, &pos);
        assert_eq!(moves, sorted);
    }
}
