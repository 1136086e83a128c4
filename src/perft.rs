use crate::board::{ApplyMode, Color, Move, Position};

// Clone-per-node perft, the same way the search walks the tree
pub fn perft(position: &Position, side: Color, depth: u32) -> u64 {
    if depth == 0 { return 1; }
    let moves = position.legal_moves(side);
    if depth == 1 { return moves.len() as u64; }
    let mut nodes = 0u64;
    for m in moves {
        let mut child = position.search_copy();
        child.apply(m, ApplyMode::Play);
        nodes += perft(&child, !side, depth - 1);
    }
    nodes
}

/// Node counts below each root move.
pub fn divide(position: &Position, side: Color, depth: u32) -> Vec<(Move, u64)> {
    position
        .legal_moves(side)
        .into_iter()
        .map(|m| {
            let mut child = position.search_copy();
            child.apply(m, ApplyMode::Play);
            (m, perft(&child, !side, depth.saturating_sub(1)))
        })
        .collect()
}
