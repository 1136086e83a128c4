use crate::board::{ApplyMode, Color, Move, PieceKind, Position};
use crate::search::eval::{piece_value, Score};

const KING_VALUE: Score = 20_000;

fn exchange_value(kind: PieceKind) -> Score {
    if kind == PieceKind::King { KING_VALUE } else { piece_value(kind) }
}

/// Static exchange evaluation of a capture by `side`: the material `side`
/// nets when both sides keep recapturing on the target square with their
/// least valuable legal attacker, each stopping when it pays to stop.
/// Returns `None` for moves that capture nothing.
pub fn see_gain_cp(position: &Position, side: Color, mv: Move) -> Option<Score> {
    let target = mv.to;
    let captured = position.piece_at(mv.capture_square()?)?;
    let attacker = position.piece_at(mv.from)?;
    let mut gains: Vec<Score> = vec![exchange_value(captured.kind())];

    // edit-mode replay on a history-free copy: captures on an occupied square
    // never depend on castling or en-passant state
    let mut cur = position.search_copy();
    cur.apply(mv, ApplyMode::Edit);
    let mut occupant = exchange_value(mv.promotion().unwrap_or(attacker.kind()));
    let mut to_move = side.opponent();

    loop {
        let reply = cur
            .captures_on(to_move, target)
            .into_iter()
            .filter(|m| m.promotion().map_or(true, |k| k == PieceKind::Queen))
            .filter_map(|m| cur.piece_at(m.from).map(|p| (m, exchange_value(p.kind()))))
            .min_by_key(|&(_, value)| value);
        let Some((m2, value)) = reply else { break };
        let prev = gains.last().copied().unwrap_or(0);
        gains.push(occupant - prev);
        cur.apply(m2, ApplyMode::Edit);
        occupant = m2.promotion().map_or(value, exchange_value);
        to_move = to_move.opponent();
    }

    // Stockfish-style fold: gains[i] = -max(-gains[i], gains[i+1])
    for i in (0..gains.len().saturating_sub(1)).rev() {
        gains[i] = -(-gains[i]).max(gains[i + 1]);
    }
    gains.first().copied()
}

/// Captures whose exchange does not lose material for `side`.
pub fn non_losing_captures(position: &Position, side: Color) -> Vec<Move> {
    let mut captures = position.capture_moves(side);
    captures.retain(|&mv| see_gain_cp(position, side, mv).is_some_and(|g| g >= 0));
    captures
}

/// A position is quiet for `side` when it has no capture worth making.
pub fn is_quiet(position: &Position, side: Color) -> bool { non_losing_captures(position, side).is_empty() }
