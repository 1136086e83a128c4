use abchess::board::{fen, ApplyMode, Color, DrawReason, GameResult, Move, MoveKind, Position, Square};

fn sq(s: &str) -> Square { s.parse().unwrap() }

fn play(b: &mut Position, line: &[&str]) {
    let mut side = Color::White;
    for uci in line {
        b.play_uci(uci, side).unwrap_or_else(|e| panic!("{uci}: {e}"));
        side = !side;
    }
}

#[test]
fn fools_mate_is_a_black_win() {
    let mut b = Position::startpos();
    play(&mut b, &["f2f3", "e7e5", "g2g4", "d8h4"]);
    assert_eq!(b.result(), GameResult::BlackWins);
    assert_eq!(b.result().winner(), Some(Color::Black));
    assert_eq!(b.result().to_string(), "0-1");
}

#[test]
fn back_rank_mate_is_a_white_win() {
    let (b, _) = fen::parse("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").expect("valid fen");
    assert_eq!(b.result(), GameResult::WhiteWins);
}

#[test]
fn stalemate_is_a_draw() {
    let (b, _) = fen::parse("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("valid fen");
    assert_eq!(b.result(), GameResult::Draw(DrawReason::Stalemate));
    assert_eq!(b.result().to_string(), "1/2-1/2");
}

#[test]
fn threefold_repetition_is_a_draw() {
    let mut b = Position::startpos();
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
    play(&mut b, &shuffle);
    assert_eq!(b.repetitions(), 2);
    assert_eq!(b.result(), GameResult::Ongoing);
    play(&mut b, &shuffle);
    assert_eq!(b.repetitions(), 3);
    assert_eq!(b.result(), GameResult::Draw(DrawReason::Repetition));
    assert_eq!(b.ply(), 8);
}

#[test]
fn same_placement_with_other_side_to_move_is_not_a_repetition() {
    // the king walks a triangle so the placement comes back after an odd number of plies
    let (mut b, _) = fen::parse("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").expect("valid fen");
    play(&mut b, &["a1a2", "e8d8", "a2a1", "d8d7", "a1a2", "d7e8", "a2a1"]);
    assert_eq!(b.history().len(), 8);
    assert_eq!(b.history().entries()[0].fingerprint, b.fingerprint());
    assert_eq!(b.repetitions(), 1);
}

#[test]
fn edit_mode_skips_history_and_moved_state() {
    let mut b = Position::startpos();
    let before = b.history().len();
    b.make_move_with(Move::new(sq("e2"), sq("e4"), MoveKind::DoubleStep), ApplyMode::Edit).expect("edit");
    assert_eq!(b.history().len(), before);
    let pawn = b.piece_at(sq("e4")).expect("pawn moved");
    assert!(!pawn.has_moved());
    assert!(!pawn.just_double_stepped());

    b.make_move(Move::new(sq("d2"), sq("d4"), MoveKind::DoubleStep)).expect("play");
    assert_eq!(b.history().len(), before + 1);
    assert!(b.piece_at(sq("d4")).is_some_and(|p| p.has_moved() && p.just_double_stepped()));
}

#[test]
fn make_move_rejects_empty_origin() {
    let mut b = Position::startpos();
    assert!(b.make_move(Move::new(sq("e4"), sq("e5"), MoveKind::Quiet)).is_err());
}
