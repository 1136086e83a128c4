use abchess::board::{fen, Color, MoveKind, Position, Square};

fn sq(s: &str) -> Square { s.parse().unwrap() }

fn play(b: &mut Position, line: &[&str]) {
    let mut side = Color::White;
    for uci in line {
        b.play_uci(uci, side).unwrap_or_else(|e| panic!("{uci}: {e}"));
        side = !side;
    }
}

#[test]
fn en_passant_available_right_after_double_step() {
    let mut b = Position::startpos();
    play(&mut b, &["e2e4", "a7a6", "e4e5", "d7d5"]);
    let mv = b.find_move(sq("e5"), sq("d6"), None, Color::White).expect("en passant");
    assert_eq!(mv.kind, MoveKind::EnPassant);
    assert_eq!(mv.capture_square(), Some(sq("d5")));

    b.make_move(mv).expect("applies");
    assert_eq!(b.piece_at(sq("d5")), None, "victim removed");
    assert_eq!(b.piece_at(sq("d6")).map(|p| p.symbol()), Some('P'));
}

#[test]
fn en_passant_expires_after_one_ply() {
    let mut b = Position::startpos();
    play(&mut b, &["e2e4", "a7a6", "e4e5", "d7d5", "a2a3", "h7h6"]);
    assert!(!b.is_legal_move(sq("e5"), sq("d6"), Color::White));
}

#[test]
fn single_step_does_not_enable_en_passant() {
    let mut b = Position::startpos();
    play(&mut b, &["e2e4", "d7d6", "e4e5", "d6d5"]);
    assert!(b.find_move(sq("e5"), sq("d6"), None, Color::White).is_none());
}

#[test]
fn en_passant_from_fen_and_back() {
    let f = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3";
    let (b, side) = fen::parse(f).expect("valid fen");
    assert!(b.is_legal_move(sq("e5"), sq("f6"), side));
    assert!(!b.is_legal_move(sq("e5"), sq("d6"), side));
    assert!(b.to_fen(side).starts_with("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6"));
}

#[test]
fn en_passant_that_exposes_the_king_is_illegal() {
    // exf3 would empty the fourth rank between the rook and the king
    let (b, side) = fen::parse("8/8/8/8/k3Pp1R/8/8/4K3 b - e3 0 1").expect("valid fen");
    assert!(!b.is_legal_move(sq("f4"), sq("e3"), side));
}
