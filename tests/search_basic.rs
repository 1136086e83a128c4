use abchess::board::{fen, Color, Position};
use abchess::search::eval::{mate_distance, MATE_SCORE};
use abchess::search::{QuiescenceMode, Searcher};

const INF: i32 = abchess::search::eval::INFINITY;

#[test]
fn search_returns_legal_move_startpos() {
    let b = Position::startpos();
    let mut searcher = Searcher::default();
    let res = searcher.search_depth(&b, Color::White, 1);
    let bm = res.best_move.expect("no move found at depth 1");
    assert!(b.legal_moves(Color::White).contains(&bm));
    assert!(res.nodes > 20, "root plus twenty children at least: {}", res.nodes);
}

#[test]
fn search_prefers_winning_queen_capture() {
    // Qe2xd2 wins the queen outright
    let (b, side) = fen::parse("k7/8/8/8/8/8/3qQ3/7K w - - 0 1").expect("valid fen");
    for mode in [QuiescenceMode::Off, QuiescenceMode::Captures] {
        let mut searcher = Searcher::default().with_quiescence(mode);
        let res = searcher.search_depth(&b, side, 1);
        let bm = res.best_move.expect("expected a best move");
        assert_eq!(bm.to_string(), "e2d2", "{mode:?}");
        assert_eq!(res.score, 900, "{mode:?}");
    }
}

#[test]
fn black_minimizes() {
    let (b, side) = fen::parse("4k3/8/8/8/5Q2/8/8/2b4K b - - 0 1").expect("valid fen");
    let mut searcher = Searcher::default();
    let res = searcher.search_depth(&b, side, 1);
    assert_eq!(res.best_move.map(|m| m.to_string()).as_deref(), Some("c1f4"));
    assert_eq!(res.score, -330);
}

#[test]
fn finds_back_rank_mate_for_white() {
    let (b, side) = fen::parse("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").expect("valid fen");
    let mut searcher = Searcher::default();
    let (bm, score) = searcher.minimax(&b, side, 2, -INF, INF);
    assert_eq!(bm.map(|m| m.to_string()).as_deref(), Some("a1a8"));
    assert_eq!(score, MATE_SCORE - 1);
    assert_eq!(mate_distance(score), Some(1));
}

#[test]
fn finds_back_rank_mate_for_black() {
    let (b, side) = fen::parse("r5k1/8/8/8/8/8/5PPP/6K1 b - - 0 1").expect("valid fen");
    let mut searcher = Searcher::default();
    let (bm, score) = searcher.minimax(&b, side, 3, -INF, INF);
    assert_eq!(bm.map(|m| m.to_string()).as_deref(), Some("a8a1"));
    assert_eq!(score, -(MATE_SCORE - 1));
}

#[test]
fn mated_side_gets_no_move_and_full_mate_score() {
    let mut b = Position::startpos();
    for (uci, side) in [("f2f3", Color::White), ("e7e5", Color::Black), ("g2g4", Color::White), ("d8h4", Color::Black)] {
        b.play_uci(uci, side).expect("legal move");
    }
    let mut searcher = Searcher::default();
    let (bm, score) = searcher.minimax(&b, Color::White, 3, -INF, INF);
    assert_eq!(bm, None);
    assert_eq!(score, -MATE_SCORE);
}

#[test]
fn stalemate_scores_as_draw() {
    let (b, side) = fen::parse("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("valid fen");
    let mut searcher = Searcher::default();
    let (bm, score) = searcher.minimax(&b, side, 4, -INF, INF);
    assert_eq!(bm, None);
    assert_eq!(score, 0);
}

#[test]
fn depth_zero_returns_static_score_without_move() {
    let (b, side) = fen::parse("k7/8/8/8/8/8/3qQ3/7K w - - 0 1").expect("valid fen");
    let mut searcher = Searcher::default().with_quiescence(QuiescenceMode::Off);
    assert_eq!(searcher.minimax(&b, side, 0, -INF, INF), (None, 0));
}

#[test]
fn custom_evaluator_closure_is_clamped() {
    use abchess::search::eval::EVAL_LIMIT;
    use abchess::search::GenerationOrder;
    use std::sync::Arc;
    let wild = |_: &Position| i32::MAX / 2;
    let mut searcher = Searcher::new(Arc::new(wild), Arc::new(GenerationOrder)).with_quiescence(QuiescenceMode::Off);
    let (_, score) = searcher.minimax(&Position::startpos(), Color::White, 1, -INF, INF);
    assert_eq!(score, EVAL_LIMIT);
}
