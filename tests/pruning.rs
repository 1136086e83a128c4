// Alpha-beta must return exactly what full-width minimax returns.
use abchess::board::fen;
use abchess::search::{QuiescenceMode, Searcher};
use pretty_assertions::assert_eq;

const INF: i32 = abchess::search::eval::INFINITY;

const FENS: &[&str] = &[
    "k7/8/8/8/8/8/3qQ3/7K w - - 0 1",
    "4k3/8/4p3/3p4/8/8/8/3QK3 w - - 0 1",
    "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "6k1/5ppp/8/8/8/8/5PPP/R5K1 b - - 0 1",
    "4k3/2n5/8/3p4/4P3/2N5/8/4K3 w - - 0 1",
];

#[test]
fn pruned_search_matches_unpruned() {
    for mode in [QuiescenceMode::Off, QuiescenceMode::Captures] {
        for f in FENS {
            let (b, side) = fen::parse(f).expect("valid fen");
            for depth in 1..=3 {
                let mut pruned = Searcher::default().with_quiescence(mode);
                let mut full = Searcher::default().with_quiescence(mode);
                let a = pruned.minimax(&b, side, depth, -INF, INF);
                let u = full.minimax_unpruned(&b, side, depth);
                assert_eq!(a, u, "{mode:?} depth {depth} FEN {f}");
            }
        }
    }
}

#[test]
fn pruning_visits_fewer_nodes() {
    let (b, side) = fen::parse("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("valid fen");
    let mut pruned = Searcher::default().with_quiescence(QuiescenceMode::Off);
    let mut full = Searcher::default().with_quiescence(QuiescenceMode::Off);
    pruned.minimax(&b, side, 3, -INF, INF);
    full.minimax_unpruned(&b, side, 3);
    assert!(pruned.nodes() < full.nodes(), "{} vs {}", pruned.nodes(), full.nodes());
}
