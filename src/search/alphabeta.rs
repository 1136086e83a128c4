use crate::board::{ApplyMode, Color, Move, Position};
use crate::search::eval::{Evaluator, MaterialEvaluator, Score, DRAW_SCORE, EVAL_LIMIT, INFINITY, MATE_SCORE};
use crate::search::ordering::{CaptureFirstSorter, MoveSorter};
use crate::search::see;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What happens at a depth-0 node that still has captures worth making.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuiescenceMode {
    /// Evaluate every depth-0 node as it stands.
    Off,
    /// Keep searching non-losing captures until the position is quiet.
    #[default]
    Captures,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub depth: u32,
    pub quiescence: QuiescenceMode,
    pub threads: usize,
    pub movetime_ms: Option<u64>,
    pub max_nodes: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self { depth: 4, quiescence: QuiescenceMode::Captures, threads: 1, movetime_ms: None, max_nodes: None }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: Score,
    pub nodes: u64,
    pub depth: u32,
}

/// Depth-first minimax with alpha-beta pruning. White maximizes.
pub struct Searcher {
    evaluator: Arc<dyn Evaluator>,
    sorter: Arc<dyn MoveSorter>,
    quiescence: QuiescenceMode,
    pub(crate) nodes: u64,
    node_limit: u64,
    deadline: Option<Instant>,
    aborted: bool,
}

impl Default for Searcher {
    fn default() -> Self { Self::new(Arc::new(MaterialEvaluator), Arc::new(CaptureFirstSorter)) }
}

impl Searcher {
    pub fn new(evaluator: Arc<dyn Evaluator>, sorter: Arc<dyn MoveSorter>) -> Self {
        Self {
            evaluator,
            sorter,
            quiescence: QuiescenceMode::default(),
            nodes: 0,
            node_limit: u64::MAX,
            deadline: None,
            aborted: false,
        }
    }

    pub fn with_quiescence(mut self, mode: QuiescenceMode) -> Self {
        self.quiescence = mode;
        self
    }

    pub fn set_quiescence(&mut self, mode: QuiescenceMode) { self.quiescence = mode; }
    pub fn nodes(&self) -> u64 { self.nodes }

    /// `(best move, score)` for `side` to move, searching `depth_left` plies.
    ///
    /// Bounds are threaded the simple way: a minimizing node returns as soon
    /// as a child drops below the inherited alpha, a maximizing node as soon
    /// as a child exceeds the inherited beta, and between children the node
    /// narrows only its own bound to its running best. Among equal scores
    /// the last move searched wins.
    pub fn minimax(&mut self, position: &Position, side: Color, depth_left: i32, alpha: Score, beta: Score) -> (Option<Move>, Score) {
        self.search::<true>(position, side, depth_left, alpha, beta, 0)
    }

    /// Full-width minimax over the same tree, no cutoffs. Reference for the
    /// pruned search; far slower.
    pub fn minimax_unpruned(&mut self, position: &Position, side: Color, depth_left: i32) -> (Option<Move>, Score) {
        self.search::<false>(position, side, depth_left, -INFINITY, INFINITY, 0)
    }

    pub fn qsearch_eval(&mut self, position: &Position, side: Color) -> Score {
        self.quiesce::<true>(position, side, -INFINITY, INFINITY)
    }

    fn evaluate(&self, position: &Position) -> Score {
        self.evaluator.evaluate(position).clamp(-EVAL_LIMIT, EVAL_LIMIT)
    }

    fn out_of_budget(&mut self) -> bool {
        if !self.aborted {
            let late = self.deadline.is_some_and(|dl| Instant::now() >= dl);
            self.aborted = late || self.nodes >= self.node_limit;
        }
        self.aborted
    }

    fn search<const PRUNE: bool>(
        &mut self,
        position: &Position,
        side: Color,
        depth_left: i32,
        alpha: Score,
        beta: Score,
        ply: u32,
    ) -> (Option<Move>, Score) {
        self.nodes += 1;
        if self.out_of_budget() {
            return (None, self.evaluate(position));
        }
        if depth_left <= 0 {
            let score = match self.quiescence {
                QuiescenceMode::Off => self.evaluate(position),
                QuiescenceMode::Captures => self.quiesce::<PRUNE>(position, side, alpha, beta),
            };
            return (None, score);
        }

        let mut moves = position.legal_moves(side);
        if moves.is_empty() {
            return (None, terminal_score(position, side, ply));
        }
        self.sorter.sort(&mut moves, position);

        let maximizing = side.is_maximizing();
        let mut best_move = None;
        let mut best = if maximizing { -INFINITY } else { INFINITY };
        let (mut local_alpha, mut local_beta) = (alpha, beta);
        for mv in moves {
            let mut child = position.search_copy();
            child.apply(mv, ApplyMode::Play);
            let (_, score) = self.search::<PRUNE>(&child, !side, depth_left - 1, local_alpha, local_beta, ply + 1);
            if PRUNE {
                if !maximizing && score < alpha {
                    return (Some(mv), score);
                }
                if maximizing && score > beta {
                    return (Some(mv), score);
                }
            }
            best = if maximizing { best.max(score) } else { best.min(score) };
            if score == best {
                best_move = Some(mv);
            }
            if PRUNE {
                if maximizing {
                    local_alpha = best;
                } else {
                    local_beta = best;
                }
            }
        }
        (best_move, best)
    }

    // Stand pat, then non-losing captures only, under the same cutoff policy.
    fn quiesce<const PRUNE: bool>(&mut self, position: &Position, side: Color, alpha: Score, beta: Score) -> Score {
        let stand = self.evaluate(position);
        if self.out_of_budget() {
            return stand;
        }
        let mut captures = see::non_losing_captures(position, side);
        if captures.is_empty() {
            return stand;
        }
        let maximizing = side.is_maximizing();
        if PRUNE && ((maximizing && stand > beta) || (!maximizing && stand < alpha)) {
            return stand;
        }
        self.sorter.sort(&mut captures, position);

        let mut best = stand;
        let (mut local_alpha, mut local_beta) = if maximizing { (stand, beta) } else { (alpha, stand) };
        for mv in captures {
            self.nodes += 1;
            let mut child = position.search_copy();
            child.apply(mv, ApplyMode::Play);
            let score = self.quiesce::<PRUNE>(&child, !side, local_alpha, local_beta);
            if PRUNE {
                if !maximizing && score < alpha {
                    return score;
                }
                if maximizing && score > beta {
                    return score;
                }
            }
            best = if maximizing { best.max(score) } else { best.min(score) };
            if maximizing {
                local_alpha = best;
            } else {
                local_beta = best;
            }
        }
        best
    }

    pub fn search_depth(&mut self, position: &Position, side: Color, depth: u32) -> SearchResult {
        let (best_move, score) = self.search::<true>(position, side, depth as i32, -INFINITY, INFINITY, 0);
        debug!("depth {} score {} nodes {} best {:?}", depth, score, self.nodes, best_move.map(|m| m.to_string()));
        SearchResult { best_move, score, nodes: self.nodes, depth }
    }

    /// Searches each root move on its own rayon task with the full window and
    /// reduces in sorted order, last equal score winning.
    pub fn search_depth_parallel(&mut self, position: &Position, side: Color, depth: u32) -> SearchResult {
        let mut moves = position.legal_moves(side);
        if moves.is_empty() || depth == 0 {
            return self.search_depth(position, side, depth);
        }
        self.sorter.sort(&mut moves, position);

        let template = &*self;
        let results: Vec<(Move, Score, u64, bool)> = moves
            .par_iter()
            .map(|&mv| {
                let mut child = position.search_copy();
                child.apply(mv, ApplyMode::Play);
                let mut w = template.worker();
                let (_, score) = w.search::<true>(&child, !side, depth as i32 - 1, -INFINITY, INFINITY, 1);
                (mv, score, w.nodes, w.aborted)
            })
            .collect();

        let maximizing = side.is_maximizing();
        let mut best_move = None;
        let mut best = if maximizing { -INFINITY } else { INFINITY };
        for (mv, score, nodes, aborted) in results {
            self.nodes += nodes;
            self.aborted |= aborted;
            best = if maximizing { best.max(score) } else { best.min(score) };
            if score == best {
                best_move = Some(mv);
            }
        }
        self.nodes += 1;
        debug!("depth {} score {} nodes {} best {:?} (root split)", depth, best, self.nodes, best_move.map(|m| m.to_string()));
        SearchResult { best_move, score: best, nodes: self.nodes, depth }
    }

    fn worker(&self) -> Searcher {
        Searcher {
            evaluator: self.evaluator.clone(),
            sorter: self.sorter.clone(),
            quiescence: self.quiescence,
            nodes: 0,
            node_limit: self.node_limit.saturating_sub(self.nodes),
            deadline: self.deadline,
            aborted: false,
        }
    }

    /// Fixed-depth search (at least one ply) when no budget is given;
    /// otherwise iterative deepening that keeps the last completed iteration.
    pub fn search_with_params(&mut self, position: &Position, side: Color, params: SearchParams) -> SearchResult {
        self.nodes = 0;
        self.aborted = false;
        self.quiescence = params.quiescence;
        self.node_limit = params.max_nodes.unwrap_or(u64::MAX);
        self.deadline = params.movetime_ms.map(|ms| Instant::now() + Duration::from_millis(ms));
        let threads = params.threads.max(1);

        let run = |s: &mut Searcher, depth: u32| {
            if threads > 1 && depth > 1 {
                s.search_depth_parallel(position, side, depth)
            } else {
                s.search_depth(position, side, depth)
            }
        };

        if self.deadline.is_none() && params.max_nodes.is_none() {
            return run(&mut *self, params.depth.max(1));
        }

        let mut last: Option<SearchResult> = None;
        for d in 1..=params.depth.max(1) {
            let r = run(&mut *self, d);
            if self.aborted {
                debug!("budget exhausted during depth {d}, keeping depth {}", last.as_ref().map_or(0, |r| r.depth));
                break;
            }
            last = Some(r);
        }
        let mut result = last.unwrap_or_else(|| SearchResult { score: self.evaluate(position), ..Default::default() });
        if result.best_move.is_none() {
            // out of budget before depth 1 finished: fall back to the first ordered move
            let mut moves = position.legal_moves(side);
            self.sorter.sort(&mut moves, position);
            result.best_move = moves.first().copied();
        }
        result.nodes = self.nodes;
        result
    }
}

fn terminal_score(position: &Position, side: Color, ply: u32) -> Score {
    if !position.king_in_check(side) {
        return DRAW_SCORE;
    }
    let mate = MATE_SCORE - ply as Score;
    if side.is_maximizing() { -mate } else { mate }
}
