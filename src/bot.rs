use log::info;

use crate::board::{Color, Move, Position};
use crate::search::{Score, SearchParams, Searcher};

/// What a game driver needs from a computer player.
pub trait Bot {
    fn choose_move(&mut self, position: &Position, side: Color) -> Option<Move>;

    /// Root score of the last search; diagnostic only.
    fn prev_eval(&self) -> Score;
}

pub struct MinimaxBot {
    searcher: Searcher,
    params: SearchParams,
    prev_eval: Score,
}

impl Default for MinimaxBot {
    fn default() -> Self { Self::new(SearchParams::default()) }
}

impl MinimaxBot {
    pub fn new(params: SearchParams) -> Self { Self::with_searcher(Searcher::default(), params) }

    pub fn with_searcher(searcher: Searcher, params: SearchParams) -> Self {
        Self { searcher, params, prev_eval: 0 }
    }

    /// Builds a bot from a JSON `SearchParams` object; missing fields keep their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let params: SearchParams = serde_json::from_str(json)?;
        Ok(Self::new(params))
    }

    pub fn params(&self) -> &SearchParams { &self.params }
    pub fn set_depth(&mut self, depth: u32) { self.params.depth = depth; }
}

impl Bot for MinimaxBot {
    fn choose_move(&mut self, position: &Position, side: Color) -> Option<Move> {
        let res = self.searcher.search_with_params(position, side, self.params);
        self.prev_eval = res.score;
        match res.best_move {
            Some(mv) => info!("{side:?} plays {mv} (score {}, depth {}, {} nodes)", res.score, res.depth, res.nodes),
            None => info!("{side:?} has no legal move (score {})", res.score),
        }
        res.best_move
    }

    fn prev_eval(&self) -> Score { self.prev_eval }
}
