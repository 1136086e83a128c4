pub mod alphabeta;
pub mod eval;
pub mod ordering;
pub mod see;

pub use alphabeta::{QuiescenceMode, SearchParams, SearchResult, Searcher};
pub use eval::{Evaluator, MaterialEvaluator, Score};
pub use ordering::{CaptureFirstSorter, GenerationOrder, MoveSorter};
