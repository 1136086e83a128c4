// Rule-correct move generation plus minimax/alpha-beta search
pub mod board;
pub mod bot;
pub mod error;
pub mod perft;
pub mod search;

pub use board::{Color, GameResult, Move, Position, Square};
pub use bot::{Bot, MinimaxBot};
pub use error::{PositionError, PositionResult};
