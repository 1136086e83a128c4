pub mod fen;
pub mod hash;
pub mod history;
pub mod movegen;
pub mod moves;
pub mod piece;
pub mod position;
pub mod types;

pub use history::{History, HistoryEntry};
pub use movegen::Movement;
pub use moves::{Move, MoveKind};
pub use piece::{Piece, PieceKind};
pub use position::{ApplyMode, DrawReason, GameResult, Position, START_FEN};
pub use types::{Color, Square};
