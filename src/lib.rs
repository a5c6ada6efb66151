//! parlor_chess - a chess rule engine with a built-in opponent.
//!
//! The crate owns the rules, not the pixels: it tracks complete game
//! state, generates fully legal moves (castling, en passant, promotion),
//! reports check, checkmate, stalemate and fifty-move draws, and picks
//! opponent moves with a deterministic fixed-depth negamax search. A
//! front end drives it through [`game::Game`] and renders whatever it
//! likes; the engine never prints or reads on its own.

pub mod board;
pub mod errors;
pub mod evaluation;
pub mod game;
pub mod move_generator;
pub mod search;
pub mod types;
pub mod worker;

pub use board::{Board, Move, MoveFlag};
pub use errors::EngineError;
pub use game::{Game, GameState, GameStatus};
pub use search::SearchConfig;
pub use types::{CastlingRights, Color, Piece, PieceKind, Square};
