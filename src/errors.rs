//! Error taxonomy for the engine.
//!
//! All failures are explicit result values; nothing is swallowed or
//! auto-corrected into a best-guess move.

use thiserror::Error;

use crate::board::Move;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// The proposed move is not in the legal set for its origin square.
    /// Recoverable: the game state is left untouched.
    #[error("illegal move {0}")]
    IllegalMove(Move),

    /// The board no longer satisfies a structural invariant (for example a
    /// missing king). Indicates a prior bug; the session should be aborted.
    #[error("board invariant violated: {0}")]
    InvariantViolation(&'static str),

    /// The opponent engine was asked for a move when the side has none.
    /// Caller error: check the game status first.
    #[error("no legal moves for the requested side")]
    NoLegalMoves,
}
