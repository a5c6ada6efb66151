//! Static position evaluation.
//!
//! Deliberately small: material balance, a bonus for pawns holding the
//! four center squares, and a mobility term. Scores are in centipawns
//! from the perspective of the side to move, which is what the negamax
//! search expects.

use crate::game::GameState;
use crate::move_generator::MoveGenerator;
use crate::types::{Color, PieceKind, Square};

/// Weight per pseudo-legal move of difference in mobility.
const MOBILITY_WEIGHT: i32 = 10;

/// Bonus for a pawn occupying d4, e4, d5 or e5.
const CENTER_PAWN_BONUS: i32 = 15;

/// Material value of a piece kind in centipawns. The king carries no
/// material value; losing it is expressed through mate scores instead.
#[inline]
pub fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 0,
    }
}

fn center_squares() -> [Square; 4] {
    [
        Square::new(3, 3), // d4
        Square::new(4, 3), // e4
        Square::new(3, 4), // d5
        Square::new(4, 4), // e5
    ]
}

/// Pseudo-legal move count for a color. Pseudo-legal rather than legal
/// on purpose: the legality filter would multiply the cost of every
/// leaf evaluation for a term that only needs to be roughly right.
fn mobility(state: &GameState, color: Color) -> i32 {
    let generator = MoveGenerator::new();
    state
        .board
        .pieces(color)
        .map(|(from, _)| generator.pseudo_legal_moves(state, from).len() as i32)
        .sum()
}

/// Score the position for the side to move.
pub fn evaluate(state: &GameState) -> i32 {
    let mut score = 0;

    for (square, piece) in state.board.pieces(Color::White) {
        score += piece_value(piece.kind);
        if piece.kind == PieceKind::Pawn && center_squares().contains(&square) {
            score += CENTER_PAWN_BONUS;
        }
    }
    for (square, piece) in state.board.pieces(Color::Black) {
        score -= piece_value(piece.kind);
        if piece.kind == PieceKind::Pawn && center_squares().contains(&square) {
            score -= CENTER_PAWN_BONUS;
        }
    }

    score += MOBILITY_WEIGHT * (mobility(state, Color::White) - mobility(state, Color::Black));

    match state.side_to_move {
        Color::White => score,
        Color::Black => -score,
    }
}
