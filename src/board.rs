//! Board representation: the 64-cell piece mapping and the `Move` value.
//!
//! `Board` is pure data manipulation with no rule knowledge; callers are
//! responsible for keeping it consistent. Rule semantics live in the game
//! state machine and the move generator.

use std::fmt;

use crate::errors::EngineError;
use crate::types::{Color, Piece, PieceKind, Square};

/// What kind of transition a move is. Set by the move generator; the
/// apply/undo machinery trusts these flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveFlag {
    Normal,
    Capture,
    EnPassant,
    CastleKingside,
    CastleQueenside,
    DoublePawnPush,
}

/// A proposed or applied transition. Does not own any board state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
    pub flag: MoveFlag,
}

impl Move {
    #[inline]
    pub fn new(from: Square, to: Square, flag: MoveFlag) -> Move {
        Move { from, to, promotion: None, flag }
    }

    #[inline]
    pub fn promoting(from: Square, to: Square, kind: PieceKind, flag: MoveFlag) -> Move {
        Move { from, to, promotion: Some(kind), flag }
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        matches!(self.flag, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }
}

impl fmt::Display for Move {
    /// Coordinate notation: "e2e4", "e7e8q".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            if let Some(c) = kind.promotion_char() {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

/// Mapping from squares to pieces: 64 cells, at most one piece per cell.
/// Owned exclusively by its `GameState`; mutated in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Piece>; 64],
}

impl Board {
    /// A board with no pieces on it.
    pub fn empty() -> Board {
        Board { cells: [None; 64] }
    }

    /// Put a piece on a square, replacing whatever was there.
    #[inline]
    pub fn place(&mut self, square: Square, piece: Piece) {
        self.cells[square.index()] = Some(piece);
    }

    /// Clear a square, returning the piece that occupied it.
    #[inline]
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        self.cells[square.index()].take()
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells[square.index()]
    }

    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.cells[square.index()].is_none()
    }

    /// Locate the king of a color. Exactly one king per color must exist
    /// during play, so a miss is a fatal invariant violation.
    pub fn find_king(&self, color: Color) -> Result<Square, EngineError> {
        let king = Piece::new(color, PieceKind::King);
        Square::all()
            .find(|&sq| self.piece_at(sq) == Some(king))
            .ok_or(EngineError::InvariantViolation("no king on the board for one side"))
    }

    /// All occupied squares of a color, ascending square order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.piece_at(sq) {
            Some(piece) if piece.color == color => Some((sq, piece)),
            _ => None,
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  +---+---+---+---+---+---+---+---+")?;
        for rank in (0..8).rev() {
            write!(f, "{} |", rank + 1)?;
            for file in 0..8 {
                match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => write!(f, " {} |", piece.to_fen_char())?,
                    None => write!(f, "   |")?,
                }
            }
            writeln!(f)?;
            writeln!(f, "  +---+---+---+---+---+---+---+---+")?;
        }
        write!(f, "    a   b   c   d   e   f   g   h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_remove_round_trip() {
        let mut board = Board::empty();
        let e4 = Square::from_algebraic("e4").unwrap();
        let knight = Piece::new(Color::White, PieceKind::Knight);

        assert!(board.is_empty(e4));
        board.place(e4, knight);
        assert_eq!(board.piece_at(e4), Some(knight));
        assert!(!board.is_empty(e4));
        assert_eq!(board.remove(e4), Some(knight));
        assert!(board.is_empty(e4));
        assert_eq!(board.remove(e4), None);
    }

    #[test]
    fn find_king_reports_missing_king() {
        let mut board = Board::empty();
        let e1 = Square::from_algebraic("e1").unwrap();
        board.place(e1, Piece::new(Color::White, PieceKind::King));

        assert_eq!(board.find_king(Color::White), Ok(e1));
        assert!(matches!(
            board.find_king(Color::Black),
            Err(EngineError::InvariantViolation(_))
        ));
    }

    #[test]
    fn move_display_uses_coordinate_notation() {
        let e2 = Square::from_algebraic("e2").unwrap();
        let e4 = Square::from_algebraic("e4").unwrap();
        assert_eq!(Move::new(e2, e4, MoveFlag::DoublePawnPush).to_string(), "e2e4");

        let e7 = Square::from_algebraic("e7").unwrap();
        let e8 = Square::from_algebraic("e8").unwrap();
        let promo = Move::promoting(e7, e8, PieceKind::Queen, MoveFlag::Normal);
        assert_eq!(promo.to_string(), "e7e8q");
    }
}
