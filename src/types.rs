//! Core value types: colors, piece kinds, squares and castling rights.
//!
//! Everything here is a small `Copy` value with no rule knowledge of its
//! own; the move generator dispatches on these closed enums.

use std::fmt;

/// File and rank names for coordinate notation.
pub const FILE_NAMES: &[u8; 8] = b"abcdefgh";
pub const RANK_NAMES: &[u8; 8] = b"12345678";

/// Side to move / piece ownership.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank the color's back pieces start on (0 for White, 7 for Black).
    #[inline]
    pub fn home_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Direction this color's pawns advance along the rank axis.
    #[inline]
    pub fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// The six piece kinds, dispatched exhaustively by the move generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Parse a promotion suffix as used in coordinate notation ("e7e8q").
    pub fn from_promotion_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'q' => Some(PieceKind::Queen),
            'r' => Some(PieceKind::Rook),
            'b' => Some(PieceKind::Bishop),
            'n' => Some(PieceKind::Knight),
            _ => None,
        }
    }

    pub fn promotion_char(self) -> Option<char> {
        match self {
            PieceKind::Queen => Some('q'),
            PieceKind::Rook => Some('r'),
            PieceKind::Bishop => Some('b'),
            PieceKind::Knight => Some('n'),
            _ => None,
        }
    }
}

/// A colored piece occupying a board cell. Immutable value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub fn new(color: Color, kind: PieceKind) -> Piece {
        Piece { color, kind }
    }

    /// FEN letter for this piece (uppercase White, lowercase Black).
    pub fn to_fen_char(self) -> char {
        let c = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_fen_char(c: char) -> Option<Piece> {
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some(Piece::new(color, kind))
    }
}

/// A board coordinate. Both components are always in 0..=7; square a1 is
/// (file 0, rank 0) and h8 is (file 7, rank 7).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    #[inline]
    pub fn new(file: u8, rank: u8) -> Square {
        debug_assert!(file < 8 && rank < 8, "square off the board: {file},{rank}");
        Square { file, rank }
    }

    /// Square for a 0..64 index (0 = a1, 63 = h8).
    #[inline]
    pub fn from_index(index: usize) -> Square {
        debug_assert!(index < 64);
        Square::new((index % 8) as u8, (index / 8) as u8)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    #[inline]
    pub fn file(self) -> u8 {
        self.file
    }

    #[inline]
    pub fn rank(self) -> u8 {
        self.rank
    }

    /// Step by a (file, rank) delta, returning `None` off the board.
    #[inline]
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Square> {
        let file = self.file as i8 + file_delta;
        let rank = self.rank as i8 + rank_delta;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square::new(file as u8, rank as u8))
        } else {
            None
        }
    }

    /// All 64 squares in ascending index order (a1, b1, ..., h8).
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square::from_index)
    }

    /// Parse algebraic notation like "e4".
    pub fn from_algebraic(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file_c = chars.next()?;
        let rank_c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let file = match file_c {
            'a'..='h' => file_c as u8 - b'a',
            _ => return None,
        };
        let rank = match rank_c {
            '1'..='8' => rank_c as u8 - b'1',
            _ => return None,
        };
        Some(Square::new(file, rank))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            FILE_NAMES[self.file as usize] as char,
            RANK_NAMES[self.rank as usize] as char
        )
    }
}

/// The four independent castling permissions.
///
/// A flag is true while the corresponding king and rook have never moved
/// (and the rook has not been captured); it never comes back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub fn all() -> CastlingRights {
        CastlingRights {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    pub fn none() -> CastlingRights {
        CastlingRights {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    #[inline]
    pub fn allows(self, color: Color, kingside: bool) -> bool {
        match (color, kingside) {
            (Color::White, true) => self.white_kingside,
            (Color::White, false) => self.white_queenside,
            (Color::Black, true) => self.black_kingside,
            (Color::Black, false) => self.black_queenside,
        }
    }

    /// Drop both permissions for a color, used when its king moves.
    pub fn revoke_all(&mut self, color: Color) {
        match color {
            Color::White => {
                self.white_kingside = false;
                self.white_queenside = false;
            }
            Color::Black => {
                self.black_kingside = false;
                self.black_queenside = false;
            }
        }
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        CastlingRights::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_index_round_trip() {
        for index in 0..64 {
            assert_eq!(Square::from_index(index).index(), index);
        }
        assert_eq!(Square::new(0, 0).index(), 0);
        assert_eq!(Square::new(7, 7).index(), 63);
    }

    #[test]
    fn square_algebraic() {
        assert_eq!(Square::from_algebraic("a1"), Some(Square::new(0, 0)));
        assert_eq!(Square::from_algebraic("h8"), Some(Square::new(7, 7)));
        assert_eq!(Square::from_algebraic("e4").unwrap().to_string(), "e4");
        assert_eq!(Square::from_algebraic("i1"), None);
        assert_eq!(Square::from_algebraic("a9"), None);
        assert_eq!(Square::from_algebraic("e"), None);
        assert_eq!(Square::from_algebraic("e44"), None);
    }

    #[test]
    fn square_offset_stays_on_board() {
        let a1 = Square::new(0, 0);
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(a1.offset(0, -1), None);
        assert_eq!(a1.offset(1, 1), Some(Square::new(1, 1)));
        let h8 = Square::new(7, 7);
        assert_eq!(h8.offset(1, 0), None);
        assert_eq!(h8.offset(0, 1), None);
    }

    #[test]
    fn fen_piece_letters() {
        let p = Piece::from_fen_char('K').unwrap();
        assert_eq!(p, Piece::new(Color::White, PieceKind::King));
        assert_eq!(p.to_fen_char(), 'K');
        let p = Piece::from_fen_char('q').unwrap();
        assert_eq!(p, Piece::new(Color::Black, PieceKind::Queen));
        assert_eq!(p.to_fen_char(), 'q');
        assert_eq!(Piece::from_fen_char('x'), None);
    }

    #[test]
    fn castling_rights_revocation() {
        let mut rights = CastlingRights::all();
        rights.revoke_all(Color::White);
        assert!(!rights.allows(Color::White, true));
        assert!(!rights.allows(Color::White, false));
        assert!(rights.allows(Color::Black, true));
        assert!(rights.allows(Color::Black, false));
    }
}
