//! Game state machine: turn sequencing, move application and undo, and
//! game status detection (check, checkmate, stalemate, fifty-move draw).
//!
//! `GameState` is the single owner of a `Board` plus all bookkeeping that
//! move semantics depend on. Moves are applied through `apply_move`, which
//! validates against the legal set and never mutates on failure. The
//! make/unmake pair underneath it is what the search and the legality
//! filter use.

use crate::board::{Board, Move, MoveFlag};
use crate::errors::EngineError;
use crate::move_generator::MoveGenerator;
use crate::search::{SearchConfig, SearchEngine};
use crate::types::{CastlingRights, Color, Piece, PieceKind, Square};

/// Standard initial position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Status of the side to move, reported after every state change so the
/// presentation layer needs no chess-rule knowledge of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Check,
    Checkmate,
    Stalemate,
    Draw,
}

impl GameStatus {
    #[inline]
    pub fn is_game_over(self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate | GameStatus::Draw)
    }
}

/// Everything needed to reverse one applied move exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Undo {
    mv: Move,
    moved: Piece,
    captured: Option<Piece>,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
}

/// Complete game position: board, side to move, castling rights,
/// en-passant target and clocks, plus the reversible-move log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    /// Set only on the move immediately following a double pawn push.
    pub en_passant: Option<Square>,
    /// Plies since the last capture or pawn move (fifty-move rule).
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
    undo_stack: Vec<Undo>,
}

impl GameState {
    /// Standard initial position.
    pub fn new() -> GameState {
        GameState::from_fen(STARTING_FEN).expect("starting FEN always parses")
    }

    /// Reset in place for a new game.
    pub fn reset(&mut self) {
        *self = GameState::new();
    }

    /// Parse a FEN string. Missing trailing fields get sensible defaults,
    /// mirroring how lenient GUIs emit FEN.
    pub fn from_fen(fen: &str) -> Option<GameState> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        let placement = parts.first()?;

        let mut board = Board::empty();
        let mut rank = 7u8;
        let mut file = 0u8;
        for c in placement.chars() {
            if c == '/' {
                if rank == 0 {
                    return None;
                }
                rank -= 1;
                file = 0;
            } else if let Some(skip) = c.to_digit(10) {
                file = file.checked_add(skip as u8)?;
                if file > 8 {
                    return None;
                }
            } else {
                let piece = Piece::from_fen_char(c)?;
                if file > 7 {
                    return None;
                }
                board.place(Square::new(file, rank), piece);
                file += 1;
            }
        }

        let side_to_move = match parts.get(1) {
            Some(&"b") => Color::Black,
            _ => Color::White,
        };

        let mut castling = CastlingRights::none();
        if let Some(rights) = parts.get(2) {
            for c in rights.chars() {
                match c {
                    'K' => castling.white_kingside = true,
                    'Q' => castling.white_queenside = true,
                    'k' => castling.black_kingside = true,
                    'q' => castling.black_queenside = true,
                    '-' => {}
                    _ => return None,
                }
            }
        }

        let en_passant = match parts.get(3) {
            Some(&"-") | None => None,
            Some(s) => Some(Square::from_algebraic(s)?),
        };

        let halfmove_clock = parts.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
        let fullmove_number = parts.get(5).and_then(|s| s.parse().ok()).unwrap_or(1);

        Some(GameState {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            undo_stack: Vec::new(),
        })
    }

    /// Emit the position as FEN.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut empty_run = 0;
            for file in 0..8 {
                match self.board.piece_at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_run > 0 {
                            fen.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                fen.push_str(&empty_run.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castling == CastlingRights::none() {
            fen.push('-');
        } else {
            if self.castling.white_kingside {
                fen.push('K');
            }
            if self.castling.white_queenside {
                fen.push('Q');
            }
            if self.castling.black_kingside {
                fen.push('k');
            }
            if self.castling.black_queenside {
                fen.push('q');
            }
        }

        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_string()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }

    /// Validate and apply a proposed move, then report the new status.
    ///
    /// The move is matched against the generated legal set on (from, to,
    /// promotion); a missing promotion kind defaults to Queen. The matched
    /// generated move is the one applied, so flags are always
    /// authoritative even if the caller filled them in wrong. An illegal
    /// move fails with `IllegalMove` and leaves the state untouched.
    pub fn apply_move(&mut self, mv: Move) -> Result<GameStatus, EngineError> {
        match self.board.piece_at(mv.from) {
            Some(piece) if piece.color == self.side_to_move => {}
            _ => return Err(EngineError::IllegalMove(mv)),
        }

        let generator = MoveGenerator::new();
        let legal = generator.legal_moves(self, mv.from);
        let chosen = legal.iter().copied().find(|candidate| {
            candidate.to == mv.to
                && match (mv.promotion, candidate.promotion) {
                    (Some(requested), Some(generated)) => requested == generated,
                    (None, Some(generated)) => generated == PieceKind::Queen,
                    (None, None) => true,
                    (Some(_), None) => false,
                }
        });

        match chosen {
            Some(legal_move) => {
                self.make_move(legal_move);
                Ok(self.status())
            }
            None => Err(EngineError::IllegalMove(mv)),
        }
    }

    /// Status of the side to move.
    pub fn status(&self) -> GameStatus {
        let generator = MoveGenerator::new();
        let side = self.side_to_move;
        let in_check = generator.is_in_check(self, side);

        if generator.all_legal_moves(self, side).is_empty() {
            return if in_check { GameStatus::Checkmate } else { GameStatus::Stalemate };
        }
        if self.halfmove_clock >= 100 {
            return GameStatus::Draw;
        }
        if in_check {
            GameStatus::Check
        } else {
            GameStatus::InProgress
        }
    }

    /// Apply a move without validation. The move must come from the
    /// generator; rule bookkeeping (rook relocation, en-passant removal,
    /// promotion substitution, rights, clocks) happens here.
    pub(crate) fn make_move(&mut self, mv: Move) {
        let moved = self
            .board
            .remove(mv.from)
            .expect("make_move called with an empty origin square");
        let captured = match mv.flag {
            // The captured pawn sits beside the mover, not on the target.
            MoveFlag::EnPassant => self.board.remove(Square::new(mv.to.file(), mv.from.rank())),
            _ => self.board.remove(mv.to),
        };

        self.undo_stack.push(Undo {
            mv,
            moved,
            captured,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        });

        if moved.kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        match mv.flag {
            MoveFlag::CastleKingside => {
                let rank = moved.color.home_rank();
                if let Some(rook) = self.board.remove(Square::new(7, rank)) {
                    self.board.place(Square::new(5, rank), rook);
                }
            }
            MoveFlag::CastleQueenside => {
                let rank = moved.color.home_rank();
                if let Some(rook) = self.board.remove(Square::new(0, rank)) {
                    self.board.place(Square::new(3, rank), rook);
                }
            }
            _ => {}
        }

        let placed = match mv.promotion {
            Some(kind) => Piece::new(moved.color, kind),
            None => moved,
        };
        self.board.place(mv.to, placed);

        // Rights die the instant the king or a rook moves, or a rook is
        // captured on its home corner, castle or not.
        if moved.kind == PieceKind::King {
            self.castling.revoke_all(moved.color);
        }
        let corners = [
            (Square::new(0, 0), Color::White, false),
            (Square::new(7, 0), Color::White, true),
            (Square::new(0, 7), Color::Black, false),
            (Square::new(7, 7), Color::Black, true),
        ];
        for (corner, color, kingside) in corners {
            if mv.from == corner || mv.to == corner {
                match (color, kingside) {
                    (Color::White, true) => self.castling.white_kingside = false,
                    (Color::White, false) => self.castling.white_queenside = false,
                    (Color::Black, true) => self.castling.black_kingside = false,
                    (Color::Black, false) => self.castling.black_queenside = false,
                }
            }
        }

        self.en_passant = match mv.flag {
            MoveFlag::DoublePawnPush => mv.from.offset(0, moved.color.pawn_direction()),
            _ => None,
        };

        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = self.side_to_move.opponent();
    }

    /// Reverse the last applied move, restoring the prior state exactly.
    /// Returns false when there is nothing to undo.
    pub fn undo_move(&mut self) -> bool {
        let Some(undo) = self.undo_stack.pop() else {
            return false;
        };
        let mv = undo.mv;

        self.board.remove(mv.to);
        self.board.place(mv.from, undo.moved);

        match mv.flag {
            MoveFlag::EnPassant => {
                if let Some(pawn) = undo.captured {
                    self.board.place(Square::new(mv.to.file(), mv.from.rank()), pawn);
                }
            }
            MoveFlag::CastleKingside => {
                let rank = undo.moved.color.home_rank();
                if let Some(rook) = self.board.remove(Square::new(5, rank)) {
                    self.board.place(Square::new(7, rank), rook);
                }
            }
            MoveFlag::CastleQueenside => {
                let rank = undo.moved.color.home_rank();
                if let Some(rook) = self.board.remove(Square::new(3, rank)) {
                    self.board.place(Square::new(0, rank), rook);
                }
            }
            _ => {
                if let Some(captured) = undo.captured {
                    self.board.place(mv.to, captured);
                }
            }
        }

        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.side_to_move = self.side_to_move.opponent();
        true
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

/// Facade the presentation layer talks to: legal moves for highlighting,
/// validated human moves, computer replies, and full state snapshots.
/// One instance per game; no global state anywhere.
pub struct Game {
    state: GameState,
    generator: MoveGenerator,
    engine: SearchEngine,
}

impl Game {
    pub fn new() -> Game {
        Game::with_config(SearchConfig::default())
    }

    pub fn with_config(config: SearchConfig) -> Game {
        Game {
            state: GameState::new(),
            generator: MoveGenerator::new(),
            engine: SearchEngine::new(config),
        }
    }

    /// Legal moves from one square, for move highlighting.
    pub fn legal_moves(&self, from: Square) -> Vec<Move> {
        self.generator.legal_moves(&self.state, from)
    }

    /// Apply a human-intended move.
    pub fn make_move(&mut self, mv: Move) -> Result<GameStatus, EngineError> {
        self.state.apply_move(mv)
    }

    /// Ask the opponent engine for a move without applying it.
    pub fn request_computer_move(&mut self, color: Color) -> Result<Move, EngineError> {
        self.engine.select_move(&self.state, color)
    }

    /// Ask the opponent engine for a move and apply it.
    pub fn play_computer_move(&mut self, color: Color) -> Result<(Move, GameStatus), EngineError> {
        let mv = self.engine.select_move(&self.state, color)?;
        let status = self.state.apply_move(mv)?;
        Ok((mv, status))
    }

    /// Board snapshot for rendering.
    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn side_to_move(&self) -> Color {
        self.state.side_to_move
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Take back one ply. The console front end calls this twice so the
    /// human keeps the move after the computer has replied.
    pub fn undo(&mut self) -> bool {
        self.state.undo_move()
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}
