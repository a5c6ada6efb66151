//! Legal move generation, including the special moves (castling,
//! en passant, pawn promotion) and square-attack queries.
//!
//! Generation is two-phase: per-piece movement templates produce
//! pseudo-legal moves, then a king-safety filter simulates each move on a
//! scratch copy and discards any that leave the mover's own king attacked.

use crate::board::{Move, MoveFlag};
use crate::errors::EngineError;
use crate::game::GameState;
use crate::types::{Color, Piece, PieceKind, Square};

/// (file, rank) deltas for the fixed-offset and sliding pieces.
const KNIGHT_OFFSETS: [(i8, i8); 8] =
    [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KING_DIRECTIONS: [(i8, i8); 8] =
    [(0, 1), (0, -1), (1, 0), (-1, 0), (1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Promotion choices in generation order; Queen first so it is also the
/// default when a collaborator omits the kind.
const PROMOTION_KINDS: [PieceKind; 4] =
    [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight];

/// Move generator for chess positions. Stateless; cheap to create.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> MoveGenerator {
        MoveGenerator
    }

    /// Movement-template moves for the piece on `from`, ignoring whether
    /// the mover's own king ends up attacked. Empty if the square is.
    pub fn pseudo_legal_moves(&self, state: &GameState, from: Square) -> Vec<Move> {
        let Some(piece) = state.board.piece_at(from) else {
            return Vec::new();
        };

        let mut moves = Vec::new();
        match piece.kind {
            PieceKind::Pawn => self.pawn_moves(state, from, piece.color, &mut moves),
            PieceKind::Knight => {
                self.offset_moves(state, from, piece.color, &KNIGHT_OFFSETS, &mut moves)
            }
            PieceKind::Bishop => {
                self.sliding_moves(state, from, piece.color, &BISHOP_DIRECTIONS, &mut moves)
            }
            PieceKind::Rook => {
                self.sliding_moves(state, from, piece.color, &ROOK_DIRECTIONS, &mut moves)
            }
            PieceKind::Queen => {
                self.sliding_moves(state, from, piece.color, &BISHOP_DIRECTIONS, &mut moves);
                self.sliding_moves(state, from, piece.color, &ROOK_DIRECTIONS, &mut moves);
            }
            PieceKind::King => {
                self.offset_moves(state, from, piece.color, &KING_DIRECTIONS, &mut moves);
                self.castling_moves(state, from, piece.color, &mut moves);
            }
        }
        moves
    }

    /// Pseudo-legal moves filtered for king safety.
    pub fn legal_moves(&self, state: &GameState, from: Square) -> Vec<Move> {
        let Some(piece) = state.board.piece_at(from) else {
            return Vec::new();
        };
        self.pseudo_legal_moves(state, from)
            .into_iter()
            .filter(|&mv| !self.leaves_king_exposed(state, mv, piece.color))
            .collect()
    }

    /// Every legal move for a color, in ascending square order and then
    /// per-square generation order. The ordering is deterministic on
    /// purpose: checkmate detection and the opponent engine both depend
    /// on a reproducible iteration.
    pub fn all_legal_moves(&self, state: &GameState, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        for (from, _) in state.board.pieces(color) {
            moves.extend(self.legal_moves(state, from));
        }
        moves
    }

    /// Whether `by` attacks `square`. Probes outward from the target
    /// square (pawn, knight, king offsets plus sliding walks), so pawn
    /// attacks on empty squares are seen, which the castling-path rule
    /// needs. No castling is considered, so there is no recursion.
    pub fn is_square_attacked(&self, state: &GameState, square: Square, by: Color) -> bool {
        // A pawn attacks diagonally forward, so probe diagonally backward.
        let dir = by.pawn_direction();
        for file_delta in [-1, 1] {
            if let Some(origin) = square.offset(file_delta, -dir) {
                if state.board.piece_at(origin) == Some(Piece::new(by, PieceKind::Pawn)) {
                    return true;
                }
            }
        }

        for (file_delta, rank_delta) in KNIGHT_OFFSETS {
            if let Some(origin) = square.offset(file_delta, rank_delta) {
                if state.board.piece_at(origin) == Some(Piece::new(by, PieceKind::Knight)) {
                    return true;
                }
            }
        }

        for (file_delta, rank_delta) in KING_DIRECTIONS {
            if let Some(origin) = square.offset(file_delta, rank_delta) {
                if state.board.piece_at(origin) == Some(Piece::new(by, PieceKind::King)) {
                    return true;
                }
            }
        }

        self.sliding_attack(state, square, by, &ROOK_DIRECTIONS, PieceKind::Rook)
            || self.sliding_attack(state, square, by, &BISHOP_DIRECTIONS, PieceKind::Bishop)
    }

    /// Whether `color`'s king is currently attacked.
    pub fn is_in_check(&self, state: &GameState, color: Color) -> bool {
        match state.board.find_king(color) {
            Ok(king) => self.is_square_attacked(state, king, color.opponent()),
            Err(_) => false,
        }
    }

    /// Count leaf nodes of the legal move tree; movegen correctness check.
    pub fn perft(&self, state: &mut GameState, depth: u8) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.all_legal_moves(state, state.side_to_move);
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for mv in moves {
            state.make_move(mv);
            nodes += self.perft(state, depth - 1);
            state.undo_move();
        }
        nodes
    }

    /// Simulate `mv` on a scratch copy and see if `color`'s king is left
    /// attacked. A missing king counts as exposed.
    fn leaves_king_exposed(&self, state: &GameState, mv: Move, color: Color) -> bool {
        let mut scratch = state.clone();
        scratch.make_move(mv);
        match scratch.board.find_king(color) {
            Ok(king) => self.is_square_attacked(&scratch, king, color.opponent()),
            Err(_) => true,
        }
    }

    fn pawn_moves(&self, state: &GameState, from: Square, color: Color, moves: &mut Vec<Move>) {
        let dir = color.pawn_direction();
        let start_rank = match color {
            Color::White => 1,
            Color::Black => 6,
        };
        let promotion_rank = match color {
            Color::White => 7,
            Color::Black => 0,
        };

        // Single push, and double push only from the start rank with both
        // target cells empty.
        if let Some(one) = from.offset(0, dir) {
            if state.board.is_empty(one) {
                self.push_pawn_move(from, one, MoveFlag::Normal, promotion_rank, moves);
                if from.rank() == start_rank {
                    if let Some(two) = from.offset(0, 2 * dir) {
                        if state.board.is_empty(two) {
                            moves.push(Move::new(from, two, MoveFlag::DoublePawnPush));
                        }
                    }
                }
            }
        }

        // Diagonal captures, including the en-passant target.
        for file_delta in [-1, 1] {
            let Some(target) = from.offset(file_delta, dir) else {
                continue;
            };
            match state.board.piece_at(target) {
                Some(occupant) if occupant.color != color => {
                    self.push_pawn_move(from, target, MoveFlag::Capture, promotion_rank, moves);
                }
                None if state.en_passant == Some(target) => {
                    moves.push(Move::new(from, target, MoveFlag::EnPassant));
                }
                _ => {}
            }
        }
    }

    /// Push a pawn move, fanning out into the four promotion choices on
    /// the last rank.
    fn push_pawn_move(
        &self,
        from: Square,
        to: Square,
        flag: MoveFlag,
        promotion_rank: u8,
        moves: &mut Vec<Move>,
    ) {
        if to.rank() == promotion_rank {
            for kind in PROMOTION_KINDS {
                moves.push(Move::promoting(from, to, kind, flag));
            }
        } else {
            moves.push(Move::new(from, to, flag));
        }
    }

    /// Fixed-offset movement for knights and the king's normal steps.
    fn offset_moves(
        &self,
        state: &GameState,
        from: Square,
        color: Color,
        offsets: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(file_delta, rank_delta) in offsets {
            let Some(target) = from.offset(file_delta, rank_delta) else {
                continue;
            };
            match state.board.piece_at(target) {
                None => moves.push(Move::new(from, target, MoveFlag::Normal)),
                Some(occupant) if occupant.color != color => {
                    moves.push(Move::new(from, target, MoveFlag::Capture));
                }
                Some(_) => {}
            }
        }
    }

    /// Walk each direction until blocked: capture an opponent and stop,
    /// stop short of an own piece.
    fn sliding_moves(
        &self,
        state: &GameState,
        from: Square,
        color: Color,
        directions: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(file_delta, rank_delta) in directions {
            let mut current = from;
            while let Some(target) = current.offset(file_delta, rank_delta) {
                match state.board.piece_at(target) {
                    None => {
                        moves.push(Move::new(from, target, MoveFlag::Normal));
                        current = target;
                    }
                    Some(occupant) => {
                        if occupant.color != color {
                            moves.push(Move::new(from, target, MoveFlag::Capture));
                        }
                        break;
                    }
                }
            }
        }
    }

    /// Castling: rights intact, the squares between king and rook empty,
    /// the king neither in check nor passing through or landing on an
    /// attacked square.
    fn castling_moves(&self, state: &GameState, from: Square, color: Color, moves: &mut Vec<Move>) {
        let rank = color.home_rank();
        if from != Square::new(4, rank) {
            return;
        }
        let enemy = color.opponent();
        if self.is_square_attacked(state, from, enemy) {
            return;
        }

        if state.castling.allows(color, true)
            && state.board.is_empty(Square::new(5, rank))
            && state.board.is_empty(Square::new(6, rank))
            && !self.is_square_attacked(state, Square::new(5, rank), enemy)
            && !self.is_square_attacked(state, Square::new(6, rank), enemy)
        {
            moves.push(Move::new(from, Square::new(6, rank), MoveFlag::CastleKingside));
        }

        if state.castling.allows(color, false)
            && state.board.is_empty(Square::new(1, rank))
            && state.board.is_empty(Square::new(2, rank))
            && state.board.is_empty(Square::new(3, rank))
            && !self.is_square_attacked(state, Square::new(2, rank), enemy)
            && !self.is_square_attacked(state, Square::new(3, rank), enemy)
        {
            moves.push(Move::new(from, Square::new(2, rank), MoveFlag::CastleQueenside));
        }
    }

    fn sliding_attack(
        &self,
        state: &GameState,
        square: Square,
        by: Color,
        directions: &[(i8, i8)],
        kind: PieceKind,
    ) -> bool {
        for &(file_delta, rank_delta) in directions {
            let mut current = square;
            while let Some(next) = current.offset(file_delta, rank_delta) {
                match state.board.piece_at(next) {
                    None => current = next,
                    Some(occupant) => {
                        if occupant.color == by
                            && (occupant.kind == kind || occupant.kind == PieceKind::Queen)
                        {
                            return true;
                        }
                        break;
                    }
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::MoveFlag;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn play(state: &mut GameState, text: &str) {
        let mv = Move {
            from: sq(&text[0..2]),
            to: sq(&text[2..4]),
            promotion: text.chars().nth(4).and_then(PieceKind::from_promotion_char),
            flag: MoveFlag::Normal,
        };
        state.apply_move(mv).unwrap_or_else(|e| panic!("{text} rejected: {e}"));
    }

    #[test]
    fn twenty_legal_moves_from_the_initial_position() {
        let state = GameState::new();
        let generator = MoveGenerator::new();
        assert_eq!(generator.all_legal_moves(&state, Color::White).len(), 20);
        assert_eq!(generator.all_legal_moves(&state, Color::Black).len(), 20);
    }

    #[test]
    fn perft_matches_known_node_counts() {
        let mut state = GameState::new();
        let generator = MoveGenerator::new();
        assert_eq!(generator.perft(&mut state, 1), 20);
        assert_eq!(generator.perft(&mut state, 2), 400);
        assert_eq!(generator.perft(&mut state, 3), 8_902);
        // Perft leaves the state untouched.
        assert_eq!(state, GameState::new());
    }

    #[test]
    fn legal_moves_never_leave_own_king_attacked() {
        let generator = MoveGenerator::new();
        let positions = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "4k3/8/8/4r3/8/8/4R3/4K3 b - - 0 1",
            "r3k2r/8/8/8/8/8/4q3/R3K2R w KQkq - 0 1",
            "4R1k1/5pp1/7p/8/8/8/8/6K1 b - - 0 1",
        ];
        for fen in positions {
            let state = GameState::from_fen(fen).unwrap();
            let side = state.side_to_move;
            for mv in generator.all_legal_moves(&state, side) {
                let mut scratch = state.clone();
                scratch.make_move(mv);
                let king = scratch.board.find_king(side).unwrap();
                assert!(
                    !generator.is_square_attacked(&scratch, king, side.opponent()),
                    "{fen}: {mv} leaves the king attacked"
                );
            }
        }
    }

    #[test]
    fn pinned_rook_may_only_slide_along_the_pin() {
        // Black rook on e5 is pinned against its king by the e2 rook.
        let state = GameState::from_fen("4k3/8/8/4r3/8/8/4R3/4K3 b - - 0 1").unwrap();
        let generator = MoveGenerator::new();
        let moves = generator.legal_moves(&state, sq("e5"));
        assert!(!moves.is_empty());
        for mv in &moves {
            assert_eq!(mv.to.file(), sq("e5").file(), "{mv} breaks the pin");
        }
    }

    #[test]
    fn pawn_pushes_respect_blockers() {
        // Single push open, double push blocked by the e4 pawn.
        let state = GameState::from_fen("7k/8/8/8/4p3/8/4P3/4K3 w - - 0 1").unwrap();
        let generator = MoveGenerator::new();
        let targets: Vec<Square> =
            generator.legal_moves(&state, sq("e2")).iter().map(|m| m.to).collect();
        assert_eq!(targets, vec![sq("e3")]);

        // Fully blocked: no pushes at all.
        let state = GameState::from_fen("7k/8/8/8/8/4p3/4P3/4K3 w - - 0 1").unwrap();
        assert!(generator.legal_moves(&state, sq("e2")).is_empty());
    }

    #[test]
    fn en_passant_window_lasts_exactly_one_ply() {
        let generator = MoveGenerator::new();
        let mut state = GameState::new();
        play(&mut state, "e2e4");
        play(&mut state, "a7a6");
        play(&mut state, "e4e5");
        play(&mut state, "d7d5");

        // Immediately after the double push the capture is available.
        assert_eq!(state.en_passant, Some(sq("d6")));
        let ep: Vec<Move> = generator
            .legal_moves(&state, sq("e5"))
            .into_iter()
            .filter(|m| m.flag == MoveFlag::EnPassant)
            .collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].to, sq("d6"));

        // One ply later it is gone.
        play(&mut state, "h2h3");
        play(&mut state, "a6a5");
        assert_eq!(state.en_passant, None);
        assert!(generator
            .legal_moves(&state, sq("e5"))
            .iter()
            .all(|m| m.flag != MoveFlag::EnPassant));
    }

    #[test]
    fn castling_is_blocked_through_attacked_squares() {
        // Black rook on f3 covers f1: kingside is out, queenside stays in.
        let state = GameState::from_fen("r3k2r/8/8/8/8/5r2/8/R3K2R w KQkq - 0 1").unwrap();
        let generator = MoveGenerator::new();
        let flags: Vec<MoveFlag> =
            generator.legal_moves(&state, sq("e1")).iter().map(|m| m.flag).collect();
        assert!(!flags.contains(&MoveFlag::CastleKingside));
        assert!(flags.contains(&MoveFlag::CastleQueenside));
    }

    #[test]
    fn no_castling_while_in_check() {
        let state = GameState::from_fen("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1").unwrap();
        let generator = MoveGenerator::new();
        assert!(generator
            .legal_moves(&state, sq("e1"))
            .iter()
            .all(|m| !m.is_castle()));
    }

    #[test]
    fn castling_is_gone_forever_once_the_king_has_moved() {
        let mut state = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let generator = MoveGenerator::new();
        assert_eq!(
            generator
                .legal_moves(&state, sq("e1"))
                .iter()
                .filter(|m| m.is_castle())
                .count(),
            2
        );

        // King steps out and back; the rights never return.
        play(&mut state, "e1e2");
        play(&mut state, "h8g8");
        play(&mut state, "e2e1");
        play(&mut state, "g8h8");
        assert!(generator
            .legal_moves(&state, sq("e1"))
            .iter()
            .all(|m| !m.is_castle()));
    }

    #[test]
    fn attack_probe_sees_pawns_attacking_empty_squares() {
        // A black pawn on d4 attacks the empty squares c3 and e3.
        let state = GameState::from_fen("4k3/8/8/8/3p4/8/8/4K3 w - - 0 1").unwrap();
        let generator = MoveGenerator::new();
        assert!(generator.is_square_attacked(&state, sq("c3"), Color::Black));
        assert!(generator.is_square_attacked(&state, sq("e3"), Color::Black));
        assert!(!generator.is_square_attacked(&state, sq("d3"), Color::Black));
    }

    #[test]
    fn promotion_moves_fan_out_into_four_kinds() {
        let state = GameState::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let generator = MoveGenerator::new();
        let moves = generator.legal_moves(&state, sq("a7"));
        assert_eq!(moves.len(), 4);
        assert_eq!(moves[0].promotion, Some(PieceKind::Queen));
        assert!(moves.iter().all(|m| m.to == sq("a8")));
    }
}
