//! Opponent move selection: fixed-depth negamax with alpha-beta pruning.
//!
//! The search is deterministic. Moves are examined in the generator's
//! ascending square order with no reordering, and only a strictly better
//! score displaces the current best, so equal-scoring moves resolve to
//! the first one found. Mate scores are offset by ply so the engine
//! prefers the shortest mate and postpones being mated the longest.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::board::Move;
use crate::errors::EngineError;
use crate::evaluation::evaluate;
use crate::game::GameState;
use crate::move_generator::MoveGenerator;
use crate::types::Color;

/// Larger than any reachable score; the initial alpha-beta window.
pub const INFINITY: i32 = 1_000_000;
/// Base score for delivering checkmate, reduced by the ply it occurs at.
pub const MATE_SCORE: i32 = 100_000;

/// Search tuning knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Full-width search depth in plies. Clamped to at least 1.
    pub search_depth: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig { search_depth: 3 }
    }
}

/// One search instance. Reusable across moves of a game; holds no
/// position state of its own between calls.
pub struct SearchEngine {
    generator: MoveGenerator,
    config: SearchConfig,
    nodes_searched: u64,
    stop: Arc<AtomicBool>,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> SearchEngine {
        SearchEngine::with_stop(config, Arc::new(AtomicBool::new(false)))
    }

    /// Build an engine sharing an external stop flag, so a caller on
    /// another thread can abandon the search early.
    pub fn with_stop(config: SearchConfig, stop: Arc<AtomicBool>) -> SearchEngine {
        SearchEngine { generator: MoveGenerator::new(), config, nodes_searched: 0, stop }
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Nodes visited by the most recent `select_move` call.
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// Pick a move for `color` in the given position.
    ///
    /// Fails with `NoLegalMoves` when the side has none; the caller is
    /// expected to have consulted the game status first. When the stop
    /// flag trips mid-search, the best fully-searched move so far is
    /// returned, which is always legal.
    pub fn select_move(&mut self, state: &GameState, color: Color) -> Result<Move, EngineError> {
        let mut scratch = state.clone();
        scratch.side_to_move = color;
        self.nodes_searched = 0;

        let moves = self.generator.all_legal_moves(&scratch, color);
        if moves.is_empty() {
            return Err(EngineError::NoLegalMoves);
        }

        let depth = self.config.search_depth.max(1);
        let mut best = moves[0];
        let mut alpha = -INFINITY;
        let beta = INFINITY;

        for &mv in &moves {
            if self.stop.load(Ordering::Relaxed) {
                break;
            }
            scratch.make_move(mv);
            let score = -self.negamax(&mut scratch, depth - 1, -beta, -alpha, 1);
            scratch.undo_move();
            if score > alpha {
                alpha = score;
                best = mv;
            }
        }

        Ok(best)
    }

    fn negamax(&mut self, state: &mut GameState, depth: u8, mut alpha: i32, beta: i32, ply: i32) -> i32 {
        self.nodes_searched += 1;
        if self.stop.load(Ordering::Relaxed) {
            return 0;
        }

        // Terminal positions are checked before the depth cutoff so a
        // mate on the horizon is still scored as mate, not evaluated
        // as a quiet position.
        let side = state.side_to_move;
        let moves = self.generator.all_legal_moves(state, side);
        if moves.is_empty() {
            return if self.generator.is_in_check(state, side) {
                -MATE_SCORE + ply
            } else {
                0
            };
        }
        if depth == 0 {
            return evaluate(state);
        }

        let mut best = -INFINITY;
        for mv in moves {
            state.make_move(mv);
            let score = -self.negamax(state, depth - 1, -beta, -alpha, ply + 1);
            state.undo_move();
            if score > best {
                best = score;
            }
            if best > alpha {
                alpha = best;
            }
            if alpha >= beta {
                break;
            }
        }
        best
    }
}
