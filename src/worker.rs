//! Background search worker.
//!
//! A front end that wants to stay responsive while the opponent thinks
//! spawns the search on its own thread and polls (or blocks on) the
//! result. One handle corresponds to one search; the channel carries
//! exactly one completion message.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::board::Move;
use crate::errors::EngineError;
use crate::game::GameState;
use crate::search::{SearchConfig, SearchEngine};
use crate::types::Color;

/// Handle to one in-flight search. Dropping it without waiting is fine;
/// the worker finishes on its own and the result is discarded.
pub struct SearchHandle {
    receiver: Receiver<Result<Move, EngineError>>,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SearchHandle {
    /// Start searching for `color`'s move on a snapshot of the position.
    pub fn spawn(state: &GameState, color: Color, config: SearchConfig) -> SearchHandle {
        let snapshot = state.clone();
        let stop = Arc::new(AtomicBool::new(false));
        let (sender, receiver) = mpsc::channel();

        let worker_stop = Arc::clone(&stop);
        let thread = thread::spawn(move || {
            let mut engine = SearchEngine::with_stop(config, worker_stop);
            // The receiver may already be gone; nothing to do then.
            let _ = sender.send(engine.select_move(&snapshot, color));
        });

        SearchHandle { receiver, stop, thread: Some(thread) }
    }

    /// Ask the worker to stop early. It still delivers a result: the
    /// best move found before the flag was observed.
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Non-blocking poll. `None` while the search is still running.
    pub fn try_result(&self) -> Option<Result<Move, EngineError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(EngineError::InvariantViolation(
                    "search worker hung up without a result",
                )))
            }
        }
    }

    /// Block until the search completes and return its result.
    pub fn wait(mut self) -> Result<Move, EngineError> {
        let result = self
            .receiver
            .recv()
            .map_err(|_| EngineError::InvariantViolation("search worker hung up without a result"))?;
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generator::MoveGenerator;

    #[test]
    fn worker_delivers_a_legal_move() {
        let state = GameState::new();
        let handle = SearchHandle::spawn(&state, Color::White, SearchConfig { search_depth: 2 });
        let mv = handle.wait().unwrap();
        let legal = MoveGenerator::new().all_legal_moves(&state, Color::White);
        assert!(legal.contains(&mv));
    }

    #[test]
    fn cancelled_worker_still_completes() {
        let state = GameState::new();
        let handle = SearchHandle::spawn(&state, Color::White, SearchConfig { search_depth: 3 });
        handle.cancel();
        assert!(handle.wait().is_ok());
    }

    #[test]
    fn worker_reports_no_moves_for_a_stalemated_side() {
        let state = GameState::from_fen("k7/8/KQ6/8/8/8/8/8 b - - 0 1").unwrap();
        let handle = SearchHandle::spawn(&state, Color::Black, SearchConfig::default());
        assert_eq!(handle.wait(), Err(EngineError::NoLegalMoves));
    }
}
