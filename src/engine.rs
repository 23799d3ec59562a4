// src/engine.rs
//
// One `Engine` value owns every table a search mutates (transposition
// table, killers, history, stop flag), so re-entrancy hazards reduce to
// "one search per Engine at a time". The table stays warm across calls;
// killers and history are reset on every call.

use crate::movegen::MoveGenerator;
use crate::parameters::SearchParameters;
use crate::search::{self, Limits, SearchData, SearchResult};
use crate::state::{Board, Move};
use crate::time::{TimeControl, TimeManager};
use crate::tt::TranspositionTable;
use crate::zobrist;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct Engine {
    tt: TranspositionTable,
    data: SearchData,
    params: SearchParameters,
    stop: Arc<AtomicBool>,
    /// Print an `info ...` line per completed deepening iteration.
    pub report: bool,
}

impl Engine {
    pub fn new(tt_size_mb: usize) -> Self {
        Self::with_params(tt_size_mb, SearchParameters::default())
    }

    pub fn with_params(tt_size_mb: usize, params: SearchParameters) -> Self {
        zobrist::init_zobrist();
        log::info!("engine up, hash {} MB", tt_size_mb);
        Engine {
            tt: TranspositionTable::new(tt_size_mb),
            data: SearchData::new(),
            params,
            stop: Arc::new(AtomicBool::new(false)),
            report: false,
        }
    }

    /// Cooperative stop flag, polled by the search every 2048 nodes.
    /// Raising it makes in-flight frames unwind and the driver return
    /// the last completed depth.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn set_hash_size(&mut self, mb: usize) {
        self.tt = TranspositionTable::new(mb);
    }

    pub fn clear_tables(&mut self) {
        self.tt.clear();
        self.data.clear();
    }

    /// Best move for `side` within `max_depth` plies and
    /// `time_limit_ms` milliseconds (0 means no time limit).
    pub fn find_best_move(
        &mut self,
        board: &Board,
        side: usize,
        max_depth: u8,
        time_limit_ms: u64,
    ) -> SearchResult {
        let limits = if time_limit_ms > 0 {
            let tm = TimeManager::new(
                TimeControl::MoveTime(time_limit_ms as u128),
                side,
                self.params.move_overhead_ms as u128,
            );
            Limits::FixedTime(tm)
        } else {
            Limits::Infinite
        };
        self.search_with_limits(board, side, max_depth, limits)
    }

    pub fn search_with_limits(
        &mut self,
        board: &Board,
        side: usize,
        max_depth: u8,
        limits: Limits,
    ) -> SearchResult {
        self.stop.store(false, Ordering::Relaxed);
        search::search(
            board,
            side,
            max_depth,
            limits,
            &mut self.tt,
            &mut self.data,
            self.stop.clone(),
            &self.params,
            self.report,
        )
    }
}

/// Every legal move for `side`, mandatory-capture rule applied. The
/// UI/validation surface; the search uses the generator directly.
pub fn generate_legal_moves(board: &Board, side: usize) -> Vec<Move> {
    let mut gen = MoveGenerator::new();
    gen.generate_legal(board, side);
    gen.list.as_slice().to_vec()
}

pub fn apply_move(board: &Board, mv: &Move, side: usize) -> Board {
    board.apply_move(mv, side)
}

/// Scratch hash for external correctness checks.
pub fn calculate_hash(board: &Board, side: usize) -> u64 {
    board.calculate_hash(side)
}
