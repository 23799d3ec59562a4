// src/search.rs
use crate::eval;
use crate::movegen::MoveGenerator;
use crate::parameters::SearchParameters;
use crate::state::{Board, Move};
use crate::time::TimeManager;
use crate::tt::{TranspositionTable, FLAG_ALPHA, FLAG_BETA, FLAG_EXACT};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

pub const MAX_PLY: usize = 64;
pub const INFINITY: i32 = 32000;
pub const MATE_VALUE: i32 = 31000;

// Wall clock and stop flag are sampled this often.
const NODE_CHECK_INTERVAL: u64 = 2048;

const TT_MOVE_SCORE: i32 = 100_000;
const CAPTURE_SCORE: i32 = 90_000;
const KILLER_SCORE: i32 = 80_000;

#[derive(Clone, Copy)]
pub enum Limits {
    Infinite,
    FixedNodes(u64),
    FixedTime(TimeManager),
}

/// Killer and history tables; zeroed at the start of every root search.
pub struct SearchData {
    pub killers: [[Option<Move>; 2]; MAX_PLY + 1],
    pub history: [[i32; 32]; 32],
}

impl SearchData {
    pub fn new() -> Self {
        Self {
            killers: [[None; 2]; MAX_PLY + 1],
            history: [[0; 32]; 32],
        }
    }

    pub fn clear(&mut self) {
        self.killers = [[None; 2]; MAX_PLY + 1];
        self.history = [[0; 32]; 32];
    }

    fn store_killer(&mut self, ply: usize, mv: Move) {
        if self.killers[ply][0] != Some(mv) {
            self.killers[ply][1] = self.killers[ply][0];
            self.killers[ply][0] = Some(mv);
        }
    }
}

impl Default for SearchData {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything one search mutates, threaded through the recursion so the
/// engine carries no process-wide search state.
pub struct SearchInfo<'a> {
    pub data: &'a mut SearchData,
    pub tt: &'a mut TranspositionTable,
    pub nodes: u64,
    pub limits: Limits,
    pub stop_signal: Arc<AtomicBool>,
    pub stopped: bool,
    pub qs_depth_cap: usize,
}

impl<'a> SearchInfo<'a> {
    #[inline(always)]
    fn check_time(&mut self) {
        if self.nodes % NODE_CHECK_INTERVAL != 0 {
            return;
        }
        if self.stop_signal.load(Ordering::Relaxed) {
            self.stopped = true;
            return;
        }
        match &self.limits {
            Limits::FixedNodes(limit) => {
                if self.nodes >= *limit {
                    self.stopped = true;
                }
            }
            Limits::FixedTime(tm) => {
                if tm.check_hard_limit() {
                    self.stopped = true;
                }
            }
            Limits::Infinite => {}
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: i32,
    pub nodes_searched: u64,
    pub elapsed_ms: u64,
    pub final_depth: u8,
}

fn score_moves(moves: &mut [Move], tt_move: Option<Move>, data: &SearchData, ply: usize) {
    for mv in moves.iter_mut() {
        mv.score = if tt_move == Some(*mv) {
            TT_MOVE_SCORE
        } else if mv.is_capture() {
            CAPTURE_SCORE + mv.captured.count_ones() as i32
        } else if data.killers[ply][0] == Some(*mv) || data.killers[ply][1] == Some(*mv) {
            KILLER_SCORE
        } else {
            data.history[mv.from.trailing_zeros() as usize][mv.to.trailing_zeros() as usize]
        };
    }
    moves.sort_unstable_by_key(|m| -m.score);
}

fn negamax(
    board: &Board,
    side: usize,
    depth: i32,
    mut alpha: i32,
    beta: i32,
    ply: usize,
    info: &mut SearchInfo,
) -> i32 {
    info.nodes += 1;
    info.check_time();
    if info.stopped || ply >= MAX_PLY {
        return 0;
    }

    let mut tt_move = None;
    if let Some(entry) = info.tt.probe(board.hash) {
        if !entry.best.is_null() {
            tt_move = Some(entry.best);
        }
        if entry.depth as i32 >= depth {
            match entry.flag {
                FLAG_EXACT => return entry.score,
                FLAG_BETA if entry.score >= beta => return entry.score,
                FLAG_ALPHA if entry.score <= alpha => return entry.score,
                _ => {}
            }
        }
    }

    if depth <= 0 {
        return quiescence(board, side, alpha, beta, ply, 0, info);
    }

    let mut gen = MoveGenerator::new();
    gen.generate_legal(board, side);
    if gen.list.count == 0 {
        // Stuck or out of pieces: the giveaway win for the side to move,
        // discounted so nearer wins score higher.
        return MATE_VALUE - ply as i32;
    }

    score_moves(gen.list.as_mut_slice(), tt_move, info.data, ply);

    let alpha_orig = alpha;
    let mut best_score = -INFINITY;
    let mut best_move = gen.list.moves[0];

    for i in 0..gen.list.count {
        let mv = gen.list.moves[i];
        let next = board.apply_move(&mv, side);

        let score = if next.pieces(3 - side) == 0 {
            // Taking the opponent's last piece hands them the giveaway
            // win; the mover is mated.
            -(MATE_VALUE - ply as i32)
        } else {
            -negamax(&next, 3 - side, depth - 1, -beta, -alpha, ply + 1, info)
        };
        if info.stopped {
            return 0;
        }

        if score > best_score {
            best_score = score;
            best_move = mv;
        }
        if score > alpha {
            alpha = score;
        }
        if score >= beta {
            if !mv.is_capture() {
                info.data.store_killer(ply, mv);
                let from = mv.from.trailing_zeros() as usize;
                let to = mv.to.trailing_zeros() as usize;
                info.data.history[from][to] += depth * depth;
            }
            info.tt.store(board.hash, best_score, depth as u8, FLAG_BETA, best_move);
            return beta;
        }
    }

    let flag = if best_score <= alpha_orig { FLAG_ALPHA } else { FLAG_EXACT };
    info.tt.store(board.hash, best_score, depth as u8, flag, best_move);
    best_score
}

fn quiescence(
    board: &Board,
    side: usize,
    mut alpha: i32,
    beta: i32,
    ply: usize,
    qply: usize,
    info: &mut SearchInfo,
) -> i32 {
    info.nodes += 1;
    info.check_time();
    if info.stopped {
        return 0;
    }

    if board.pieces(side) == 0 {
        // Shed every piece: the giveaway win.
        return MATE_VALUE - ply as i32;
    }

    let stand_pat = eval::evaluate_stm(board, side);
    if ply >= MAX_PLY {
        return stand_pat;
    }
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let mut gen = MoveGenerator::new();
    gen.generate_captures(board, side);
    if gen.list.count == 0 || qply >= info.qs_depth_cap {
        return stand_pat;
    }
    gen.keep_max_captures();
    score_moves(gen.list.as_mut_slice(), None, info.data, ply);

    for i in 0..gen.list.count {
        let mv = gen.list.moves[i];
        let next = board.apply_move(&mv, side);

        let score = if next.pieces(3 - side) == 0 {
            -(MATE_VALUE - ply as i32)
        } else {
            -quiescence(&next, 3 - side, -beta, -alpha, ply + 1, qply + 1, info)
        };
        if info.stopped {
            return 0;
        }

        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }
    alpha
}

/// Iterative-deepening driver. An iteration cut short by the stop flag
/// is discarded and the previous depth's result stands; depth 1 is
/// always recorded so there is a move to play.
pub fn search(
    board: &Board,
    side: usize,
    max_depth: u8,
    limits: Limits,
    tt: &mut TranspositionTable,
    data: &mut SearchData,
    stop_signal: Arc<AtomicBool>,
    params: &SearchParameters,
    report: bool,
) -> SearchResult {
    let start_time = Instant::now();
    tt.new_search();
    data.clear();

    let mut root_gen = MoveGenerator::new();
    root_gen.generate_legal(board, side);
    if root_gen.list.count == 0 {
        // Terminal: the side to move has already won the giveaway game.
        // Callers should not ask for a move here, but answer sanely.
        return SearchResult {
            best_move: Move::default(),
            score: MATE_VALUE,
            nodes_searched: 0,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
            final_depth: 0,
        };
    }

    let max_depth = max_depth.clamp(1, MAX_PLY as u8);
    let mut info = SearchInfo {
        data,
        tt,
        nodes: 0,
        limits,
        stop_signal,
        stopped: false,
        qs_depth_cap: params.qs_depth_cap,
    };

    let mut best_move = root_gen.list.moves[0];
    let mut best_score = 0;
    let mut final_depth = 0u8;

    for depth in 1..=max_depth {
        let score = negamax(board, side, depth as i32, -INFINITY, INFINITY, 0, &mut info);

        if info.stopped && depth > 1 {
            break;
        }
        best_score = score;
        final_depth = depth;
        if let Some(mv) = info.tt.get_move(board.hash) {
            // Take the generator's copy so every flag on the move is right.
            if let Some(idx) = root_gen.list.as_slice().iter().position(|m| *m == mv) {
                best_move = root_gen.list.moves[idx];
            }
        }

        if report {
            let pv = pv_line(board, side, info.tt, depth);
            println!(
                "info depth {} score cp {} nodes {} time {} pv {}",
                depth,
                best_score,
                info.nodes,
                start_time.elapsed().as_millis(),
                pv
            );
        }

        if info.stopped {
            break;
        }
        if best_score.abs() >= MATE_VALUE - MAX_PLY as i32 {
            break;
        }
        if let Limits::FixedTime(tm) = &info.limits {
            if tm.check_soft_limit() {
                break;
            }
        }
    }

    let result = SearchResult {
        best_move,
        score: best_score,
        nodes_searched: info.nodes,
        elapsed_ms: start_time.elapsed().as_millis() as u64,
        final_depth,
    };
    log::info!(
        "search done: depth {} score {} nodes {} in {} ms",
        result.final_depth,
        result.score,
        result.nodes_searched,
        result.elapsed_ms
    );
    result
}

/// Walk the principal variation out of the table, guarding against
/// stale entries and cycles.
fn pv_line(board: &Board, side: usize, tt: &TranspositionTable, depth: u8) -> String {
    let mut pv = String::new();
    let mut current = *board;
    let mut current_side = side;
    let mut seen_hashes = Vec::new();

    for _ in 0..depth {
        let Some(mv) = tt.get_move(current.hash) else {
            break;
        };
        let mut gen = MoveGenerator::new();
        gen.generate_legal(&current, current_side);
        let Some(idx) = gen.list.as_slice().iter().position(|m| *m == mv) else {
            break;
        };
        if seen_hashes.contains(&current.hash) {
            break;
        }
        seen_hashes.push(current.hash);

        let mv = gen.list.moves[idx];
        if !pv.is_empty() {
            pv.push(' ');
        }
        pv.push_str(&mv.to_string());
        current = current.apply_move(&mv, current_side);
        current_side = 3 - current_side;
    }
    pv
}
