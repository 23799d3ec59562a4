use crate::state::WHITE;
use std::time::Instant;

#[derive(Clone, Copy)]
pub enum TimeControl {
    Infinite,
    MoveTime(u128),
    GameTime {
        wtime: u128,
        btime: u128,
        winc: u128,
        binc: u128,
        moves_to_go: Option<u32>,
    },
}

#[derive(Clone, Copy)]
pub struct TimeManager {
    pub start_time: Instant,
    pub hard_limit: u128,
    pub soft_limit: u128,
}

impl TimeManager {
    pub fn new(limit: TimeControl, side: usize, overhead: u128) -> Self {
        let start_time = Instant::now();
        let (hard, soft) = match limit {
            TimeControl::Infinite => (u128::MAX, u128::MAX),
            TimeControl::MoveTime(t) => {
                // A tiny budget must not underflow to zero.
                let effective = t.saturating_sub(overhead);
                if effective == 0 {
                    (t.max(1), t.max(1))
                } else {
                    (effective, effective)
                }
            }
            TimeControl::GameTime { wtime, btime, winc, binc, moves_to_go } => {
                let (mut time, inc) = if side == WHITE { (wtime, winc) } else { (btime, binc) };

                time = time.saturating_sub(overhead);
                if time == 0 {
                    time = 50; // emergency buffer
                }

                // Draughts games resolve faster than chess clocks assume.
                let mtg = moves_to_go.unwrap_or(30).clamp(10, 40) as u128;

                let base = (time / mtg) + (inc * 3 / 4);
                let max_alloc = time * 8 / 10;

                let soft = base.min(max_alloc);
                let hard = (base * 2).min(max_alloc);
                (hard.max(1), soft.max(1))
            }
        };

        Self { start_time, hard_limit: hard, soft_limit: soft }
    }

    #[inline(always)]
    pub fn check_soft_limit(&self) -> bool {
        self.start_time.elapsed().as_millis() >= self.soft_limit
    }

    #[inline(always)]
    pub fn check_hard_limit(&self) -> bool {
        self.start_time.elapsed().as_millis() >= self.hard_limit
    }
}
