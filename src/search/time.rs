//! Search limits and time management.
//!
//! Two budgets govern a clock-driven search: the soft budget stops the
//! iterative deepening loop from starting another ply, the hard budget
//! (about four times the soft one) aborts the ply in flight. Node and depth
//! bounds and the GUI stop flag all funnel through the same periodic probe.

use crate::board::Color;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Parsed `go` parameters.
#[derive(Debug, Clone, Default)]
pub struct SearchLimits {
    pub depth: Option<i32>,
    pub nodes: Option<u64>,
    pub movetime: Option<u64>,
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: u64,
    pub binc: u64,
    pub movestogo: Option<u64>,
    pub mate: Option<i32>,
    pub infinite: bool,
    pub searchmoves: Vec<String>,
}

const HARD_FACTOR: u32 = 4;
const DEFAULT_MOVES_TO_GO: u64 = 30;

pub struct TimeManager {
    start: Instant,
    soft: Option<Duration>,
    hard: Option<Duration>,
    node_limit: Option<u64>,
    stop: Arc<AtomicBool>,
    pub interrupted: bool,
}

impl TimeManager {
    pub fn new(limits: &SearchLimits, side: Color, stop: Arc<AtomicBool>) -> TimeManager {
        let (soft, hard) = if limits.infinite {
            (None, None)
        } else if let Some(ms) = limits.movetime {
            let budget = Duration::from_millis(ms);
            (Some(budget), Some(budget))
        } else {
            let (clock, increment) = match side {
                Color::White => (limits.wtime, limits.winc),
                Color::Black => (limits.btime, limits.binc),
            };
            match clock {
                None => (None, None),
                Some(remaining) => {
                    let moves_to_go = limits.movestogo.unwrap_or(DEFAULT_MOVES_TO_GO).max(1);
                    let reserve = (remaining / 10).min(1000);
                    let usable = remaining.saturating_sub(reserve);

                    let mut soft = remaining / moves_to_go + increment * 3 / 4;
                    let mut hard = soft * HARD_FACTOR as u64;
                    if soft >= usable {
                        // Short on time: spread what is left evenly.
                        soft = (usable / moves_to_go).max(1);
                        hard = soft;
                    }
                    hard = hard.min(usable.max(1));
                    (
                        Some(Duration::from_millis(soft)),
                        Some(Duration::from_millis(hard)),
                    )
                }
            }
        };

        TimeManager {
            start: Instant::now(),
            soft,
            hard,
            node_limit: limits.nodes,
            stop,
            interrupted: false,
        }
    }

    /// Unlimited manager for tests and internal callers.
    pub fn unbounded(stop: Arc<AtomicBool>) -> TimeManager {
        TimeManager {
            start: Instant::now(),
            soft: None,
            hard: None,
            node_limit: None,
            stop,
            interrupted: false,
        }
    }

    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// The periodic probe: flips `interrupted` on the hard budget, the node
    /// budget, or an external stop.
    pub fn check(&mut self, nodes: u64) -> bool {
        if self.interrupted {
            return true;
        }
        if self.stop.load(Ordering::Relaxed) {
            self.interrupted = true;
        } else if let Some(limit) = self.node_limit
            && nodes >= limit
        {
            self.interrupted = true;
        } else if let Some(hard) = self.hard
            && self.start.elapsed() >= hard
        {
            self.interrupted = true;
        }
        self.interrupted
    }

    /// Soft-budget check between iterations: is there room to start another
    /// ply, given how long the last one took?
    pub fn may_start_iteration(&self, last_iteration: Duration) -> bool {
        match self.soft {
            None => true,
            // The next ply usually costs a few times the previous one.
            Some(soft) => self.elapsed() + last_iteration * 2 < soft,
        }
    }

    pub fn soft_expired(&self) -> bool {
        matches!(self.soft, Some(soft) if self.elapsed() >= soft)
    }
}
