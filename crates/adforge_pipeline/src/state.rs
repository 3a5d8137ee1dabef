//! Typed loop state for the improve-retry cycle.
//!
//! The termination conditions live here, away from any I/O, so they can be
//! unit tested in isolation: wall-clock budget first, then the target score,
//! then the attempt budget. Candidate replacement is strictly monotonic —
//! the loop can never regress to a worse candidate than one already found.

use crate::config::PipelineConfig;
use std::time::{Duration, Instant};

/// Why the improve loop stopped, or that it should continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopDecision {
    /// Keep iterating
    Continue,
    /// Wall-clock budget exhausted; stop immediately with the current best
    DeadlineExceeded,
    /// Current best meets the target threshold
    TargetMet,
    /// Attempt budget exhausted
    AttemptsExhausted,
}

/// Mutable state of one generation job's improve loop.
#[derive(Debug)]
pub struct LoopState {
    attempts_used: u32,
    started_at: Instant,
    best_score: Option<u8>,
}

impl LoopState {
    /// Fresh state: no attempts used, clock started now.
    pub fn new() -> Self {
        Self {
            attempts_used: 0,
            started_at: Instant::now(),
            best_score: None,
        }
    }

    /// Count one generation attempt (the initial generation included).
    pub fn record_attempt(&mut self) {
        self.attempts_used += 1;
    }

    /// Generation attempts made so far.
    pub fn attempts_used(&self) -> u32 {
        self.attempts_used
    }

    /// Best selection score seen so far, if any candidate was accepted.
    pub fn best_score(&self) -> Option<u8> {
        self.best_score
    }

    /// Time elapsed since the loop started.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Offer a candidate's selection score. Accepted (returns true) only when
    /// strictly higher than the current best; ties keep the earlier candidate.
    pub fn offer(&mut self, score: u8) -> bool {
        match self.best_score {
            Some(best) if score <= best => false,
            _ => {
                self.best_score = Some(score);
                true
            }
        }
    }

    /// Decide whether to run another improve iteration.
    pub fn decide(&self, config: &PipelineConfig) -> LoopDecision {
        self.decide_at(self.elapsed(), config)
    }

    /// [`Self::decide`] with an explicit elapsed time, for tests.
    pub fn decide_at(&self, elapsed: Duration, config: &PipelineConfig) -> LoopDecision {
        // Wall-clock budget beats everything else: a synchronous caller is
        // waiting, so stop immediately even if attempts remain.
        if elapsed >= Duration::from_millis(*config.max_duration_ms()) {
            return LoopDecision::DeadlineExceeded;
        }
        if let Some(best) = self.best_score
            && best >= *config.target_satisfaction()
        {
            return LoopDecision::TargetMet;
        }
        if self.attempts_used >= *config.max_attempts() {
            return LoopDecision::AttemptsExhausted;
        }
        LoopDecision::Continue
    }
}

impl Default for LoopState {
    fn default() -> Self {
        Self::new()
    }
}
