use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Limits for a single search call. Passed by value into every search; there
/// is no process-wide timeout.
///
/// `max_steps` counts recursive entries of the engine (and extension steps in
/// MCS mode). `None` on either field means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBudget {
    pub max_steps: Option<u64>,
    pub timeout: Option<Duration>,
}

impl SearchBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// What is left after `steps` steps and `elapsed` time were spent.
    pub fn remaining(&self, steps: u64, elapsed: Duration) -> Self {
        Self {
            max_steps: self.max_steps.map(|max| max.saturating_sub(steps)),
            timeout: self.timeout.map(|t| t.saturating_sub(elapsed)),
        }
    }

    pub(crate) fn start(&self) -> BudgetTracker {
        BudgetTracker {
            max_steps: self.max_steps,
            deadline: self.timeout.map(|t| Instant::now() + t),
            steps: 0,
            exceeded: false,
        }
    }
}

/// Running step counter and deadline for one search.
#[derive(Debug)]
pub(crate) struct BudgetTracker {
    max_steps: Option<u64>,
    deadline: Option<Instant>,
    steps: u64,
    exceeded: bool,
}

// The clock is read every this many steps.
const CLOCK_INTERVAL: u64 = 64;

impl BudgetTracker {
    /// Counts one step. Returns `false` once the budget is spent; after that
    /// it keeps returning `false`.
    pub(crate) fn tick(&mut self) -> bool {
        if self.exceeded {
            return false;
        }
        if self.max_steps.is_some_and(|max| self.steps >= max) {
            self.exceeded = true;
            return false;
        }
        self.steps += 1;
        if let Some(deadline) = self.deadline {
            if self.steps % CLOCK_INTERVAL == 1 && Instant::now() >= deadline {
                self.exceeded = true;
                return false;
            }
        }
        true
    }

    pub(crate) fn steps(&self) -> u64 {
        self.steps
    }

    pub(crate) fn exceeded(&self) -> bool {
        self.exceeded
    }
}
