//! Run-state machine for the step loop
//!
//! Pure state, no I/O. The loop controller is the only mutator. Terminal
//! states are absorbing: once Completed, Exhausted, or Failed, no further
//! transition changes the status.

/// Terminal and non-terminal statuses of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Loop in progress
    Running,
    /// Terminal UI markers observed; the flow finished
    Completed,
    /// Step budget spent without reaching a terminal marker
    Exhausted,
    /// Infrastructure or authentication failure
    Failed,
}

impl RunStatus {
    /// Whether this status ends the run
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunStatus::Running)
    }

    /// Whether this status maps to a zero exit code. Exhausted is "ran to
    /// a stopping point", not a failure.
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Exhausted)
    }
}

/// Mutable state of one run: turn counter, budget, status
#[derive(Debug, Clone)]
pub struct RunState {
    steps_taken: usize,
    step_budget: usize,
    status: RunStatus,
}

impl RunState {
    /// Create a fresh Running state with the given budget.
    /// A zero budget is clamped to 1 so the loop always takes one turn.
    pub fn new(step_budget: usize) -> Self {
        Self {
            steps_taken: 0,
            step_budget: step_budget.max(1),
            status: RunStatus::Running,
        }
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn step_budget(&self) -> usize {
        self.step_budget
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// Start a new turn. Increments the counter while Running; when the
    /// counter would exceed the budget the run transitions to Exhausted
    /// and `false` is returned. Returns `false` without counting when the
    /// run is already terminal.
    pub fn begin_turn(&mut self) -> bool {
        if self.status != RunStatus::Running {
            return false;
        }
        if self.steps_taken >= self.step_budget {
            self.status = RunStatus::Exhausted;
            return false;
        }
        self.steps_taken += 1;
        true
    }

    /// Transition to Completed (no-op once terminal)
    pub fn complete(&mut self) {
        if self.status == RunStatus::Running {
            self.status = RunStatus::Completed;
        }
    }

    /// Transition to Failed (no-op once terminal)
    pub fn fail(&mut self) {
        if self.status == RunStatus::Running {
            self.status = RunStatus::Failed;
        }
    }
}
