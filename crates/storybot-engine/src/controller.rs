//! Step loop controller
//!
//! Owns the run state, the step budget, and the pacing delay. The pacing
//! delay between turns is mandatory: it gives the remote UI time to render
//! the result of the prior action, and removing it makes the resolver race
//! the render.

use std::time::Duration;
use storybot_core::{ActionOutcome, Locator, LocatorSet, Result, RunState, StepUi, UiAction};
use tracing::{debug, info, warn};

use crate::completion::CompletionDetector;
use crate::resolver::ActionResolver;

/// Delay between turns
const TURN_PACING: Duration = Duration::from_millis(500);

/// Last-resort progression wordings tried on a stuck turn
pub fn fallback_texts() -> LocatorSet {
    ["Continue", "Next", "Done"]
        .into_iter()
        .map(Locator::button_text)
        .collect()
}

/// Drives turns until the flow completes, the budget runs out, or an
/// infrastructure failure ends the run
pub struct StepLoop {
    resolver: ActionResolver,
    detector: CompletionDetector,
    step_budget: usize,
    pacing: Duration,
}

impl StepLoop {
    pub fn new(resolver: ActionResolver, detector: CompletionDetector, step_budget: usize) -> Self {
        Self {
            resolver,
            detector,
            step_budget,
            pacing: TURN_PACING,
        }
    }

    /// Override the pacing delay (tests use zero)
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Run the loop to a terminal state.
    ///
    /// Ok carries Completed or Exhausted; infrastructure failures
    /// propagate as Err after the state is marked Failed. Stuck-turn
    /// fallback attempts count toward the budget, so the loop terminates
    /// in at most `step_budget` turns.
    pub async fn run(&self, ui: &dyn StepUi) -> Result<RunState> {
        let mut state = RunState::new(self.step_budget);
        info!("Starting step loop (budget: {} turns)", state.step_budget());

        while state.begin_turn() {
            tokio::time::sleep(self.pacing).await;

            match self.resolver.attempt_turn(ui).await {
                Ok(ActionOutcome::Acted) => {
                    debug!("Turn {}: acted", state.steps_taken());
                }
                Ok(ActionOutcome::NoMatch) => {
                    if self.detector.is_complete(ui).await {
                        state.complete();
                        info!("Flow completed after {} turns", state.steps_taken());
                    } else {
                        debug!("Turn {}: stuck, trying fallback", state.steps_taken());
                        self.fallback(ui).await;
                    }
                }
                Err(err) => {
                    warn!("Turn {} failed: {}", state.steps_taken(), err);
                    state.fail();
                    return Err(err);
                }
            }
        }

        info!(
            "Step loop finished: {:?} after {} turns",
            state.status(),
            state.steps_taken()
        );
        Ok(state)
    }

    /// Generic progression-by-text attempt for a genuinely stuck turn
    async fn fallback(&self, ui: &dyn StepUi) {
        if let Some(handle) = ui.find_first(&fallback_texts()).await {
            ui.act(&handle, UiAction::Click).await;
        }
    }
}
