//! Terminal-marker detection
//!
//! Consulted only when a whole turn found nothing to act on, the one
//! signal that the flow may have ended. Kept independent of the
//! strategies so a celebration screen with stray buttons still reads as
//! finished.

use storybot_core::{Locator, LocatorSet, StepUi};
use tracing::info;

/// Markers the flow shows when it has ended
pub fn completion_locators() -> LocatorSet {
    vec![
        Locator::css("[data-test*='streak']"),
        Locator::css("[data-test*='finished']"),
    ]
}

/// Recognizes the celebration / finished state
pub struct CompletionDetector {
    locators: LocatorSet,
}

impl CompletionDetector {
    pub fn new() -> Self {
        Self {
            locators: completion_locators(),
        }
    }

    /// Whether any terminal marker is present in the current render
    pub async fn is_complete(&self, ui: &dyn StepUi) -> bool {
        match ui.find_first(&self.locators).await {
            Some(handle) => {
                info!("Terminal marker present: {:?}", handle.locator);
                true
            }
            None => false,
        }
    }
}

impl Default for CompletionDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakeUi, Render};

    #[tokio::test]
    async fn detects_streak_marker() {
        let ui = FakeUi::new(Render::new().with(completion_locators()[0].clone(), 1));
        assert!(CompletionDetector::new().is_complete(&ui).await);
    }

    #[tokio::test]
    async fn detects_finished_marker() {
        let ui = FakeUi::new(Render::new().with(completion_locators()[1].clone(), 1));
        assert!(CompletionDetector::new().is_complete(&ui).await);
    }

    #[tokio::test]
    async fn plain_render_is_not_terminal() {
        let ui = FakeUi::new(Render::new());
        assert!(!CompletionDetector::new().is_complete(&ui).await);
        assert!(ui.actions().is_empty());
    }
}
