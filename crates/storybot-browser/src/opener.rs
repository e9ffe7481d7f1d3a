//! Story opening
//!
//! Navigates to the configured story (or the story grid) and, when on the
//! bare grid, opens the first available story card.

use storybot_core::{BotConfig, BotError, Locator, LocatorSet, Result, StepUi, UiAction};
use tracing::info;

use crate::session::BrowserSession;

fn story_card_locators() -> LocatorSet {
    vec![
        Locator::css("[data-test='story-card']"),
        Locator::css("a[href*='/stories/']"),
        Locator::css("[data-test*='story']"),
    ]
}

/// Navigate to the target story and land in the story player.
///
/// With a configured story path the navigation itself lands in the player.
/// On the bare grid, waits for the cards to load and clicks the first one;
/// a grid with no cards fails the run.
pub async fn open_story(session: &BrowserSession, cfg: &BotConfig) -> Result<()> {
    let url = cfg.target_url();
    session.navigate(&url).await?;
    session.wait_for_body().await?;

    if cfg.opens_grid() {
        let card = session
            .wait_for_first(&story_card_locators(), "story grid")
            .await?;
        if !session.act(&card, UiAction::Click).await {
            return Err(BotError::Browser("could not open a story card".to_string()));
        }
        info!(
            "Opened first story card from the grid at {}",
            session.current_url().await?
        );
    } else {
        info!("Opened story at {}", url);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_cascade_prefers_explicit_marker() {
        let locators = story_card_locators();
        assert_eq!(locators[0], Locator::css("[data-test='story-card']"));
        assert_eq!(locators.len(), 3);
    }
}
