//! Action resolver: fixed-priority dispatch over the strategy library
//!
//! Per turn, strategies are tried in a fixed order: progression first, so
//! an already-resolved step advances without being re-answered, then
//! token-tap, multiple-choice, and free-text. The first `Acted` ends the
//! turn; answering strategies get one immediate confirm click, since
//! answering often reveals a check control that should not wait a whole
//! turn.

use std::sync::Arc;
use storybot_core::{ActionOutcome, Locator, LocatorSet, Result, StepUi, UiAction};
use tracing::debug;

use crate::choice::ChoicePolicy;
use crate::strategy::{
    ChoiceStrategy, ProgressionStrategy, Strategy, TextFillStrategy, TokenTapStrategy,
};

/// Controls confirmed right after an answer lands
pub fn confirm_locators() -> LocatorSet {
    vec![
        Locator::css("button[data-test*='check']"),
        Locator::css("[data-test='stories-player-continue']"),
        Locator::css("button[type='submit']"),
    ]
}

/// Tries strategies in priority order until one acts
pub struct ActionResolver {
    strategies: Vec<Box<dyn Strategy>>,
    confirm: LocatorSet,
}

impl ActionResolver {
    /// Build the standard strategy order with the given selection policy
    pub fn new(policy: Arc<dyn ChoicePolicy>) -> Self {
        Self::with_strategies(vec![
            Box::new(ProgressionStrategy::new()),
            Box::new(TokenTapStrategy::new()),
            Box::new(ChoiceStrategy::new(policy)),
            Box::new(TextFillStrategy::new()),
        ])
    }

    /// Build from an explicit strategy list (tests inject failing or
    /// reordered strategies here)
    pub fn with_strategies(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self {
            strategies,
            confirm: confirm_locators(),
        }
    }

    /// One turn: first `Acted` wins, `NoMatch` when no strategy found
    /// anything applicable in this render
    pub async fn attempt_turn(&self, ui: &dyn StepUi) -> Result<ActionOutcome> {
        for strategy in &self.strategies {
            match strategy.attempt(ui).await? {
                ActionOutcome::Acted => {
                    debug!("Strategy '{}' acted", strategy.name());
                    if strategy.confirm_after_act() {
                        self.confirm(ui).await;
                    }
                    return Ok(ActionOutcome::Acted);
                }
                ActionOutcome::NoMatch => continue,
            }
        }
        Ok(ActionOutcome::NoMatch)
    }

    /// Follow-up confirm click after an answer; absence is fine
    async fn confirm(&self, ui: &dyn StepUi) {
        if let Some(handle) = ui.find_first(&self.confirm).await {
            debug!("Confirming with {:?}", handle.locator);
            ui.act(&handle, UiAction::Click).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{choice_locators, progression_locators, token_locators};
    use crate::testutil::{FakeUi, Render};
    use async_trait::async_trait;
    use std::time::Duration;
    use storybot_core::{BotError, UiHandle};

    struct FirstChoice;

    impl ChoicePolicy for FirstChoice {
        fn pick(&self, _len: usize) -> usize {
            0
        }
    }

    fn test_resolver() -> ActionResolver {
        ActionResolver::with_strategies(vec![
            Box::new(ProgressionStrategy::new()),
            Box::new(TokenTapStrategy::new().with_pause(Duration::ZERO)),
            Box::new(ChoiceStrategy::new(Arc::new(FirstChoice))),
            Box::new(TextFillStrategy::new()),
        ])
    }

    #[tokio::test]
    async fn progression_beats_answerable_question() {
        // When both a progression control and a question are present,
        // the resolver always progresses and never answers
        let button = progression_locators()[0].clone();
        let choices = choice_locators()[0].clone();
        let ui = FakeUi::new(
            Render::new()
                .with(button.clone(), 1)
                .with(choices, 4),
        );

        let outcome = test_resolver().attempt_turn(&ui).await.unwrap();
        assert_eq!(outcome, ActionOutcome::Acted);
        assert_eq!(
            ui.actions(),
            vec![(UiHandle::new(button, 0), UiAction::Click)]
        );
    }

    #[tokio::test]
    async fn choice_turn_selects_exactly_one_option() {
        // No progression, four options, no token set
        let choices = choice_locators()[0].clone();
        let ui = FakeUi::new(Render::new().with(choices.clone(), 4));

        let outcome = test_resolver().attempt_turn(&ui).await.unwrap();
        assert_eq!(outcome, ActionOutcome::Acted);

        let clicks: Vec<_> = ui
            .actions()
            .into_iter()
            .filter(|(handle, _)| handle.locator == choices)
            .collect();
        assert_eq!(clicks.len(), 1);
    }

    #[tokio::test]
    async fn answer_gets_followed_by_confirm_click() {
        let choices = choice_locators()[0].clone();
        let check = confirm_locators()[0].clone();
        let ui = FakeUi::new(Render::new().with(choices.clone(), 2));
        // Answering reveals the check button
        ui.queue_after_act(Render::new().with(check.clone(), 1));

        test_resolver().attempt_turn(&ui).await.unwrap();

        let actions = ui.actions();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].0.locator, choices);
        assert_eq!(actions[1].0.locator, check);
    }

    #[tokio::test]
    async fn progression_act_skips_confirm() {
        let button = progression_locators()[0].clone();
        let ui = FakeUi::new(Render::new().with(button, 1));
        // A confirm target is present, but the progression click must not
        // be followed by a second click
        test_resolver().attempt_turn(&ui).await.unwrap();
        assert_eq!(ui.actions().len(), 1);
    }

    #[tokio::test]
    async fn tokens_beat_choices() {
        let tokens = token_locators()[0].clone();
        let choices = choice_locators()[0].clone();
        let ui = FakeUi::new(
            Render::new()
                .with(tokens.clone(), 3)
                .with(choices, 4),
        );

        test_resolver().attempt_turn(&ui).await.unwrap();
        assert!(ui.actions().iter().all(|(h, _)| h.locator == tokens));
    }

    #[tokio::test]
    async fn empty_render_is_no_match() {
        let ui = FakeUi::new(Render::new());
        let outcome = test_resolver().attempt_turn(&ui).await.unwrap();
        assert_eq!(outcome, ActionOutcome::NoMatch);
        assert!(ui.actions().is_empty());
    }

    struct FailingStrategy;

    #[async_trait]
    impl Strategy for FailingStrategy {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn attempt(&self, _ui: &dyn StepUi) -> Result<ActionOutcome> {
            Err(BotError::Browser("session disconnected".to_string()))
        }
    }

    #[tokio::test]
    async fn infrastructure_errors_propagate() {
        let resolver = ActionResolver::with_strategies(vec![Box::new(FailingStrategy)]);
        let ui = FakeUi::new(Render::new());
        let err = resolver.attempt_turn(&ui).await.unwrap_err();
        assert!(matches!(err, BotError::Browser(_)));
    }
}
