//! Interaction strategies
//!
//! Each strategy is a self-contained policy for one class of step:
//! progression controls, tap-to-complete token banks, multiple-choice
//! questions, free-text inputs. A strategy either performs a real UI
//! mutation and reports `Acted`, or finds nothing applicable and reports
//! `NoMatch` with no side effect. Repeating an attempt on an unchanged
//! no-match render is always harmless.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use storybot_core::{ActionOutcome, Locator, LocatorSet, Result, StepUi, UiAction};
use tracing::debug;

use crate::choice::ChoicePolicy;

/// Pause between consecutive token taps, letting the UI register each one
const TOKEN_TAP_PAUSE: Duration = Duration::from_millis(50);

/// Filler submitted to free-text steps; any non-empty input unblocks them
const TEXT_FILLER: &str = "a";

/// One interaction policy, tried by the resolver in priority order
#[async_trait]
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Recognize and act on the current render. `Acted` means a real
    /// mutation was attempted; `NoMatch` means nothing applicable was
    /// found and nothing was touched.
    async fn attempt(&self, ui: &dyn StepUi) -> Result<ActionOutcome>;

    /// Whether the resolver should try one confirm click after this
    /// strategy acts (answering often reveals a check control)
    fn confirm_after_act(&self) -> bool {
        true
    }
}

/// Attribute-marked progression controls, most specific first
pub fn progression_locators() -> LocatorSet {
    vec![
        Locator::css("[data-test='stories-player-continue']"),
        Locator::css("[data-test='stories-player-cta']"),
        Locator::css("[data-test='player-continue']"),
        Locator::css("button[data-test*='continue']"),
        Locator::css("button[data-test*='check']"),
    ]
}

/// Visible-text fallbacks for progression controls, in the wordings the
/// flow uses across its screens
pub fn progression_texts() -> LocatorSet {
    ["Start", "Continue", "Next", "Check", "Skip", "Got it", "Keep going", "Done"]
        .into_iter()
        .map(Locator::button_text)
        .collect()
}

/// Token families for tap-to-complete sentences
pub fn token_locators() -> LocatorSet {
    vec![
        Locator::css("[data-test='challenge-tap-token']"),
        Locator::css("[data-test='word-bank'] [role='button']"),
        Locator::css("[data-test*='challenge'] [data-test*='token']"),
    ]
}

/// Option families for multiple-choice questions
pub fn choice_locators() -> LocatorSet {
    vec![
        Locator::css("[data-test='challenge-choice']"),
        Locator::css("[data-test='challenge-judge-text']"),
        Locator::css("[data-test*='challenge'] [role='radio']"),
        Locator::css("[data-test*='challenge'] [data-test*='option']"),
    ]
}

/// Input families for free-text questions
pub fn text_input_locators() -> LocatorSet {
    vec![
        Locator::css("[data-test='challenge-text-input'] textarea"),
        Locator::css("[data-test='challenge-text-input'] input"),
        Locator::css("textarea"),
        Locator::css("input[type='text']"),
    ]
}

/// Clicks the continue/next/check/skip control when one is present.
///
/// Highest priority: an already-resolved step must advance immediately
/// without being re-answered.
pub struct ProgressionStrategy {
    locators: LocatorSet,
}

impl ProgressionStrategy {
    pub fn new() -> Self {
        let mut locators = progression_locators();
        locators.extend(progression_texts());
        Self { locators }
    }
}

impl Default for ProgressionStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Strategy for ProgressionStrategy {
    fn name(&self) -> &'static str {
        "progression"
    }

    async fn attempt(&self, ui: &dyn StepUi) -> Result<ActionOutcome> {
        let Some(handle) = ui.find_first(&self.locators).await else {
            return Ok(ActionOutcome::NoMatch);
        };
        if ui.act(&handle, UiAction::Click).await {
            Ok(ActionOutcome::Acted)
        } else {
            Ok(ActionOutcome::NoMatch)
        }
    }

    /// The progression click is itself the confirmation
    fn confirm_after_act(&self) -> bool {
        false
    }
}

/// Selects every token of a tap-to-complete sentence.
///
/// A single matching node is not a word bank; the strategy only engages
/// when a family yields at least two homogeneous tokens, and then taps
/// all of them before yielding control.
pub struct TokenTapStrategy {
    families: LocatorSet,
    pause: Duration,
}

impl TokenTapStrategy {
    pub fn new() -> Self {
        Self {
            families: token_locators(),
            pause: TOKEN_TAP_PAUSE,
        }
    }

    /// Override the inter-tap pause (tests use zero)
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }
}

impl Default for TokenTapStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Strategy for TokenTapStrategy {
    fn name(&self) -> &'static str {
        "token-tap"
    }

    async fn attempt(&self, ui: &dyn StepUi) -> Result<ActionOutcome> {
        for family in &self.families {
            let tokens = ui.find_all(family).await;
            if tokens.len() < 2 {
                continue;
            }
            debug!("Tapping {} tokens for {:?}", tokens.len(), family);
            for token in &tokens {
                // Individual tap failures are tolerated; the render may
                // consume tokens as they are tapped
                ui.act(token, UiAction::Click).await;
                tokio::time::sleep(self.pause).await;
            }
            return Ok(ActionOutcome::Acted);
        }
        Ok(ActionOutcome::NoMatch)
    }
}

/// Answers a multiple-choice question by picking one option through the
/// injected selection policy
pub struct ChoiceStrategy {
    families: LocatorSet,
    policy: Arc<dyn ChoicePolicy>,
}

impl ChoiceStrategy {
    pub fn new(policy: Arc<dyn ChoicePolicy>) -> Self {
        Self {
            families: choice_locators(),
            policy,
        }
    }
}

#[async_trait]
impl Strategy for ChoiceStrategy {
    fn name(&self) -> &'static str {
        "choice"
    }

    async fn attempt(&self, ui: &dyn StepUi) -> Result<ActionOutcome> {
        for family in &self.families {
            let options = ui.find_all(family).await;
            if options.is_empty() {
                continue;
            }
            let picked = self.policy.pick(options.len());
            debug!("Choosing option {} of {} for {:?}", picked, options.len(), family);
            if ui.act(&options[picked], UiAction::Click).await {
                return Ok(ActionOutcome::Acted);
            }
        }
        Ok(ActionOutcome::NoMatch)
    }
}

/// Fills a free-text input with a fixed filler and submits it.
///
/// Exists purely to unblock free-text steps that accept any non-empty
/// input or reveal the answer after an incorrect attempt.
pub struct TextFillStrategy {
    locators: LocatorSet,
    filler: String,
}

impl TextFillStrategy {
    pub fn new() -> Self {
        Self {
            locators: text_input_locators(),
            filler: TEXT_FILLER.to_string(),
        }
    }
}

impl Default for TextFillStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Strategy for TextFillStrategy {
    fn name(&self) -> &'static str {
        "text-fill"
    }

    async fn attempt(&self, ui: &dyn StepUi) -> Result<ActionOutcome> {
        let Some(handle) = ui.find_first(&self.locators).await else {
            return Ok(ActionOutcome::NoMatch);
        };
        if ui
            .act(&handle, UiAction::TypeAndSubmit(self.filler.clone()))
            .await
        {
            Ok(ActionOutcome::Acted)
        } else {
            Ok(ActionOutcome::NoMatch)
        }
    }
}
