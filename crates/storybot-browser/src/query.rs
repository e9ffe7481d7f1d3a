//! UI query facade: locator resolution and the safe action executor
//!
//! Queries never raise for absence; a locator matching nothing is ordinary
//! control flow and reads as empty/None. Handles are re-resolved against the
//! current render at action time, so a re-render between lookup and action
//! degrades to a failed action.

use async_trait::async_trait;
use headless_chrome::Element;
use std::time::{Duration, Instant};
use storybot_core::{cascade, BotError, Locator, Result, StepUi, UiAction, UiHandle};
use tracing::debug;

use crate::session::BrowserSession;

/// Poll interval for bounded waits
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// XPath variants for a visible button text: exact match first, then
/// substring, for both real buttons and role=button nodes
fn button_text_xpaths(text: &str) -> Vec<String> {
    let t = text.trim();
    vec![
        format!("//button[normalize-space()='{}']", t),
        format!("//button[contains(normalize-space(), '{}')]", t),
        format!("//*[@role='button' and normalize-space()='{}']", t),
        format!("//*[@role='button' and contains(normalize-space(), '{}')]", t),
    ]
}

impl BrowserSession {
    /// Resolve a locator against the current render. Absence and query
    /// failures both read as an empty match set.
    fn resolve(&self, locator: &Locator) -> Vec<Element<'_>> {
        match locator {
            Locator::Css(selector) => self.tab().find_elements(selector).unwrap_or_default(),
            Locator::ButtonText(text) => cascade(button_text_xpaths(text), |xpath| {
                match self.tab().find_elements_by_xpath(&xpath) {
                    Ok(elements) if !elements.is_empty() => Some(elements),
                    _ => None,
                }
            })
            .unwrap_or_default(),
        }
    }

    /// Two-tier click: scroll into view and click directly; when the
    /// element is obstructed, retry once through forced JS dispatch.
    fn safe_click(&self, element: &Element<'_>) -> bool {
        let _ = element.scroll_into_view();
        match element.click() {
            Ok(_) => true,
            Err(err) => {
                debug!("Direct click failed ({}), retrying via forced dispatch", err);
                element
                    .call_js_fn("function() { this.click(); }", Vec::new(), false)
                    .is_ok()
            }
        }
    }

    /// Clear the field and type `text`; optionally send the submit key
    fn safe_type(&self, element: &Element<'_>, text: &str, submit: bool) -> bool {
        let _ = element.call_js_fn("function() { this.value = ''; }", Vec::new(), false);
        if element.type_into(text).is_err() {
            return false;
        }
        if submit && self.tab().press_key("Enter").is_err() {
            return false;
        }
        true
    }

    /// Bounded wait for the first match across a locator set. Expiry is a
    /// [`BotError::WaitTimeout`] naming `what` was waited for.
    pub async fn wait_for_first(&self, locators: &[Locator], what: &str) -> Result<UiHandle> {
        let deadline = Instant::now() + Duration::from_secs(self.wait_secs());
        loop {
            if let Some(handle) = self.find_first(locators).await {
                return Ok(handle);
            }
            if Instant::now() >= deadline {
                return Err(BotError::timeout(what, self.wait_secs()));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Bounded wait for the session cookie to appear
    pub async fn wait_for_session_cookie(&self) -> Result<()> {
        let deadline = Instant::now() + Duration::from_secs(self.wait_secs());
        loop {
            if self.has_session_cookie() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BotError::timeout("session cookie", self.wait_secs()));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl StepUi for BrowserSession {
    async fn find_first(&self, locators: &[Locator]) -> Option<UiHandle> {
        cascade(locators, |locator| {
            if self.resolve(locator).is_empty() {
                None
            } else {
                Some(UiHandle::new(locator.clone(), 0))
            }
        })
    }

    async fn find_all(&self, locator: &Locator) -> Vec<UiHandle> {
        let count = self.resolve(locator).len();
        (0..count)
            .map(|index| UiHandle::new(locator.clone(), index))
            .collect()
    }

    async fn act(&self, handle: &UiHandle, action: UiAction) -> bool {
        let elements = self.resolve(&handle.locator);
        let Some(element) = elements.get(handle.index) else {
            // Stale handle: the render changed since lookup
            debug!("Handle no longer resolves: {:?}", handle);
            return false;
        };
        match action {
            UiAction::Click => self.safe_click(element),
            UiAction::Type(text) => self.safe_type(element, &text, false),
            UiAction::TypeAndSubmit(text) => self.safe_type(element, &text, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_text_xpaths_prefer_exact_match() {
        let xpaths = button_text_xpaths("Continue");
        assert_eq!(xpaths.len(), 4);
        assert_eq!(xpaths[0], "//button[normalize-space()='Continue']");
        assert!(xpaths[1].contains("contains(normalize-space(), 'Continue')"));
        assert!(xpaths[2].starts_with("//*[@role='button'"));
    }

    #[test]
    fn button_text_xpaths_trim_whitespace() {
        let xpaths = button_text_xpaths("  Next ");
        assert_eq!(xpaths[0], "//button[normalize-space()='Next']");
    }
}
