//! UI query abstractions
//!
//! The driver never holds live element references across turns. A
//! [`UiHandle`] names an element positionally within the current render
//! (locator plus match index) and is re-resolved at action time, so a
//! re-render between lookup and action degrades to a failed action, never
//! a crash.

use async_trait::async_trait;

/// A declarative query identifying zero or more nodes in a render
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// CSS selector, matched via the DOM query engine
    Css(String),
    /// Visible text of a button-like node; compiled to several
    /// structural queries (button text, role=button text, substrings)
    ButtonText(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn button_text(text: impl Into<String>) -> Self {
        Locator::ButtonText(text.into())
    }
}

/// Ordered locator preferences: earlier entries are tried first and a
/// match short-circuits the rest
pub type LocatorSet = Vec<Locator>;

/// Ephemeral reference to one node in the current render.
///
/// Valid for a single turn only; the page re-rendering invalidates it.
/// Acting on a stale handle reports failure instead of raising.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UiHandle {
    pub locator: Locator,
    pub index: usize,
}

impl UiHandle {
    pub fn new(locator: Locator, index: usize) -> Self {
        Self { locator, index }
    }
}

/// Primitive interaction applied to a handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Scroll into view and click
    Click,
    /// Clear the field and type the text
    Type(String),
    /// Clear the field, type the text, send the submit key
    TypeAndSubmit(String),
}

/// Result of one strategy attempt or one resolver turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A real UI mutation was attempted
    Acted,
    /// Nothing applicable in this render; no side effect performed
    NoMatch,
}

impl ActionOutcome {
    pub fn acted(&self) -> bool {
        matches!(self, ActionOutcome::Acted)
    }
}

/// Query-and-act surface over the current render.
///
/// Implemented by the live browser session and by scripted fakes in
/// tests. Queries are read-only and absorb absence; `act` absorbs
/// ordinary interaction failures (stale handle, still obstructed after
/// the forced-dispatch retry) and reports them as `false`. Genuine
/// infrastructure faults surface through the session APIs, not here.
#[async_trait]
pub trait StepUi: Send + Sync {
    /// First live match across the ordered locator set, or None
    async fn find_first(&self, locators: &[Locator]) -> Option<UiHandle>;

    /// All live matches for one locator, possibly empty
    async fn find_all(&self, locator: &Locator) -> Vec<UiHandle>;

    /// Scoped interaction executor: scroll into view, try the primitive
    /// action, retry once through forced dispatch when obstructed.
    /// Returns whether the action was performed.
    async fn act(&self, handle: &UiHandle, action: UiAction) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_acted_predicate() {
        assert!(ActionOutcome::Acted.acted());
        assert!(!ActionOutcome::NoMatch.acted());
    }

    #[test]
    fn handles_compare_by_locator_and_index() {
        let a = UiHandle::new(Locator::css("[data-test='x']"), 0);
        let b = UiHandle::new(Locator::css("[data-test='x']"), 0);
        let c = UiHandle::new(Locator::css("[data-test='x']"), 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
