//! Browser session and UI query facade for storybot
//!
//! This is the only crate that talks to a real browser, over the Chrome
//! DevTools Protocol via `headless_chrome`. It provides:
//!
//! - [`session`]: browser lifecycle, navigation, bounded waits
//! - [`query`]: the [`storybot_core::StepUi`] implementation: locator
//!   resolution and the safe action executor
//! - [`login`]: session bootstrapping (cookie check, credential submission)
//! - [`opener`]: navigating to a story and opening a card from the grid
//!
//! Everything above this crate (the strategy engine, the step loop) sees
//! only the `StepUi` trait and never a live element reference.

pub mod login;
pub mod opener;
pub mod query;
pub mod session;

pub use login::{ensure_authenticated, CredentialProvider, Credentials};
pub use opener::open_story;
pub use session::{BrowserSession, SessionConfig, HOMEPAGE_URL};
