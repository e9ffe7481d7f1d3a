//! # storybot-core
//!
//! Shared types for the storybot exercise-flow driver.
//!
//! The driver completes a multi-step guided exercise flow rendered by a
//! third-party web UI. It has no control over that UI's markup stability or
//! pacing, so everything here is built around one assumption: any element
//! reference is stale the moment the page re-renders.
//!
//! ## Core paradigm
//!
//! - Locators are declarative and ordered; earlier entries are preferred
//! - Element handles live for a single render, never cached across turns
//! - Absence of an element is normal control flow, never an error
//! - Only infrastructure faults (disconnect, timeout, auth) are errors

mod cascade;
mod config;
mod error;
mod run_state;
mod ui;

pub use cascade::cascade;
pub use config::{BotConfig, ConfigOverlay, DEFAULT_MAX_STEPS, DEFAULT_WAIT_SECS, STORIES_URL};
pub use error::{BotError, Result};
pub use run_state::{RunState, RunStatus};
pub use ui::{ActionOutcome, Locator, LocatorSet, StepUi, UiAction, UiHandle};
