//! Strategy library, action resolver, and step loop for storybot
//!
//! This crate holds the heuristic action-resolution engine and is entirely
//! browser-free: it sees the UI only through the [`storybot_core::StepUi`]
//! trait, so every property here is tested against a scripted fake.
//!
//! - [`strategy`]: one self-contained policy per step class
//! - [`resolver`]: fixed-priority dispatch over the strategies
//! - [`completion`]: terminal-marker detection
//! - [`controller`]: the step loop, budget, and pacing

pub mod choice;
pub mod completion;
pub mod controller;
pub mod resolver;
pub mod strategy;

#[cfg(test)]
pub(crate) mod testutil;

pub use choice::{ChoicePolicy, RandomChoice};
pub use completion::CompletionDetector;
pub use controller::StepLoop;
pub use resolver::ActionResolver;
pub use strategy::{
    ChoiceStrategy, ProgressionStrategy, Strategy, TextFillStrategy, TokenTapStrategy,
};
