//! Run configuration
//!
//! Configuration comes from two layers: CLI flags (with defaults) and an
//! optional JSON config file. Where the file supplies a key, the file wins;
//! where it omits one, the CLI value stands.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{BotError, Result};

/// Base URL of the story grid; relative story paths are appended to it.
pub const STORIES_URL: &str = "https://www.duolingo.com/stories";

/// Default step budget before the run gives up without error
pub const DEFAULT_MAX_STEPS: usize = 200;

/// Default upper bound, in seconds, for every bounded wait
pub const DEFAULT_WAIT_SECS: u64 = 20;

/// Full configuration for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Chrome user data directory, so an already-logged-in profile is reused
    #[serde(default)]
    pub user_data_dir: Option<PathBuf>,

    /// Chrome profile directory name (e.g. "Default", "Profile 1")
    #[serde(default = "default_profile_name")]
    pub profile_name: String,

    /// Run the browser headless
    #[serde(default)]
    pub headless: bool,

    /// Story path ("/en/es-juan-1") or full URL; None opens the story grid
    #[serde(default)]
    pub story_path: Option<String>,

    /// Maximum number of turns before the run ends in Exhausted
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Upper bound for each bounded wait, in seconds
    #[serde(default = "default_wait_secs")]
    pub wait_secs: u64,

    /// Username or email for login when the profile has no session
    #[serde(default)]
    pub username: Option<String>,

    /// Password for login; prompted for interactively when absent
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            user_data_dir: None,
            profile_name: default_profile_name(),
            headless: false,
            story_path: None,
            max_steps: default_max_steps(),
            wait_secs: default_wait_secs(),
            username: None,
            password: None,
        }
    }
}

impl BotConfig {
    /// Resolve the URL to open: a full URL as-is, a story path appended to
    /// the grid URL, or the bare grid when no story is configured.
    pub fn target_url(&self) -> String {
        match &self.story_path {
            Some(path) if path.starts_with("http") => path.clone(),
            Some(path) => format!("{}{}", STORIES_URL, path),
            None => STORIES_URL.to_string(),
        }
    }

    /// Whether the run opens the bare story grid (and must pick a card)
    pub fn opens_grid(&self) -> bool {
        self.story_path.is_none()
    }

    /// Overlay values from a config file. File values take precedence
    /// wherever the file supplies the key.
    pub fn apply(&mut self, overlay: ConfigOverlay) {
        if let Some(v) = overlay.user_data_dir {
            self.user_data_dir = Some(v);
        }
        if let Some(v) = overlay.profile_name {
            self.profile_name = v;
        }
        if let Some(v) = overlay.headless {
            self.headless = v;
        }
        if let Some(v) = overlay.story_path {
            self.story_path = Some(v);
        }
        if let Some(v) = overlay.max_steps {
            self.max_steps = v;
        }
        if let Some(v) = overlay.wait_secs {
            self.wait_secs = v;
        }
        if let Some(v) = overlay.username {
            self.username = Some(v);
        }
        if let Some(v) = overlay.password {
            self.password = Some(v);
        }
    }

    /// Validate values the loop depends on
    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(BotError::Config("max_steps must be at least 1".to_string()));
        }
        if self.wait_secs == 0 {
            return Err(BotError::Config("wait_secs must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Partial configuration read from a JSON file; every key optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigOverlay {
    #[serde(default)]
    pub user_data_dir: Option<PathBuf>,
    #[serde(default)]
    pub profile_name: Option<String>,
    #[serde(default)]
    pub headless: Option<bool>,
    #[serde(default)]
    pub story_path: Option<String>,
    #[serde(default)]
    pub max_steps: Option<usize>,
    #[serde(default)]
    pub wait_secs: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl ConfigOverlay {
    /// Load an overlay from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let overlay = serde_json::from_str(&contents)?;
        Ok(overlay)
    }
}

fn default_profile_name() -> String {
    "Default".to_string()
}

fn default_max_steps() -> usize {
    DEFAULT_MAX_STEPS
}

fn default_wait_secs() -> u64 {
    DEFAULT_WAIT_SECS
}
