//! Browser lifecycle management over the Chrome DevTools Protocol
//!
//! One [`BrowserSession`] is created per run, exclusively owned by the run,
//! and released on every exit path (dropping the session kills the browser
//! process). All waits here are bounded; expiry surfaces as
//! [`BotError::WaitTimeout`], never an indefinite hang.

use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;
use storybot_core::{BotConfig, BotError, Result};
use tracing::{debug, info};

/// Homepage loaded before login to establish the session context
pub const HOMEPAGE_URL: &str = "https://www.duolingo.com/";

/// Cookie whose presence marks an authenticated session
pub const SESSION_COOKIE: &str = "jwt_token";

/// Configuration for browser launch
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Chrome user data directory; reusing a real profile skips login
    pub user_data_dir: Option<std::path::PathBuf>,
    /// Chrome profile directory name
    pub profile_name: String,
    /// Run in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Upper bound for each bounded wait, in seconds
    pub wait_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_data_dir: None,
            profile_name: "Default".to_string(),
            headless: false,
            window_width: 1280,
            window_height: 1000,
            wait_secs: storybot_core::DEFAULT_WAIT_SECS,
        }
    }
}

impl From<&BotConfig> for SessionConfig {
    fn from(cfg: &BotConfig) -> Self {
        Self {
            user_data_dir: cfg.user_data_dir.clone(),
            profile_name: cfg.profile_name.clone(),
            headless: cfg.headless,
            wait_secs: cfg.wait_secs,
            ..Default::default()
        }
    }
}

/// Active browser session, exclusively owned by one run
pub struct BrowserSession {
    /// Underlying browser instance (kept alive for tab lifetime)
    #[allow(dead_code)]
    browser: Browser,
    /// Current active tab
    tab: Arc<Tab>,
    /// Configuration
    config: SessionConfig,
}

/// Pull a string out of a script evaluation result; non-strings read as
/// empty rather than failing the caller
fn script_string(value: serde_json::Value) -> String {
    value.as_str().unwrap_or("").to_string()
}

impl BrowserSession {
    /// Launch browser with custom configuration
    pub async fn launch_with_config(config: SessionConfig) -> Result<Self> {
        info!(
            "Launching browser (headless: {}, size: {}x{})",
            config.headless, config.window_width, config.window_height
        );

        let mut launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some((config.window_width, config.window_height)))
            .build()
            .map_err(|e| BotError::Browser(format!("Failed to build launch options: {}", e)))?;

        // Profile args must outlive Browser::new, which borrows them
        let mut extra_args: Vec<String> = vec![
            "--disable-gpu".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--no-sandbox".to_string(),
        ];
        if let Some(ref dir) = config.user_data_dir {
            extra_args.push(format!("--user-data-dir={}", dir.display()));
            extra_args.push(format!("--profile-directory={}", config.profile_name));
        }
        for arg in &extra_args {
            launch_options.args.push(OsStr::new(arg));
        }

        let browser = Browser::new(launch_options)
            .map_err(|e| BotError::Browser(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| BotError::Browser(format!("Failed to create tab: {}", e)))?;

        info!("Browser launched successfully");

        Ok(Self {
            browser,
            tab,
            config,
        })
    }

    /// Navigate to a URL and wait for the navigation to settle
    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);

        self.tab
            .navigate_to(url)
            .map_err(|e| BotError::Browser(format!("Failed to navigate to {}: {}", url, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|_| BotError::timeout(format!("navigation to {}", url), self.config.wait_secs))?;

        info!("Successfully navigated to {}", url);
        Ok(())
    }

    /// Wait for the page body to be present (page-load gate)
    pub async fn wait_for_body(&self) -> Result<()> {
        let timeout = Duration::from_secs(self.config.wait_secs);
        self.tab
            .wait_for_element_with_custom_timeout("body", timeout)
            .map_err(|_| BotError::timeout("page body", self.config.wait_secs))?;
        Ok(())
    }

    /// Whether the session-identifying cookie is present with a value.
    /// Cookie-store failures read as "not logged in", not as errors.
    pub fn has_session_cookie(&self) -> bool {
        match self.tab.get_cookies() {
            Ok(cookies) => cookies
                .iter()
                .any(|c| c.name == SESSION_COOKIE && !c.value.is_empty()),
            Err(_) => false,
        }
    }

    /// Execute JavaScript in the page context and return its JSON result
    pub async fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        debug!("Evaluating JavaScript: {}", script);

        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| BotError::Browser(format!("JavaScript evaluation failed: {}", e)))?;

        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    /// Current page URL
    pub async fn current_url(&self) -> Result<String> {
        let result = self.evaluate("window.location.href").await?;
        Ok(script_string(result))
    }

    /// Configured per-wait upper bound in seconds
    pub fn wait_secs(&self) -> u64 {
        self.config.wait_secs
    }

    pub(crate) fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Close the browser session
    pub async fn close(self) -> Result<()> {
        info!("Closing browser session");
        // Browser is dropped and the process cleaned up automatically
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        debug!("BrowserSession dropped, browser will be cleaned up");
    }
}
