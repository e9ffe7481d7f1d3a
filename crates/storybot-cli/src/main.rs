//! storybot CLI: drive a story-based exercise flow to completion
//!
//! Usage:
//!   storybot                               Open the story grid, play the first story
//!   storybot --story /en/es-juan-1         Play a specific story
//!   storybot --config bot.json             Take settings from a JSON file
//!
//! Exit code 0 means the run reached a stopping point (flow completed or
//! step budget spent); non-zero means login failure, a page-load timeout,
//! or a browser infrastructure error.

use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use storybot_browser::{
    ensure_authenticated, open_story, BrowserSession, CredentialProvider, Credentials,
    SessionConfig, HOMEPAGE_URL,
};
use storybot_core::{BotConfig, BotError, ConfigOverlay, RunStatus};
use storybot_engine::{ActionResolver, CompletionDetector, RandomChoice, StepLoop};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Cooldown before releasing the session, so the final screen settles
const EXIT_COOLDOWN: Duration = Duration::from_millis(1500);

#[derive(Parser)]
#[command(name = "storybot")]
#[command(version, about = "Auto-complete a story exercise flow to keep a streak alive")]
struct Cli {
    /// Chrome user data directory (reuses your profile's session cookies)
    #[arg(long)]
    user_data_dir: Option<PathBuf>,

    /// Chrome profile directory name (e.g. "Default", "Profile 1")
    #[arg(long, default_value = "Default")]
    profile_name: String,

    /// Run Chrome in headless mode
    #[arg(long)]
    headless: bool,

    /// Story path (e.g. "/en/es-juan-1") or full URL; omit for the grid
    #[arg(long)]
    story: Option<String>,

    /// Maximum turns before giving up without error
    #[arg(long, default_value = "200")]
    max_steps: usize,

    /// Upper bound for each bounded wait, in seconds
    #[arg(long, default_value = "20")]
    wait_secs: u64,

    /// Username or email for login
    #[arg(long)]
    username: Option<String>,

    /// Password (omit to be prompted securely when login is needed)
    #[arg(long)]
    password: Option<String>,

    /// JSON config file; its keys override the flags above
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Build the run configuration: flags first, then the config file
    /// overlay wherever it supplies a key
    fn into_config(self) -> Result<BotConfig> {
        let mut cfg = BotConfig {
            user_data_dir: self.user_data_dir,
            profile_name: self.profile_name,
            headless: self.headless,
            story_path: self.story,
            max_steps: self.max_steps,
            wait_secs: self.wait_secs,
            username: self.username,
            password: self.password,
        };
        if let Some(path) = self.config {
            cfg.apply(ConfigOverlay::load(&path)?);
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Prompts interactively for whatever the flags and config left unset
struct PromptingProvider {
    username: Option<String>,
    password: Option<String>,
}

impl CredentialProvider for PromptingProvider {
    fn credentials(&self) -> storybot_core::Result<Credentials> {
        let username = match &self.username {
            Some(u) => u.clone(),
            None => prompt_line("Username or email: ")?,
        };
        let password = match &self.password {
            Some(p) => p.clone(),
            None => rpassword::prompt_password("Password: ").map_err(BotError::Io)?,
        };
        if username.is_empty() || password.is_empty() {
            return Err(BotError::Auth(
                "credentials are required to log in automatically".to_string(),
            ));
        }
        Ok(Credentials { username, password })
    }
}

fn prompt_line(prompt: &str) -> storybot_core::Result<String> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cfg = cli.into_config()?;

    let status = run(cfg).await?;
    match status {
        RunStatus::Completed => info!("Story completed"),
        RunStatus::Exhausted => info!("Step budget spent without reaching the end; stopping"),
        _ => unreachable!("loop only returns stopping-point statuses"),
    }
    Ok(())
}

/// Launch, drive, and unconditionally release the session
async fn run(cfg: BotConfig) -> Result<RunStatus> {
    let session = BrowserSession::launch_with_config(SessionConfig::from(&cfg)).await?;
    let result = drive(&session, &cfg).await;
    let closed = session.close().await;
    let status = result?;
    closed?;
    Ok(status)
}

async fn drive(session: &BrowserSession, cfg: &BotConfig) -> storybot_core::Result<RunStatus> {
    session.navigate(HOMEPAGE_URL).await?;
    session.wait_for_body().await?;

    let provider = PromptingProvider {
        username: cfg.username.clone(),
        password: cfg.password.clone(),
    };
    ensure_authenticated(session, &provider).await?;

    open_story(session, cfg).await?;

    let step_loop = StepLoop::new(
        ActionResolver::new(Arc::new(RandomChoice)),
        CompletionDetector::new(),
        cfg.max_steps,
    );
    let state = step_loop.run(session).await?;

    tokio::time::sleep(EXIT_COOLDOWN).await;
    Ok(state.status())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_config() {
        let cli = Cli::parse_from([
            "storybot",
            "--story",
            "/en/es-juan-1",
            "--max-steps",
            "10",
            "--headless",
            "--username",
            "user@example.com",
        ]);
        let cfg = cli.into_config().unwrap();
        assert_eq!(cfg.story_path.as_deref(), Some("/en/es-juan-1"));
        assert_eq!(cfg.max_steps, 10);
        assert!(cfg.headless);
        assert_eq!(cfg.username.as_deref(), Some("user@example.com"));
        // Unset flags fall back to the documented defaults
        assert_eq!(cfg.wait_secs, 20);
        assert_eq!(cfg.profile_name, "Default");
    }

    #[test]
    fn defaults_without_flags() {
        let cfg = Cli::parse_from(["storybot"]).into_config().unwrap();
        assert_eq!(cfg.max_steps, 200);
        assert!(cfg.story_path.is_none());
        assert!(!cfg.headless);
    }

    #[test]
    fn static_provider_skips_prompting() {
        let provider = PromptingProvider {
            username: Some("u".to_string()),
            password: Some("p".to_string()),
        };
        let creds = provider.credentials().unwrap();
        assert_eq!(creds.username, "u");
        assert_eq!(creds.password, "p");
    }
}
