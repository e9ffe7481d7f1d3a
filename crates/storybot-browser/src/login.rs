//! Session bootstrapping
//!
//! The run is authenticated when the session cookie is present. A reused
//! Chrome profile usually already carries it; otherwise credentials are
//! obtained from the [`CredentialProvider`] and submitted through the
//! login form. Every wait here is bounded by the configured timeout.

use storybot_core::{BotError, Locator, LocatorSet, Result, StepUi, UiAction};
use tracing::{debug, info};

use crate::session::BrowserSession;

/// Login form URL
pub const LOGIN_URL: &str = "https://www.duolingo.com/log-in";

/// Authentication credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Source of credentials, consulted only when the session has no cookie.
/// The CLI supplies an implementation that prompts interactively for
/// whatever its flags and config file left unset.
pub trait CredentialProvider: Send + Sync {
    fn credentials(&self) -> Result<Credentials>;
}

/// Static credentials, for non-interactive callers
impl CredentialProvider for Credentials {
    fn credentials(&self) -> Result<Credentials> {
        Ok(self.clone())
    }
}

fn identifier_locators() -> LocatorSet {
    vec![
        Locator::css("[data-test='email-input'] input"),
        Locator::css("[data-test='email-input']"),
        Locator::css("input[name='identifier']"),
        Locator::css("input[name='login']"),
        Locator::css("input[name='email']"),
        Locator::css("input[name='username']"),
        Locator::css("input[type='email']"),
        Locator::css("input[autocomplete='username']"),
    ]
}

fn password_locators() -> LocatorSet {
    vec![
        Locator::css("[data-test='password-input'] input"),
        Locator::css("[data-test='password-input']"),
        Locator::css("input[name='password']"),
        Locator::css("input[type='password']"),
        Locator::css("input[autocomplete='current-password']"),
    ]
}

fn submit_locators() -> LocatorSet {
    vec![
        Locator::css("button[data-test='register-button']"),
        Locator::css("button[data-test='login-button']"),
        Locator::css("button[data-test='have-account']"),
        Locator::css("button[type='submit']"),
        Locator::css("[data-test='confirm-button']"),
    ]
}

/// A cookie wait that expires means the login itself failed, not the
/// infrastructure; other failures keep their original shape
fn cookie_wait_failure(err: BotError) -> BotError {
    match err {
        BotError::WaitTimeout { .. } => BotError::Auth(
            "login did not complete within the configured wait".to_string(),
        ),
        other => other,
    }
}

/// Ensure the session is authenticated before the step loop starts.
///
/// Success criterion is the presence of the session cookie. When login is
/// needed and the cookie does not appear within the configured wait after
/// submission, the run fails with [`BotError::Auth`].
pub async fn ensure_authenticated(
    session: &BrowserSession,
    provider: &dyn CredentialProvider,
) -> Result<()> {
    if session.has_session_cookie() {
        info!("Session cookie present, skipping login");
        return Ok(());
    }

    let creds = provider.credentials()?;
    info!("No session cookie, logging in as {}", creds.username);

    session.navigate(LOGIN_URL).await?;

    let identifier = session
        .wait_for_first(&identifier_locators(), "login form")
        .await?;
    let password = session
        .wait_for_first(&password_locators(), "password input")
        .await?;

    if !session
        .act(&identifier, UiAction::Type(creds.username.clone()))
        .await
    {
        return Err(BotError::Auth("could not fill the identifier field".to_string()));
    }
    if !session
        .act(&password, UiAction::Type(creds.password.clone()))
        .await
    {
        return Err(BotError::Auth("could not fill the password field".to_string()));
    }

    // Submit via the button cascade; fall back to Enter in the password
    // field when no recognizable button exists
    let submitted = match session.find_first(&submit_locators()).await {
        Some(button) => session.act(&button, UiAction::Click).await,
        None => false,
    };
    if !submitted {
        debug!("No login button matched, submitting with Enter");
        if !session
            .act(&password, UiAction::TypeAndSubmit(creds.password.clone()))
            .await
        {
            return Err(BotError::Auth("could not submit the login form".to_string()));
        }
    }

    session
        .wait_for_session_cookie()
        .await
        .map_err(cookie_wait_failure)?;

    info!("Login completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_cascade_prefers_data_test_markers() {
        let locators = identifier_locators();
        assert_eq!(locators[0], Locator::css("[data-test='email-input'] input"));
        // Attribute-name fallbacks follow
        assert!(locators.contains(&Locator::css("input[name='identifier']")));
        assert!(locators.contains(&Locator::css("input[autocomplete='username']")));
    }

    #[test]
    fn password_cascade_covers_type_and_autocomplete() {
        let locators = password_locators();
        assert_eq!(locators[0], Locator::css("[data-test='password-input'] input"));
        assert!(locators.contains(&Locator::css("input[type='password']")));
    }

    #[test]
    fn static_credentials_provider_returns_clone() {
        let creds = Credentials {
            username: "user@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let resolved = creds.credentials().unwrap();
        assert_eq!(resolved.username, "user@example.com");
        assert_eq!(resolved.password, "hunter2");
    }

    #[test]
    fn expired_cookie_wait_reads_as_auth_failure() {
        let err = cookie_wait_failure(BotError::timeout("session cookie", 20));
        assert!(matches!(err, BotError::Auth(_)));
        assert!(err.to_string().contains("login did not complete"));
    }

    #[test]
    fn other_cookie_wait_failures_keep_their_shape() {
        let err = cookie_wait_failure(BotError::Browser("CDP disconnect".to_string()));
        assert!(matches!(err, BotError::Browser(_)));
    }
}
