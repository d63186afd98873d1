//! Login against the job board
//!
//! Logging in is optional for crawling but unlocks fields the site hides from
//! anonymous visitors (salary in particular).

use crate::config::{AuthConfig, SiteConfig};
use crate::crawler::selectors::login;
use crate::source::{PageSource, SourceError};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Authentication failures
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Login rejected: invalid credentials")]
    InvalidCredentials,

    #[error("Login timed out waiting for {0}")]
    Timeout(String),

    #[error("Login page error: {0}")]
    Source(SourceError),

    #[error("Invalid login URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Login failed after {0} attempt(s)")]
    Exhausted(u32),
}

impl From<SourceError> for AuthError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Timeout { what, .. } => AuthError::Timeout(what),
            SourceError::LandmarkMissing { selector } => AuthError::Timeout(selector),
            other => AuthError::Source(other),
        }
    }
}

/// Login credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Stored credentials, when both halves are present and non-empty
    pub fn from_config(config: &AuthConfig) -> Option<Self> {
        match (config.username.as_deref(), config.password.as_deref()) {
            (Some(user), Some(pass)) if !user.trim().is_empty() && !pass.is_empty() => {
                Some(Self::new(user.trim(), pass))
            }
            _ => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Drives the site's email login form
#[derive(Debug, Clone)]
pub struct Authenticator {
    login_url: Url,
    timeout: Duration,
    max_attempts: u32,
}

impl Authenticator {
    pub fn new(site: &SiteConfig, auth: &AuthConfig) -> Result<Self, AuthError> {
        let login_url = Url::parse(&site.base_url)?.join(&site.login_path)?;
        Ok(Self {
            login_url,
            timeout: Duration::from_secs(auth.timeout_secs),
            max_attempts: auth.max_attempts,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Performs one login attempt
    pub async fn login<S: PageSource + ?Sized>(
        &self,
        source: &mut S,
        credentials: &Credentials,
    ) -> Result<(), AuthError> {
        tracing::debug!("Opening login page {}", self.login_url);
        source.navigate(&self.login_url).await?;

        source.wait_for(login::EMAIL_LOGIN_LINK, self.timeout).await?;
        source.click(login::EMAIL_LOGIN_LINK).await?;

        source.wait_for(login::EMAIL_INPUT, self.timeout).await?;
        source.type_text(login::EMAIL_INPUT, &credentials.username).await?;
        source.wait_for(login::PASSWORD_INPUT, self.timeout).await?;
        source.type_text(login::PASSWORD_INPUT, &credentials.password).await?;
        source.click(login::SUBMIT).await?;

        match source
            .wait_for_any(&[login::USER_MENU, login::ERROR], self.timeout)
            .await?
        {
            0 => Ok(()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    /// Retries [`login`](Self::login) up to the configured number of attempts
    ///
    /// `next_credentials` is asked before every attempt with the attempt
    /// number and the previous failure; returning `None` stops early.
    pub async fn login_with_attempts<S, F>(
        &self,
        source: &mut S,
        mut next_credentials: F,
    ) -> Result<String, AuthError>
    where
        S: PageSource + ?Sized,
        F: FnMut(u32, Option<&AuthError>) -> Option<Credentials>,
    {
        let mut last_error: Option<AuthError> = None;

        for attempt in 1..=self.max_attempts {
            let Some(credentials) = next_credentials(attempt, last_error.as_ref()) else {
                break;
            };

            match self.login(source, &credentials).await {
                Ok(()) => {
                    tracing::info!("Logged in as {}", credentials.username);
                    return Ok(credentials.username);
                }
                Err(e) => {
                    tracing::warn!(
                        "Login attempt {}/{} failed: {}",
                        attempt,
                        self.max_attempts,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(AuthError::Exhausted(self.max_attempts))
    }
}
