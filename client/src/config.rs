//! Client configuration resolution and validation.
//!
//! Construction input is resolved exactly once: the access token comes from
//! the explicit argument, then the `SPARK_ACCESS_TOKEN` environment variable,
//! and otherwise construction fails. Nothing is read from the environment
//! after a session exists.

use std::fmt;
use std::time::Duration;

use reqwest::Url;
use tracing::debug;
use zeroize::Zeroize;

use crate::SparkError;

/// Default API root prefixed to every endpoint suffix.
pub const DEFAULT_BASE_URL: &str = "https://api.ciscospark.com/v1/";
/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Environment variable consulted when no access token is passed explicitly.
pub const ACCESS_TOKEN_ENV: &str = "SPARK_ACCESS_TOKEN";

/// Environment abstraction for credential lookups.
///
/// Lets tests supply variables without mutating the process environment.
pub trait SparkEnv {
    /// Fetch a string value by name.
    fn string(&self, name: &str) -> Option<String>;
}

/// Environment access backed by the real process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl SparkEnv for ProcessEnv {
    fn string(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Bearer token used to authenticate every request.
///
/// The value is never printed by `Debug` and is wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials(String);

impl Credentials {
    /// Wrap a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`SparkError::Configuration`] when the token is blank or
    /// contains characters that cannot appear in an HTTP header.
    pub fn new(token: impl Into<String>) -> Result<Self, SparkError> {
        let raw: String = token.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SparkError::configuration("access token must not be empty"));
        }
        if trimmed.chars().any(|ch| ch.is_control() || !ch.is_ascii()) {
            return Err(SparkError::configuration(
                "access token contains characters not allowed in an HTTP header",
            ));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw token text.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credentials(<redacted>)")
    }
}

impl Drop for Credentials {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Unvalidated client configuration.
///
/// # Examples
///
/// ```rust
/// use spark_client::config::{SparkConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
///
/// let config = SparkConfig::default();
/// assert!(config.access_token.is_none());
/// assert_eq!(config.base_url, DEFAULT_BASE_URL);
/// assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SparkConfig {
    /// Explicit access token; `None` defers to `SPARK_ACCESS_TOKEN`.
    pub access_token: Option<String>,
    /// API root that endpoint suffixes are joined onto.
    pub base_url: String,
    /// Per-request timeout in seconds; must be positive.
    pub timeout_secs: u64,
}

impl Default for SparkConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for SparkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparkConfig")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SparkConfig {
    /// Configuration with an explicit token and default URL and timeout.
    #[must_use]
    pub fn with_access_token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            ..Self::default()
        }
    }

    /// Resolve and validate the configuration against `env`.
    ///
    /// # Errors
    ///
    /// Returns [`SparkError::Configuration`] when no usable token is found,
    /// the base URL is not an absolute HTTP(S) URL, or the timeout is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use spark_client::config::{SparkConfig, SparkEnv};
    ///
    /// struct NoEnv;
    /// impl SparkEnv for NoEnv {
    ///     fn string(&self, _name: &str) -> Option<String> {
    ///         None
    ///     }
    /// }
    ///
    /// let settings = SparkConfig::with_access_token("token-123")
    ///     .resolve(&NoEnv)
    ///     .expect("explicit token resolves");
    /// assert_eq!(settings.credentials().expose(), "token-123");
    ///
    /// assert!(SparkConfig::default().resolve(&NoEnv).is_err());
    /// ```
    pub fn resolve<E: SparkEnv>(&self, env: &E) -> Result<SessionSettings, SparkError> {
        let credentials = resolve_access_token(self.access_token.as_deref(), env)?;
        SessionSettings::new(credentials, &self.base_url, self.timeout_secs)
    }
}

/// Validated settings a session is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    credentials: Credentials,
    base_url: Url,
    timeout: Duration,
}

impl SessionSettings {
    /// Validate a base URL and timeout alongside resolved credentials.
    ///
    /// # Errors
    ///
    /// Returns [`SparkError::Configuration`] for a blank or non-HTTP(S) base
    /// URL, or a zero timeout.
    pub fn new(
        credentials: Credentials,
        base_url: &str,
        timeout_secs: u64,
    ) -> Result<Self, SparkError> {
        let root = parse_base_url(base_url)?;
        if timeout_secs == 0 {
            return Err(SparkError::configuration(
                "timeout must be a positive number of seconds",
            ));
        }
        Ok(Self {
            credentials,
            base_url: root,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Bearer credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// API root, always ending in `/`.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Resolve the access token: explicit value, then environment, then error.
///
/// Blank values at either step count as absent.
///
/// # Errors
///
/// Returns [`SparkError::Configuration`] when neither source supplies a
/// usable token.
pub fn resolve_access_token<E: SparkEnv>(
    explicit: Option<&str>,
    env: &E,
) -> Result<Credentials, SparkError> {
    if let Some(token) = explicit.filter(|token| !token.trim().is_empty()) {
        return Credentials::new(token);
    }

    match env
        .string(ACCESS_TOKEN_ENV)
        .filter(|token| !token.trim().is_empty())
    {
        Some(token) => {
            debug!(source = ACCESS_TOKEN_ENV, "resolved access token from environment");
            Credentials::new(token)
        }
        None => Err(SparkError::configuration(format!(
            "an access token is required, either explicitly or via the {ACCESS_TOKEN_ENV} \
             environment variable; none was provided"
        ))),
    }
}

/// Parse and normalise the API root so endpoint suffixes join beneath it.
///
/// # Errors
///
/// Returns [`SparkError::Configuration`] for blank input, unparseable input,
/// non-HTTP(S) schemes, or URLs without a host.
pub fn parse_base_url(raw: &str) -> Result<Url, SparkError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SparkError::configuration("base URL must not be empty"));
    }

    let mut url = Url::parse(trimmed).map_err(|error| {
        SparkError::configuration(format!("invalid base URL '{trimmed}': {error}"))
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(SparkError::configuration(format!(
            "base URL '{trimmed}' must be an absolute http(s) URL"
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(SparkError::configuration(format!(
            "base URL '{trimmed}' must not carry a query or fragment"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
