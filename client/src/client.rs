//! Client facade bundling every resource wrapper over one session.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;

use crate::api::{
    AccessTokensApi, MembershipsApi, MessagesApi, PeopleApi, RoomsApi, TeamMembershipsApi,
    TeamsApi, WebhooksApi,
};
use crate::config::{ProcessEnv, SparkConfig, SparkEnv};
use crate::{RestSession, SparkError};

/// Entry point to the Spark API.
///
/// # Examples
///
/// ```rust,no_run
/// use spark_client::{SparkClient, SparkConfig};
///
/// let client = SparkClient::new(&SparkConfig::default())?;
/// let me = client.people().me()?;
/// println!("{}", me.display_name().unwrap_or("unknown"));
/// # Ok::<(), spark_client::SparkError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SparkClient {
    session: Arc<RestSession>,
    people: PeopleApi,
    rooms: RoomsApi,
    memberships: MembershipsApi,
    messages: MessagesApi,
    teams: TeamsApi,
    team_memberships: TeamMembershipsApi,
    webhooks: WebhooksApi,
    access_tokens: AccessTokensApi,
}

impl SparkClient {
    /// Build a client, falling back to `SPARK_ACCESS_TOKEN` for the token.
    ///
    /// # Errors
    ///
    /// Returns [`SparkError::Configuration`] when no token is available or
    /// the base URL or timeout is invalid.
    pub fn new(config: &SparkConfig) -> Result<Self, SparkError> {
        Self::with_env(config, &ProcessEnv)
    }

    /// Build a client resolving the token fallback through `env`.
    ///
    /// # Errors
    ///
    /// Returns [`SparkError::Configuration`] when no token is available or
    /// the base URL or timeout is invalid.
    pub fn with_env<E: SparkEnv>(config: &SparkConfig, env: &E) -> Result<Self, SparkError> {
        let settings = config.resolve(env)?;
        Ok(Self::from_session(RestSession::new(settings)?))
    }

    /// Wrap an existing session.
    #[must_use]
    pub fn from_session(session: RestSession) -> Self {
        let shared = Arc::new(session);
        Self {
            people: PeopleApi::new(Arc::clone(&shared)),
            rooms: RoomsApi::new(Arc::clone(&shared)),
            memberships: MembershipsApi::new(Arc::clone(&shared)),
            messages: MessagesApi::new(Arc::clone(&shared)),
            teams: TeamsApi::new(Arc::clone(&shared)),
            team_memberships: TeamMembershipsApi::new(Arc::clone(&shared)),
            webhooks: WebhooksApi::new(Arc::clone(&shared)),
            access_tokens: AccessTokensApi::new(Arc::clone(&shared)),
            session: shared,
        }
    }

    /// Underlying session, for endpoints without a wrapper.
    #[must_use]
    pub fn session(&self) -> &RestSession {
        &self.session
    }

    /// Bearer token in use.
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.session.access_token()
    }

    /// API root.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.session.base_url()
    }

    /// Per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.session.timeout()
    }

    /// People wrapper.
    #[must_use]
    pub const fn people(&self) -> &PeopleApi {
        &self.people
    }

    /// Rooms wrapper.
    #[must_use]
    pub const fn rooms(&self) -> &RoomsApi {
        &self.rooms
    }

    /// Room memberships wrapper.
    #[must_use]
    pub const fn memberships(&self) -> &MembershipsApi {
        &self.memberships
    }

    /// Messages wrapper.
    #[must_use]
    pub const fn messages(&self) -> &MessagesApi {
        &self.messages
    }

    /// Teams wrapper.
    #[must_use]
    pub const fn teams(&self) -> &TeamsApi {
        &self.teams
    }

    /// Team memberships wrapper.
    #[must_use]
    pub const fn team_memberships(&self) -> &TeamMembershipsApi {
        &self.team_memberships
    }

    /// Webhooks wrapper.
    #[must_use]
    pub const fn webhooks(&self) -> &WebhooksApi {
        &self.webhooks
    }

    /// OAuth token exchange wrapper.
    #[must_use]
    pub const fn access_tokens(&self) -> &AccessTokensApi {
        &self.access_tokens
    }
}
