//! OAuth access token exchange.
//!
//! These calls authenticate with the integration's client secret in a form
//! body, so they bypass the session's bearer credentials.

use std::sync::Arc;

use super::require;
use crate::SparkError;
use crate::records::{AccessToken, decode_record};
use crate::session::RestSession;

const ENDPOINT: &str = "access_token";

/// Access token wrapper.
#[derive(Debug, Clone)]
pub struct AccessTokensApi {
    session: Arc<RestSession>,
}

impl AccessTokensApi {
    pub(crate) const fn new(session: Arc<RestSession>) -> Self {
        Self { session }
    }

    /// Exchange an authorization code for tokens.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn get(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AccessToken, SparkError> {
        require("client_id", client_id)?;
        require("client_secret", client_secret)?;
        require("code", code)?;
        require("redirect_uri", redirect_uri)?;
        self.exchange(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ])
    }

    /// Obtain a fresh access token from a refresh token.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn refresh(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<AccessToken, SparkError> {
        require("client_id", client_id)?;
        require("client_secret", client_secret)?;
        require("refresh_token", refresh_token)?;
        self.exchange(&[
            ("grant_type", "refresh_token"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
        ])
    }

    fn exchange(&self, fields: &[(&str, &str)]) -> Result<AccessToken, SparkError> {
        let owned = fields
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        decode_record(self.session.post_form(ENDPOINT, owned)?)
    }
}
