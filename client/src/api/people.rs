//! People: directory lookups and the authenticated user.

use std::sync::Arc;

use super::{Resource, require_optional};
use crate::SparkError;
use crate::records::{Person, RecordIter, decode_record};
use crate::session::{QueryParams, RestSession};

/// Filters for [`PeopleApi::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeopleQuery {
    /// Exact email address.
    pub email: Option<String>,
    /// Display name prefix.
    pub display_name: Option<String>,
    /// Page size hint.
    pub max: Option<u32>,
}

/// People wrapper.
#[derive(Debug, Clone)]
pub struct PeopleApi {
    resource: Resource,
}

impl PeopleApi {
    pub(crate) const fn new(session: Arc<RestSession>) -> Self {
        Self {
            resource: Resource::new(session, "people"),
        }
    }

    /// List people matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SparkError::Configuration`] for a blank filter value.
    pub fn list(&self, query: &PeopleQuery) -> Result<RecordIter<'_, Person>, SparkError> {
        require_optional("email", query.email.as_deref())?;
        require_optional("displayName", query.display_name.as_deref())?;
        let params = QueryParams::new()
            .with_optional("email", query.email.as_deref())
            .with_optional("displayName", query.display_name.as_deref())
            .with_optional("max", query.max);
        Ok(self.resource.list(params))
    }

    /// Fetch one person.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn get(&self, person_id: &str) -> Result<Person, SparkError> {
        self.resource.get("personId", person_id)
    }

    /// Fetch the person the access token belongs to.
    ///
    /// # Errors
    ///
    /// Propagates session failures.
    pub fn me(&self) -> Result<Person, SparkError> {
        decode_record(
            self.resource
                .session
                .get("people/me", &QueryParams::new())?,
        )
    }
}
