//! Resource wrappers.
//!
//! Each wrapper maps one API operation onto exactly one [`RestSession`] call
//! and decodes the answer into a record. Arguments are validated before any
//! request is sent.

mod access_tokens;
mod memberships;
mod messages;
mod people;
mod rooms;
mod team_memberships;
mod teams;
mod webhooks;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::SparkError;
use crate::records::{RecordIter, decode_record};
use crate::session::{QueryParams, RestSession};

pub use access_tokens::AccessTokensApi;
pub use memberships::{MembershipsApi, MembershipsQuery};
pub use messages::{MessageContent, MessageTarget, MessagesApi, MessagesQuery};
pub use people::{PeopleApi, PeopleQuery};
pub use rooms::{RoomsApi, RoomsQuery};
pub use team_memberships::TeamMembershipsApi;
pub use teams::TeamsApi;
pub use webhooks::{NewWebhook, WebhooksApi};

/// Identifies a person by id or by email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonRef {
    /// Person identifier.
    Id(String),
    /// Primary email address.
    Email(String),
}

impl PersonRef {
    fn validate(&self) -> Result<(), SparkError> {
        match self {
            Self::Id(id) => require("personId", id),
            Self::Email(email) => require("personEmail", email),
        }
    }
}

/// Body fields shared by room and team membership creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PersonFields<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    person_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    person_email: Option<&'a str>,
}

impl<'a> From<&'a PersonRef> for PersonFields<'a> {
    fn from(person: &'a PersonRef) -> Self {
        match person {
            PersonRef::Id(id) => Self {
                person_id: Some(id.as_str()),
                person_email: None,
            },
            PersonRef::Email(email) => Self {
                person_id: None,
                person_email: Some(email.as_str()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModeratorUpdate {
    is_moderator: bool,
}

/// Shared plumbing for the resource wrappers.
#[derive(Debug, Clone)]
struct Resource {
    session: Arc<RestSession>,
    collection: &'static str,
}

impl Resource {
    const fn new(session: Arc<RestSession>, collection: &'static str) -> Self {
        Self {
            session,
            collection,
        }
    }

    fn item_endpoint(&self, field: &str, id: &str) -> Result<String, SparkError> {
        require(field, id)?;
        if id.contains(['/', '?', '#']) {
            return Err(SparkError::configuration(format!(
                "{field} must not contain '/', '?' or '#'"
            )));
        }
        Ok(format!("{}/{}", self.collection, id.trim()))
    }

    fn list<T: DeserializeOwned>(&self, params: QueryParams) -> RecordIter<'_, T> {
        RecordIter::new(self.session.request_list(self.collection, params))
    }

    fn get<T: DeserializeOwned>(&self, field: &str, id: &str) -> Result<T, SparkError> {
        let endpoint = self.item_endpoint(field, id)?;
        decode_record(self.session.get(&endpoint, &QueryParams::new())?)
    }

    fn create<T: DeserializeOwned, B: Serialize>(&self, body: &B) -> Result<T, SparkError> {
        decode_record(self.session.post_json(self.collection, body)?)
    }

    fn update<T: DeserializeOwned, B: Serialize>(
        &self,
        field: &str,
        id: &str,
        body: &B,
    ) -> Result<T, SparkError> {
        let endpoint = self.item_endpoint(field, id)?;
        decode_record(self.session.put_json(&endpoint, body)?)
    }

    fn delete(&self, field: &str, id: &str) -> Result<(), SparkError> {
        let endpoint = self.item_endpoint(field, id)?;
        self.session.delete(&endpoint)
    }
}

fn require(field: &str, value: &str) -> Result<(), SparkError> {
    if value.trim().is_empty() {
        return Err(SparkError::configuration(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_optional(field: &str, value: Option<&str>) -> Result<(), SparkError> {
    value.map_or(Ok(()), |present| require(field, present))
}
