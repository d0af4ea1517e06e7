//! Room memberships.

use std::sync::Arc;

use serde::Serialize;

use super::{ModeratorUpdate, PersonFields, PersonRef, Resource, require, require_optional};
use crate::SparkError;
use crate::records::{Membership, RecordIter};
use crate::session::{QueryParams, RestSession};

/// Filters for [`MembershipsApi::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipsQuery {
    /// Only memberships of this room.
    pub room_id: Option<String>,
    /// Only memberships of this person.
    pub person_id: Option<String>,
    /// Only memberships of the person with this email.
    pub person_email: Option<String>,
    /// Page size hint.
    pub max: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewMembership<'a> {
    room_id: &'a str,
    #[serde(flatten)]
    person: PersonFields<'a>,
    is_moderator: bool,
}

/// Room memberships wrapper.
#[derive(Debug, Clone)]
pub struct MembershipsApi {
    resource: Resource,
}

impl MembershipsApi {
    pub(crate) const fn new(session: Arc<RestSession>) -> Self {
        Self {
            resource: Resource::new(session, "memberships"),
        }
    }

    /// List memberships matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SparkError::Configuration`] for a blank filter value.
    pub fn list(&self, query: &MembershipsQuery) -> Result<RecordIter<'_, Membership>, SparkError> {
        require_optional("roomId", query.room_id.as_deref())?;
        require_optional("personId", query.person_id.as_deref())?;
        require_optional("personEmail", query.person_email.as_deref())?;
        let params = QueryParams::new()
            .with_optional("roomId", query.room_id.as_deref())
            .with_optional("personId", query.person_id.as_deref())
            .with_optional("personEmail", query.person_email.as_deref())
            .with_optional("max", query.max);
        Ok(self.resource.list(params))
    }

    /// Add a person to a room.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn create(
        &self,
        room_id: &str,
        person: &PersonRef,
        is_moderator: bool,
    ) -> Result<Membership, SparkError> {
        require("roomId", room_id)?;
        person.validate()?;
        self.resource.create(&NewMembership {
            room_id,
            person: person.into(),
            is_moderator,
        })
    }

    /// Fetch one membership.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn get(&self, membership_id: &str) -> Result<Membership, SparkError> {
        self.resource.get("membershipId", membership_id)
    }

    /// Grant or revoke moderator status.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn update(
        &self,
        membership_id: &str,
        is_moderator: bool,
    ) -> Result<Membership, SparkError> {
        self.resource
            .update("membershipId", membership_id, &ModeratorUpdate { is_moderator })
    }

    /// Remove a person from a room.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn delete(&self, membership_id: &str) -> Result<(), SparkError> {
        self.resource.delete("membershipId", membership_id)
    }
}
