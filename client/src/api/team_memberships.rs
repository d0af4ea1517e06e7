//! Team memberships.

use std::sync::Arc;

use serde::Serialize;

use super::{ModeratorUpdate, PersonFields, PersonRef, Resource, require};
use crate::SparkError;
use crate::records::{RecordIter, TeamMembership};
use crate::session::{QueryParams, RestSession};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewTeamMembership<'a> {
    team_id: &'a str,
    #[serde(flatten)]
    person: PersonFields<'a>,
    is_moderator: bool,
}

/// Team memberships wrapper.
#[derive(Debug, Clone)]
pub struct TeamMembershipsApi {
    resource: Resource,
}

impl TeamMembershipsApi {
    pub(crate) const fn new(session: Arc<RestSession>) -> Self {
        Self {
            resource: Resource::new(session, "team/memberships"),
        }
    }

    /// List the memberships of one team.
    ///
    /// # Errors
    ///
    /// Returns [`SparkError::Configuration`] when `team_id` is blank.
    pub fn list(
        &self,
        team_id: &str,
        max: Option<u32>,
    ) -> Result<RecordIter<'_, TeamMembership>, SparkError> {
        require("teamId", team_id)?;
        let params = QueryParams::new()
            .with("teamId", team_id)
            .with_optional("max", max);
        Ok(self.resource.list(params))
    }

    /// Add a person to a team.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn create(
        &self,
        team_id: &str,
        person: &PersonRef,
        is_moderator: bool,
    ) -> Result<TeamMembership, SparkError> {
        require("teamId", team_id)?;
        person.validate()?;
        self.resource.create(&NewTeamMembership {
            team_id,
            person: person.into(),
            is_moderator,
        })
    }

    /// Fetch one team membership.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn get(&self, membership_id: &str) -> Result<TeamMembership, SparkError> {
        self.resource.get("membershipId", membership_id)
    }

    /// Grant or revoke team moderator status.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn update(
        &self,
        membership_id: &str,
        is_moderator: bool,
    ) -> Result<TeamMembership, SparkError> {
        self.resource
            .update("membershipId", membership_id, &ModeratorUpdate { is_moderator })
    }

    /// Remove a person from a team.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn delete(&self, membership_id: &str) -> Result<(), SparkError> {
        self.resource.delete("membershipId", membership_id)
    }
}
