//! Teams.

use std::sync::Arc;

use serde::Serialize;

use super::{Resource, require};
use crate::SparkError;
use crate::records::{RecordIter, Team};
use crate::session::{QueryParams, RestSession};

#[derive(Debug, Serialize)]
struct TeamName<'a> {
    name: &'a str,
}

/// Teams wrapper.
#[derive(Debug, Clone)]
pub struct TeamsApi {
    resource: Resource,
}

impl TeamsApi {
    pub(crate) const fn new(session: Arc<RestSession>) -> Self {
        Self {
            resource: Resource::new(session, "teams"),
        }
    }

    /// List teams the user belongs to.
    #[must_use]
    pub fn list(&self, max: Option<u32>) -> RecordIter<'_, Team> {
        self.resource
            .list(QueryParams::new().with_optional("max", max))
    }

    /// Create a team.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn create(&self, name: &str) -> Result<Team, SparkError> {
        require("name", name)?;
        self.resource.create(&TeamName { name })
    }

    /// Fetch one team.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn get(&self, team_id: &str) -> Result<Team, SparkError> {
        self.resource.get("teamId", team_id)
    }

    /// Rename a team.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn update(&self, team_id: &str, name: &str) -> Result<Team, SparkError> {
        require("name", name)?;
        self.resource.update("teamId", team_id, &TeamName { name })
    }

    /// Delete a team.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn delete(&self, team_id: &str) -> Result<(), SparkError> {
        self.resource.delete("teamId", team_id)
    }
}
