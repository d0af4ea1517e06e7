//! Rooms.

use std::sync::Arc;

use serde::Serialize;

use super::{Resource, require, require_optional};
use crate::SparkError;
use crate::records::{RecordIter, Room};
use crate::session::{QueryParams, RestSession};

/// Filters for [`RoomsApi::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomsQuery {
    /// Only rooms belonging to this team.
    pub team_id: Option<String>,
    /// `direct` or `group`.
    pub room_type: Option<String>,
    /// Page size hint.
    pub max: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewRoom<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    team_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct RoomUpdate<'a> {
    title: &'a str,
}

/// Rooms wrapper.
#[derive(Debug, Clone)]
pub struct RoomsApi {
    resource: Resource,
}

impl RoomsApi {
    pub(crate) const fn new(session: Arc<RestSession>) -> Self {
        Self {
            resource: Resource::new(session, "rooms"),
        }
    }

    /// List rooms the user belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`SparkError::Configuration`] for a blank filter value.
    pub fn list(&self, query: &RoomsQuery) -> Result<RecordIter<'_, Room>, SparkError> {
        require_optional("teamId", query.team_id.as_deref())?;
        require_optional("type", query.room_type.as_deref())?;
        let params = QueryParams::new()
            .with_optional("teamId", query.team_id.as_deref())
            .with_optional("type", query.room_type.as_deref())
            .with_optional("max", query.max);
        Ok(self.resource.list(params))
    }

    /// Create a room, optionally inside a team.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn create(&self, title: &str, team_id: Option<&str>) -> Result<Room, SparkError> {
        require("title", title)?;
        require_optional("teamId", team_id)?;
        self.resource.create(&NewRoom { title, team_id })
    }

    /// Fetch one room.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn get(&self, room_id: &str) -> Result<Room, SparkError> {
        self.resource.get("roomId", room_id)
    }

    /// Rename a room.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn update(&self, room_id: &str, title: &str) -> Result<Room, SparkError> {
        require("title", title)?;
        self.resource.update("roomId", room_id, &RoomUpdate { title })
    }

    /// Delete a room.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn delete(&self, room_id: &str) -> Result<(), SparkError> {
        self.resource.delete("roomId", room_id)
    }
}
