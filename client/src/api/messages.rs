//! Messages.

use std::sync::Arc;

use serde::Serialize;

use super::{Resource, require, require_optional};
use crate::SparkError;
use crate::records::{Message, RecordIter};
use crate::session::{QueryParams, RestSession};

/// Filters for [`MessagesApi::list`]. `room_id` is required by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagesQuery {
    /// Room whose messages are listed.
    pub room_id: String,
    /// Only messages mentioning these people (`me` for the caller).
    pub mentioned_people: Option<String>,
    /// Only messages sent before this ISO 8601 time.
    pub before: Option<String>,
    /// Only messages sent before this message id.
    pub before_message: Option<String>,
    /// Page size hint.
    pub max: Option<u32>,
}

/// Where a new message is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageTarget {
    /// Post into a room.
    Room(String),
    /// Send directly to a person by id.
    PersonId(String),
    /// Send directly to a person by email.
    PersonEmail(String),
}

/// Body of a new message; at least one part must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageContent {
    /// Plain text.
    pub text: Option<String>,
    /// Markdown text.
    pub markdown: Option<String>,
    /// Public URLs of files to attach.
    pub files: Vec<String>,
}

impl MessageContent {
    /// Plain-text content.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Markdown content.
    #[must_use]
    pub fn markdown(markdown: impl Into<String>) -> Self {
        Self {
            markdown: Some(markdown.into()),
            ..Self::default()
        }
    }

    fn is_empty(&self) -> bool {
        let blank = |part: Option<&String>| part.is_none_or(|value| value.trim().is_empty());
        blank(self.text.as_ref()) && blank(self.markdown.as_ref()) && self.files.is_empty()
    }
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewMessage<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    room_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_person_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_person_email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    markdown: Option<&'a str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    files: &'a [String],
}

/// Messages wrapper.
#[derive(Debug, Clone)]
pub struct MessagesApi {
    resource: Resource,
}

impl MessagesApi {
    pub(crate) const fn new(session: Arc<RestSession>) -> Self {
        Self {
            resource: Resource::new(session, "messages"),
        }
    }

    /// List messages in a room, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`SparkError::Configuration`] when `room_id` or a filter
    /// value is blank.
    pub fn list(&self, query: &MessagesQuery) -> Result<RecordIter<'_, Message>, SparkError> {
        require("roomId", &query.room_id)?;
        require_optional("mentionedPeople", query.mentioned_people.as_deref())?;
        require_optional("before", query.before.as_deref())?;
        require_optional("beforeMessage", query.before_message.as_deref())?;
        let params = QueryParams::new()
            .with("roomId", &query.room_id)
            .with_optional("mentionedPeople", query.mentioned_people.as_deref())
            .with_optional("before", query.before.as_deref())
            .with_optional("beforeMessage", query.before_message.as_deref())
            .with_optional("max", query.max);
        Ok(self.resource.list(params))
    }

    /// Post a message.
    ///
    /// # Errors
    ///
    /// Returns [`SparkError::Configuration`] when the target is blank or the
    /// content is empty; otherwise propagates session failures.
    pub fn create(
        &self,
        target: &MessageTarget,
        content: &MessageContent,
    ) -> Result<Message, SparkError> {
        if content.is_empty() {
            return Err(SparkError::configuration(
                "a message needs text, markdown or at least one file",
            ));
        }
        let mut body = NewMessage {
            text: content.text.as_deref(),
            markdown: content.markdown.as_deref(),
            files: &content.files,
            ..NewMessage::default()
        };
        match target {
            MessageTarget::Room(room_id) => {
                require("roomId", room_id)?;
                body.room_id = Some(room_id.as_str());
            }
            MessageTarget::PersonId(person_id) => {
                require("toPersonId", person_id)?;
                body.to_person_id = Some(person_id.as_str());
            }
            MessageTarget::PersonEmail(email) => {
                require("toPersonEmail", email)?;
                body.to_person_email = Some(email.as_str());
            }
        }
        self.resource.create(&body)
    }

    /// Fetch one message.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn get(&self, message_id: &str) -> Result<Message, SparkError> {
        self.resource.get("messageId", message_id)
    }

    /// Delete a message.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn delete(&self, message_id: &str) -> Result<(), SparkError> {
        self.resource.delete("messageId", message_id)
    }
}
