//! Webhooks.

use std::sync::Arc;

use serde::Serialize;

use super::{Resource, require, require_optional};
use crate::SparkError;
use crate::records::{RecordIter, Webhook};
use crate::session::{QueryParams, RestSession};

/// Registration request for [`WebhooksApi::create`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWebhook {
    /// Human-readable name.
    pub name: String,
    /// URL events are delivered to.
    pub target_url: String,
    /// Watched resource, e.g. `messages`.
    pub resource: String,
    /// Triggering event, e.g. `created`.
    pub event: String,
    /// Optional event filter, e.g. `roomId=...`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Optional secret used to sign deliveries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl NewWebhook {
    fn validate(&self) -> Result<(), SparkError> {
        require("name", &self.name)?;
        require("targetUrl", &self.target_url)?;
        require("resource", &self.resource)?;
        require("event", &self.event)?;
        require_optional("filter", self.filter.as_deref())?;
        require_optional("secret", self.secret.as_deref())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookUpdate<'a> {
    name: &'a str,
    target_url: &'a str,
}

/// Webhooks wrapper.
#[derive(Debug, Clone)]
pub struct WebhooksApi {
    resource: Resource,
}

impl WebhooksApi {
    pub(crate) const fn new(session: Arc<RestSession>) -> Self {
        Self {
            resource: Resource::new(session, "webhooks"),
        }
    }

    /// List registered webhooks.
    #[must_use]
    pub fn list(&self, max: Option<u32>) -> RecordIter<'_, Webhook> {
        self.resource
            .list(QueryParams::new().with_optional("max", max))
    }

    /// Register a webhook.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn create(&self, webhook: &NewWebhook) -> Result<Webhook, SparkError> {
        webhook.validate()?;
        self.resource.create(webhook)
    }

    /// Fetch one webhook.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn get(&self, webhook_id: &str) -> Result<Webhook, SparkError> {
        self.resource.get("webhookId", webhook_id)
    }

    /// Rename a webhook and change its delivery URL.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn update(
        &self,
        webhook_id: &str,
        name: &str,
        target_url: &str,
    ) -> Result<Webhook, SparkError> {
        require("name", name)?;
        require("targetUrl", target_url)?;
        self.resource
            .update("webhookId", webhook_id, &WebhookUpdate { name, target_url })
    }

    /// Delete a webhook.
    ///
    /// # Errors
    ///
    /// Propagates validation and session failures.
    pub fn delete(&self, webhook_id: &str) -> Result<(), SparkError> {
        self.resource.delete("webhookId", webhook_id)
    }
}
