//! Blocking client for the Cisco Spark REST API.
//!
//! The core is [`RestSession`]: it authenticates every call, retries HTTP 429
//! responses according to a [`RateLimitPolicy`], and walks cursor-paginated
//! collections lazily by following `Link: rel="next"` headers. Resource
//! wrappers in [`api`] sit on top and decode answers into the typed views in
//! [`records`]; [`SparkClient`] bundles them over one shared session.

pub mod api;
mod client;
pub mod config;
mod error;
pub mod rate_limit;
pub mod records;
pub mod session;
pub mod transport;

pub use client::SparkClient;
pub use config::{SessionSettings, SparkConfig};
pub use error::SparkError;
pub use rate_limit::{RateLimitPolicy, RetryDecision};
pub use session::{Items, Pages, QueryParams, RestSession, SessionRuntime, Sleeper, ThreadSleeper};
