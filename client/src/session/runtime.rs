//! Runtime helpers used by the session retry loop.

use std::sync::Arc;
use std::time::Duration;

use crate::RateLimitPolicy;

/// Blocking sleep abstraction for rate-limit waits.
///
/// ```rust
/// use std::sync::Mutex;
/// use std::time::Duration;
/// use spark_client::Sleeper;
///
/// #[derive(Default)]
/// struct RecordingSleeper(Mutex<Vec<Duration>>);
///
/// impl Sleeper for RecordingSleeper {
///     fn sleep(&self, duration: Duration) {
///         self.0.lock().expect("sleeper mutex").push(duration);
///     }
/// }
///
/// let sleeper = RecordingSleeper::default();
/// sleeper.sleep(Duration::from_secs(3));
/// assert_eq!(*sleeper.0.lock().expect("sleeper mutex"), vec![Duration::from_secs(3)]);
/// ```
pub trait Sleeper: Send + Sync {
    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Sleeper backed by [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Retry policy and sleeper used by a session.
#[derive(Clone)]
pub struct SessionRuntime {
    /// Rate-limit retry policy.
    pub policy: RateLimitPolicy,
    /// Sleep implementation for retry waits.
    pub sleeper: Arc<dyn Sleeper>,
}

impl Default for SessionRuntime {
    fn default() -> Self {
        Self {
            policy: RateLimitPolicy::default(),
            sleeper: Arc::new(ThreadSleeper),
        }
    }
}

impl SessionRuntime {
    /// Default sleeper with a custom policy.
    #[must_use]
    pub fn with_policy(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }
}
