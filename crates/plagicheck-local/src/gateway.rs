//! Submit/poll front end over a [`DeferredSearchProvider`].
//!
//! The provider is treated as untrusted and unreliable: every transport,
//! status or decode failure degrades to `None` here and is logged, never
//! propagated. Callers see "an operation id or nothing" and "a raw payload
//! or nothing".

use plagicheck_core::DeferredSearchProvider;
use std::time::Duration;
use tokio::time::Instant;

/// Interval between status fetches.
const POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Default wall-clock budget for one operation to complete.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(45);

#[derive(Debug, Clone)]
pub struct SearchGateway<P> {
    provider: P,
    poll_interval: Duration,
}

impl<P: DeferredSearchProvider> SearchGateway<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Override the 1s poll interval. Intended for tests; production code
    /// keeps the default.
    pub fn with_poll_interval(provider: P, poll_interval: Duration) -> Self {
        Self {
            provider,
            poll_interval,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Submit one query. Returns the operation id, or `None` on any failure.
    pub async fn submit(&self, query: &str) -> Option<String> {
        match self.provider.submit(query).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(provider = self.provider.name(), error = %e, "search submit failed");
                None
            }
        }
    }

    /// Poll an operation until it reports done or `timeout` elapses.
    ///
    /// Returns the raw encoded payload on success; `None` on timeout, on any
    /// fetch failure, or when the operation completes without a payload. The
    /// deadline is wall-clock, computed once at entry; dropping the returned
    /// future cancels the loop at the next await point.
    pub async fn poll(&self, op_id: &str, timeout: Duration) -> Option<String> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.provider.operation(op_id).await {
                Ok(op) => {
                    if op.done {
                        if op.raw_data.is_none() {
                            tracing::warn!(op_id, "operation done but carried no payload");
                        }
                        return op.raw_data;
                    }
                }
                Err(e) => {
                    tracing::warn!(op_id, error = %e, "operation fetch failed");
                    return None;
                }
            }

            if Instant::now() >= deadline {
                tracing::warn!(op_id, timeout_s = timeout.as_secs(), "poll timed out");
                return None;
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
