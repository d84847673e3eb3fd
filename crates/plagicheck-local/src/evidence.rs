//! Orchestrates query planning, search, and link harvesting into a capped
//! evidence set.
//!
//! Contract: [`EvidenceAggregator::gather`] never fails. A disabled
//! aggregator returns an empty set without touching the network; with a
//! provider, each query that fails at any stage simply contributes zero
//! evidence and the loop moves on.

use crate::gateway::{SearchGateway, DEFAULT_POLL_TIMEOUT};
use crate::harvest;
use crate::queryplan::QueryPlanner;
use base64::Engine as _;
use plagicheck_core::{CandidateSource, DeferredSearchProvider, MAX_LINKS_PER_QUERY, MAX_QUERIES, MAX_SOURCES};
use std::time::Duration;

pub struct EvidenceAggregator<P> {
    gateway: Option<SearchGateway<P>>,
    planner: QueryPlanner,
    poll_timeout: Duration,
}

impl<P: DeferredSearchProvider> EvidenceAggregator<P> {
    pub fn new(gateway: SearchGateway<P>) -> Self {
        Self {
            gateway: Some(gateway),
            planner: QueryPlanner::default(),
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }

    /// Provider-less aggregator: `gather` short-circuits to an empty set.
    pub fn disabled() -> Self {
        Self {
            gateway: None,
            planner: QueryPlanner::default(),
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.gateway.is_some()
    }

    pub fn with_poll_timeout(mut self, poll_timeout: Duration) -> Self {
        self.poll_timeout = poll_timeout;
        self
    }

    /// Gather up to [`MAX_SOURCES`] candidate sources for `text`.
    ///
    /// Queries are resolved sequentially; the loop stops early once the cap
    /// is reached. Failures at any stage degrade to "no evidence from this
    /// query".
    pub async fn gather(&self, text: &str) -> Vec<CandidateSource> {
        let Some(gateway) = &self.gateway else {
            return Vec::new();
        };

        let queries = self.planner.plan(text, MAX_QUERIES);
        if queries.is_empty() {
            return Vec::new();
        }

        let mut sources: Vec<CandidateSource> = Vec::new();
        for query in &queries {
            let Some(op_id) = gateway.submit(query).await else {
                continue;
            };
            let Some(raw) = gateway.poll(&op_id, self.poll_timeout).await else {
                continue;
            };
            let html = match decode_payload(&raw) {
                Some(h) => h,
                None => {
                    tracing::warn!(op_id, "payload base64 decode failed");
                    continue;
                }
            };

            for link in harvest::extract_sources(&html, MAX_LINKS_PER_QUERY) {
                if !sources.contains(&link) {
                    sources.push(link);
                }
            }
            if sources.len() >= MAX_SOURCES {
                break;
            }
        }

        sources.truncate(MAX_SOURCES);
        sources
    }
}

/// Provider payloads arrive as base64-encoded HTML; invalid UTF-8 inside is
/// replaced rather than rejected.
fn decode_payload(raw: &str) -> Option<String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(raw.trim())
        .ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}
