//! Local implementations of the plagicheck originality pipeline.
//!
//! `plagicheck-core` defines the types and seams; this crate supplies the
//! working parts: the deferred-search provider client, the submit/poll
//! gateway, query planning, link harvesting, evidence aggregation, the
//! scoring heuristic, document text extraction, the in-memory report store
//! and the HTML report renderer, tied together by [`pipeline::CheckService`].

pub mod evidence;
pub mod extract;
pub mod gateway;
pub mod harvest;
pub mod pipeline;
pub mod provider;
pub mod queryplan;
pub mod render;
pub mod score;
pub mod store;

pub use pipeline::{CheckResponse, CheckService};
