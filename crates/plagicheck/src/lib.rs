//! Public facade crate for `plagicheck`.
//!
//! This crate intentionally contains no IO or provider-specific logic.
//! It re-exports the backend-agnostic types/traits from `plagicheck-core`.

pub use plagicheck_core::*;
