//! Pagination module
//!
//! Collapses every paginated resource (guild members, user buddies and
//! guilds, plays) into one aggregation loop.
//!
//! # Overview
//!
//! The pagination module provides:
//! - `PageConsumer` - Per-resource merge step, reports new items per page
//! - `Aggregator` - Sequential page loop with progress reporting
//! - `AggregationSummary` - Counts plus the reason the loop stopped
//!
//! Pages are fetched strictly in order and never concurrently. Only the
//! first page can fail the call; a later failure truncates the result and
//! is logged at `warn` level.

mod aggregator;
mod types;

pub use aggregator::Aggregator;
pub use types::{AggregationState, AggregationSummary, FnConsumer, PageConsumer, Termination};
