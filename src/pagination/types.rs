//! Pagination types and traits
//!
//! Defines the page consumer contract and the aggregation bookkeeping
//! shared by every paginated resource.

use crate::decode::XmlElement;
use crate::error::Result;
use serde::Serialize;

/// Receives each fetched page of a paginated collection.
///
/// Implementations own the typed result being built up; the aggregator only
/// sees how many new items each page contributed.
pub trait PageConsumer: Send {
    /// Authoritative item count reported on the first page, if any
    fn expected_total(&self, page: &XmlElement) -> Option<u64>;

    /// Merge one page into the result, returning the number of new items.
    ///
    /// Returning zero stops the aggregation.
    fn consume(&mut self, page: &XmlElement) -> Result<u64>;
}

/// Page consumer built from a pair of closures
pub struct FnConsumer<E, C> {
    expected: E,
    consume: C,
}

impl<E, C> FnConsumer<E, C>
where
    E: Fn(&XmlElement) -> Option<u64> + Send,
    C: FnMut(&XmlElement) -> Result<u64> + Send,
{
    /// Create a consumer from an expected-total extractor and a merge step
    pub fn new(expected: E, consume: C) -> Self {
        Self { expected, consume }
    }
}

impl<E, C> PageConsumer for FnConsumer<E, C>
where
    E: Fn(&XmlElement) -> Option<u64> + Send,
    C: FnMut(&XmlElement) -> Result<u64> + Send,
{
    fn expected_total(&self, page: &XmlElement) -> Option<u64> {
        (self.expected)(page)
    }

    fn consume(&mut self, page: &XmlElement) -> Result<u64> {
        (self.consume)(page)
    }
}

/// Why an aggregation stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Termination {
    /// Accumulated count reached the expected total
    Complete,
    /// A page added nothing, so the server is not honoring pagination
    NoNewItems {
        /// Page that came back empty
        page: u32,
    },
    /// A page after the first failed; the result is partial
    Truncated {
        /// Page that failed
        page: u32,
        /// Error reported for that page
        error: String,
    },
}

/// Outcome of one aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationSummary {
    /// Items accumulated across all pages
    pub accumulated: u64,
    /// Total the server announced on the first page
    pub expected_total: u64,
    /// Pages fetched successfully
    pub pages_fetched: u32,
    /// Why the aggregation stopped
    pub termination: Termination,
}

impl AggregationSummary {
    /// Check if every announced item was accumulated
    pub fn is_complete(&self) -> bool {
        matches!(self.termination, Termination::Complete)
    }

    /// Check if a failing page cut the result short
    pub fn is_truncated(&self) -> bool {
        matches!(self.termination, Termination::Truncated { .. })
    }
}

/// Tracks progress of a single aggregation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationState {
    /// Expected total item count
    pub expected_total: u64,
    /// Items accumulated so far
    pub accumulated: u64,
    /// Last page fetched successfully
    pub page: u32,
}

impl AggregationState {
    /// Create state for an aggregation expecting `expected_total` items
    pub fn new(expected_total: u64) -> Self {
        Self {
            expected_total,
            ..Default::default()
        }
    }

    /// Record a fetched page and the items it added
    pub fn record_page(&mut self, page: u32, added: u64) {
        self.page = page;
        self.accumulated = self.accumulated.saturating_add(added);
    }

    /// Check if the expected total has been reached
    pub fn reached_total(&self) -> bool {
        self.accumulated >= self.expected_total
    }

    /// Page to fetch next
    pub fn next_page(&self) -> u32 {
        self.page + 1
    }

    /// Summarize the aggregation
    pub fn finish(&self, termination: Termination) -> AggregationSummary {
        AggregationSummary {
            accumulated: self.accumulated,
            expected_total: self.expected_total,
            pages_fetched: self.page,
            termination,
        }
    }
}
