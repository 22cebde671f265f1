//! Paginated aggregation
//!
//! Fetches pages one at a time, in order, until the announced total is
//! reached, a page adds nothing, or a later page fails.

use super::types::{AggregationState, AggregationSummary, PageConsumer, Termination};
use crate::error::Result;
use crate::http::{Fetcher, RequestDescriptor};
use crate::types::ProgressFn;
use tracing::{debug, info, warn};

/// Drives a paginated fetch through a [`Fetcher`]
pub struct Aggregator<'a> {
    fetcher: &'a dyn Fetcher,
    progress: Option<&'a ProgressFn>,
}

impl<'a> Aggregator<'a> {
    /// Create an aggregator fetching through `fetcher`
    pub fn new(fetcher: &'a dyn Fetcher) -> Self {
        Self {
            fetcher,
            progress: None,
        }
    }

    /// Report `(accumulated, expected_total)` after every page
    #[must_use]
    pub fn with_progress(mut self, progress: Option<&'a ProgressFn>) -> Self {
        self.progress = progress;
        self
    }

    /// Aggregate every page of `base` into `consumer`.
    ///
    /// Errors on the first page are returned; errors on later pages stop
    /// the aggregation and are reported as [`Termination::Truncated`].
    #[tracing::instrument(skip_all, fields(url = %base.url))]
    pub async fn aggregate<C>(
        &self,
        base: &RequestDescriptor,
        consumer: &mut C,
    ) -> Result<AggregationSummary>
    where
        C: PageConsumer + ?Sized,
    {
        let first = self.fetcher.fetch(base).await?;
        let announced = consumer.expected_total(&first);
        let added = consumer.consume(&first)?;

        // No total on the first page: it was the whole result
        let mut state = AggregationState::new(announced.unwrap_or(added));
        state.record_page(1, added);
        self.report(&state);

        let termination = loop {
            if state.reached_total() {
                break Termination::Complete;
            }

            let page = state.next_page();
            debug!(
                page,
                accumulated = state.accumulated,
                expected = state.expected_total,
                "Fetching page"
            );

            let added = match self.fetch_page(base, page, consumer).await {
                Ok(added) => added,
                Err(e) => {
                    warn!(
                        page,
                        accumulated = state.accumulated,
                        expected = state.expected_total,
                        error = %e,
                        "Page failed, returning partial result"
                    );
                    break Termination::Truncated {
                        page,
                        error: e.to_string(),
                    };
                }
            };

            state.record_page(page, added);
            self.report(&state);

            if added == 0 {
                warn!(
                    page,
                    accumulated = state.accumulated,
                    expected = state.expected_total,
                    "Page added no new items, stopping"
                );
                break Termination::NoNewItems { page };
            }
        };

        let summary = state.finish(termination);
        if summary.is_complete() {
            info!(
                accumulated = summary.accumulated,
                pages = summary.pages_fetched,
                "Aggregation complete"
            );
        }
        Ok(summary)
    }

    async fn fetch_page<C>(&self, base: &RequestDescriptor, page: u32, consumer: &mut C) -> Result<u64>
    where
        C: PageConsumer + ?Sized,
    {
        let document = self.fetcher.fetch(&base.with_page(page)).await?;
        consumer.consume(&document)
    }

    fn report(&self, state: &AggregationState) {
        if let Some(progress) = self.progress {
            progress(state.accumulated, state.expected_total);
        }
    }
}
