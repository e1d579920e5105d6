use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::deadline::with_deadline;
use crate::core::{QuoteError, QuoteProvider, QuoteResult, QuoteStore, Stage};

#[derive(Debug, Serialize)]
pub struct BidResponse<'a> {
    pub bid: &'a str,
}

/// Runs the fetch-then-store pipeline for one `GET /cotacao` request.
///
/// Each stage gets its own budget, measured from when the stage starts. The
/// store is only reached after a successful fetch. Nothing here is shared
/// between requests apart from the provider and store handles.
pub struct QuoteRequestHandler {
    provider: Arc<dyn QuoteProvider>,
    store: Arc<dyn QuoteStore>,
    fetch_budget: Duration,
    store_budget: Duration,
}

impl QuoteRequestHandler {
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        store: Arc<dyn QuoteStore>,
        fetch_budget: Duration,
        store_budget: Duration,
    ) -> Self {
        Self {
            provider,
            store,
            fetch_budget,
            store_budget,
        }
    }

    /// Returns the serialized `{"bid": ...}` body on success.
    pub async fn handle(&self) -> QuoteResult<Vec<u8>> {
        let quote = with_deadline(
            Stage::Fetch,
            self.fetch_budget,
            self.provider.fetch_quote(),
        )
        .await?;
        debug!(bid = %quote.bid, "Fetched quote");

        let record = with_deadline(
            Stage::Store,
            self.store_budget,
            self.store.insert(&quote.bid),
        )
        .await?;
        info!(id = %record.id, bid = %record.bid, "Stored quote");

        serde_json::to_vec(&BidResponse { bid: &quote.bid })
            .map_err(|e| QuoteError::Serialization(e.to_string()))
    }
}
