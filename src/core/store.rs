//! Storage abstractions for served quotes

use async_trait::async_trait;

use crate::core::error::QuoteResult;
use crate::core::quote::QuoteRecord;

/// Append-only log of quotes.
///
/// Every `insert` creates a new record with a fresh id, duplicate bids
/// included. Implementations must be safe to call from concurrent requests,
/// and must not commit a write whose future was dropped before it got there.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    async fn insert(&self, bid: &str) -> QuoteResult<QuoteRecord>;
}
