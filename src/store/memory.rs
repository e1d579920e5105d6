use crate::core::{QuoteRecord, QuoteResult, QuoteStore};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory quote log, insertion ordered
#[derive(Clone, Default)]
pub struct MemoryQuoteStore {
    inner: Arc<Mutex<Vec<QuoteRecord>>>,
}

impl MemoryQuoteStore {
    /// Creates an empty MemoryQuoteStore
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Snapshot of every record inserted so far
    pub async fn records(&self) -> Vec<QuoteRecord> {
        self.inner.lock().await.clone()
    }
}

#[async_trait]
impl QuoteStore for MemoryQuoteStore {
    async fn insert(&self, bid: &str) -> QuoteResult<QuoteRecord> {
        let record = QuoteRecord::from_bid(bid);
        let mut records = self.inner.lock().await;
        records.push(record.clone());
        debug!(id = %record.id, "Stored quote record in memory");
        Ok(record)
    }
}
