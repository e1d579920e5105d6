use async_trait::async_trait;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use crate::core::{QuoteError, QuoteRecord, QuoteResult, QuoteStore};

pub const QUOTATIONS_PARTITION: &str = "quotations";

/// Raised when the insert future is dropped, e.g. because its deadline
/// elapsed while the write was still queued on the blocking pool.
struct AbandonOnDrop(Arc<AtomicBool>);

impl Drop for AbandonOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Durable quote log in a fjall keyspace, one partition keyed by record id.
pub struct FjallQuoteStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl FjallQuoteStore {
    /// Opens (or creates) the keyspace at `path` and its `quotations` partition.
    pub fn open(path: &Path) -> QuoteResult<Self> {
        std::fs::create_dir_all(path).map_err(|e| {
            QuoteError::Storage(format!("Failed to create {}: {}", path.display(), e))
        })?;

        let keyspace = Config::new(path).open()?;
        let partition =
            keyspace.open_partition(QUOTATIONS_PARTITION, PartitionCreateOptions::default())?;

        let store = Self {
            keyspace,
            partition,
        };
        info!(
            path = %path.display(),
            records = store.len()?,
            "Opened quote store"
        );
        Ok(store)
    }

    pub fn len(&self) -> QuoteResult<usize> {
        Ok(self.partition.len()?)
    }

    pub fn is_empty(&self) -> QuoteResult<bool> {
        Ok(self.len()? == 0)
    }

    /// All stored records, in key order.
    pub fn records(&self) -> QuoteResult<Vec<QuoteRecord>> {
        self.partition
            .iter()
            .map(|kv| {
                let (key, value) = kv?;
                serde_json::from_slice(&value).map_err(|e| {
                    QuoteError::Storage(format!(
                        "Corrupt record {}: {e}",
                        String::from_utf8_lossy(&key)
                    ))
                })
            })
            .collect()
    }

    pub fn get(&self, id: &str) -> QuoteResult<Option<QuoteRecord>> {
        match self.partition.get(id.as_bytes())? {
            Some(value) => serde_json::from_slice(&value)
                .map(Some)
                .map_err(|e| QuoteError::Storage(format!("Corrupt record {id}: {e}"))),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl QuoteStore for FjallQuoteStore {
    async fn insert(&self, bid: &str) -> QuoteResult<QuoteRecord> {
        let record = QuoteRecord::from_bid(bid);
        let value = serde_json::to_vec(&record)
            .map_err(|e| QuoteError::Storage(format!("Failed to encode record: {e}")))?;

        let abandoned = Arc::new(AtomicBool::new(false));
        let _guard = AbandonOnDrop(Arc::clone(&abandoned));

        let keyspace = self.keyspace.clone();
        let partition = self.partition.clone();
        let id = record.id.clone();

        tokio::task::spawn_blocking(move || -> QuoteResult<()> {
            // A write that already got past this check commits in full.
            if abandoned.load(Ordering::Acquire) {
                debug!(id = %id, "Insert abandoned before commit");
                return Err(QuoteError::Storage("Insert abandoned before commit".into()));
            }
            partition.insert(id.as_bytes(), value)?;
            keyspace.persist(PersistMode::Buffer)?;
            Ok(())
        })
        .await
        .map_err(|e| QuoteError::Storage(format!("Insert task failed: {e}")))??;

        debug!(id = %record.id, bid = %record.bid, "Inserted quote record");
        Ok(record)
    }
}
