pub mod disk;
pub mod memory;

use crate::core::QuoteStore;
use crate::core::config::{AppConfig, StoreBackend};
use anyhow::{Context, Result};
use disk::FjallQuoteStore;
use memory::MemoryQuoteStore;
use std::sync::Arc;
use tracing::warn;

/// Builds the store selected in config. The returned handle is shared by
/// every request for the lifetime of the server.
pub fn open_store(config: &AppConfig) -> Result<Arc<dyn QuoteStore>> {
    match config.store.backend {
        StoreBackend::Disk => {
            let path = config.default_data_path()?;
            let store = FjallQuoteStore::open(&path)
                .with_context(|| format!("Failed to open quote store at {}", path.display()))?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory quote store, records are lost on exit");
            Ok(Arc::new(MemoryQuoteStore::new()))
        }
    }
}
