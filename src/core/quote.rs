//! Quote abstractions and core types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::QuoteResult;

/// Latest bid for a currency pair, as text exactly as the provider sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub bid: String,
}

impl Quote {
    pub fn new(bid: impl Into<String>) -> Self {
        Self { bid: bid.into() }
    }
}

/// A persisted quote. The id is assigned by the store at insert time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub id: String,
    pub bid: String,
}

impl QuoteRecord {
    /// Builds a record with a fresh v4 UUID. The bid is copied as is.
    pub fn from_bid(bid: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            bid: bid.to_string(),
        }
    }
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_quote(&self) -> QuoteResult<Quote>;
}
