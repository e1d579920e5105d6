use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::{Quote, QuoteError, QuoteProvider, QuoteResult};

/// Latest-quote provider backed by the AwesomeAPI `json/last` endpoint.
pub struct AwesomeApiProvider {
    base_url: String,
    pair: String,
    client: reqwest::Client,
}

impl AwesomeApiProvider {
    pub fn new(base_url: &str, pair: &str) -> QuoteResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent("cotacao/0.1")
            .build()
            .map_err(|e| QuoteError::Network(format!("Failed to build HTTP client: {e}")))?;
        Ok(AwesomeApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            pair: pair.to_string(),
            client,
        })
    }

    /// Key of the envelope object, e.g. `USD-BRL` -> `USDBRL`.
    fn envelope_key(&self) -> String {
        self.pair.replace('-', "")
    }
}

#[derive(Debug, Deserialize)]
struct PairQuote {
    bid: String,
}

fn classify_request_error(err: reqwest::Error, url: &str) -> QuoteError {
    if err.is_decode() {
        QuoteError::Decode(format!("{err} from {url}"))
    } else {
        QuoteError::Network(format!("Request error: {err} for URL: {url}"))
    }
}

#[async_trait]
impl QuoteProvider for AwesomeApiProvider {
    #[instrument(name = "AwesomeApiFetch", skip(self))]
    async fn fetch_quote(&self) -> QuoteResult<Quote> {
        let url = format!("{}/json/last/{}", self.base_url, self.pair);
        debug!("Requesting {} quote from {}", self.pair, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| classify_request_error(e, &url))?;

        if !response.status().is_success() {
            return Err(QuoteError::Network(format!(
                "HTTP error: {} for currency pair: {}",
                response.status(),
                self.pair
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| classify_request_error(e, &url))?;

        // Only the pair object matters; sibling keys and fields are ignored.
        let mut envelope: HashMap<String, serde_json::Value> = serde_json::from_str(&text)
            .map_err(|e| QuoteError::Decode(format!("Failed to parse JSON response: {e}")))?;

        let key = self.envelope_key();
        let pair_value = envelope
            .remove(&key)
            .ok_or_else(|| QuoteError::Decode(format!("Missing '{key}' object in response")))?;
        let pair_quote: PairQuote = serde_json::from_value(pair_value)
            .map_err(|e| QuoteError::Decode(format!("Invalid '{key}' object: {e}")))?;

        debug!(bid = %pair_quote.bid, "Received quote");
        Ok(Quote::new(pair_quote.bid))
    }
}
