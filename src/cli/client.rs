use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::core::config::ClientConfig;

#[derive(Debug, Deserialize)]
struct BidBody {
    bid: String,
}

/// Formats the line written to the output file.
pub fn format_quote_line(bid: &str) -> String {
    format!("Dólar: {bid}")
}

/// Requests one quote from the server and writes it to the output file.
///
/// The whole request, body included, must finish within the client timeout.
/// Every failure ends the run.
pub async fn run(config: &ClientConfig) -> Result<String> {
    let url = format!("{}/cotacao", config.server_url.trim_end_matches('/'));
    debug!("Requesting quote from {}", url);

    let bid = tokio::time::timeout(config.timeout(), fetch_bid(&url))
        .await
        .map_err(|_| {
            anyhow!("Quote request to {} timed out after {:?}", url, config.timeout())
        })??;

    write_quote(Path::new(&config.output_path), &bid)?;
    info!(bid = %bid, path = %config.output_path, "Saved quote");
    Ok(bid)
}

async fn fetch_bid(url: &str) -> Result<String> {
    let client = reqwest::Client::builder().user_agent("cotacao/0.1").build()?;
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to send request to {url}"))?;

    if !response.status().is_success() {
        return Err(anyhow!("Server responded with {}", response.status()));
    }

    let text = response
        .text()
        .await
        .with_context(|| format!("Failed to read response from {url}"))?;
    let body: BidBody = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse quote response: '{text}'"))?;
    Ok(body.bid)
}

fn write_quote(path: &Path, bid: &str) -> Result<()> {
    std::fs::write(path, format_quote_line(bid))
        .with_context(|| format!("Failed to write quote to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(template: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cotacao"))
            .respond_with(template)
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn client_config(server_url: String, dir: &TempDir) -> ClientConfig {
        ClientConfig {
            server_url,
            timeout_ms: 300,
            output_path: dir.path().join("cotacoes.txt").to_string_lossy().into_owned(),
        }
    }

    #[test]
    fn test_format_quote_line() {
        assert_eq!(format_quote_line("5.43210"), "Dólar: 5.43210");
    }

    #[tokio::test]
    async fn test_run_writes_quote_file() -> Result<()> {
        let mock_server = create_mock_server(
            ResponseTemplate::new(200).set_body_string(r#"{"bid":"5.43210"}"#),
        )
        .await;
        let dir = TempDir::new()?;
        let config = client_config(mock_server.uri(), &dir);

        let bid = run(&config).await?;
        assert_eq!(bid, "5.43210");

        let content = std::fs::read_to_string(&config.output_path)?;
        assert_eq!(content, "Dólar: 5.43210");
        Ok(())
    }

    #[tokio::test]
    async fn test_run_fails_on_server_error() -> Result<()> {
        let mock_server = create_mock_server(ResponseTemplate::new(408)).await;
        let dir = TempDir::new()?;
        let config = client_config(mock_server.uri(), &dir);

        let result = run(&config).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("408"));
        assert!(!Path::new(&config.output_path).exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_run_fails_on_slow_server() -> Result<()> {
        let mock_server = create_mock_server(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"bid":"5.43210"}"#)
                .set_delay(Duration::from_millis(600)),
        )
        .await;
        let dir = TempDir::new()?;
        let config = client_config(mock_server.uri(), &dir);

        let result = run(&config).await;
        assert!(result.unwrap_err().to_string().contains("timed out"));
        assert!(!Path::new(&config.output_path).exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_run_fails_on_malformed_body() -> Result<()> {
        let mock_server =
            create_mock_server(ResponseTemplate::new(200).set_body_string("{}")).await;
        let dir = TempDir::new()?;
        let config = client_config(mock_server.uri(), &dir);

        let result = run(&config).await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse quote response")
        );
        Ok(())
    }
}
