use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub fetch_timeout_ms: u64,
    pub store_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen_addr: "0.0.0.0:8080".to_string(),
            fetch_timeout_ms: 200,
            store_timeout_ms: 10,
        }
    }
}

impl ServerConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub pair: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: "https://economia.awesomeapi.com.br".to_string(),
            pair: "USD-BRL".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Fjall keyspace under `data_path`
    #[default]
    Disk,
    /// Process memory only, lost on exit
    Memory,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub data_path: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub timeout_ms: u64,
    pub output_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server_url: "http://localhost:8080".to_string(),
            timeout_ms: 300,
            output_path: "cotacoes.txt".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub store: StoreConfig,
    pub client: ClientConfig,
}

impl AppConfig {
    /// Loads the config at the default location, falling back to built-in
    /// defaults when no file has been set up yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("br", "cotacao", "cotacao")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.store.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("br", "cotacao", "cotacao")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().join("database"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.validate()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.fetch_timeout_ms == 0 || self.server.store_timeout_ms == 0 {
            bail!("Server timeouts must be greater than 0");
        }
        if self.client.timeout_ms == 0 {
            bail!("Client timeout must be greater than 0");
        }
        if self.provider.base_url.is_empty() {
            bail!("Provider base_url cannot be empty");
        }
        if self.client.server_url.is_empty() {
            bail!("Client server_url cannot be empty");
        }
        if !self.provider.pair.contains('-') {
            bail!(
                "Currency pair must look like FROM-TO, got '{}'",
                self.provider.pair
            );
        }
        Ok(())
    }
}
