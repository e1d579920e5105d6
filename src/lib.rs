pub mod cli;
pub mod core;
pub mod providers;
pub mod server;
pub mod store;

use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Serve,
    Client,
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;

    match command {
        AppCommand::Serve => {
            info!("cotacao server starting...");
            server::serve(&config).await
        }
        AppCommand::Client => {
            let bid = cli::client::run(&config.client).await?;
            println!("{}", cli::client::format_quote_line(&bid));
            Ok(())
        }
    }
}
