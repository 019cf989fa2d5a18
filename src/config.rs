use serde::Deserialize;
use std::path::{Path, PathBuf};
use anyhow::Result;
use config::{Config as ConfigSource, File, Environment};

const DEFAULT_CONFIG_FILE: &str = "betboard";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api_url: String,
    pub fetch_limit: usize,
    pub history_len: usize,
    pub data_dir: PathBuf,
    pub rpc_endpoint: Option<String>,
    pub contract_address: Option<String>,
    pub token_decimals: u32,
    pub confirmations: usize,
    pub metrics_port: Option<u16>,
}

impl Config {
    /// Defaults, then the config file (explicit path or optional `betboard.toml`),
    /// then `BETBOARD_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = ConfigSource::builder()
            .set_default("api_url", "https://api.blockchair.com/bitcoin/blocks")?
            .set_default("fetch_limit", 17)?
            .set_default("history_len", 16)?
            .set_default("data_dir", "./data")?
            .set_default("token_decimals", 18)?
            .set_default("confirmations", 1)?
            .add_source(file)
            .add_source(Environment::with_prefix("BETBOARD"))
            .build()?
            .try_deserialize::<Config>()?;

        Ok(config)
    }

    pub fn wallet_file(&self) -> PathBuf {
        self.data_dir.join("wallet.json")
    }

    /// Defaults with the given explorer URL and data directory, no wallet provider.
    #[cfg(test)]
    pub fn for_tests(api_url: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_url: api_url.into(),
            fetch_limit: 17,
            history_len: 16,
            data_dir: data_dir.into(),
            rpc_endpoint: None,
            contract_address: None,
            token_decimals: 18,
            confirmations: 1,
            metrics_port: None,
        }
    }
}
