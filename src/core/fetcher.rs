use crate::config::Config;
use crate::core::{ChainState, MetricsCollector};
use crate::models::{BlockSummary, BlocksResponse, RawBlock};
use crate::utils::error::DashboardError;
use std::time::Instant;
use tracing::{info, warn, error};

/// One-shot acquisition of recent blocks from the explorer API.
#[derive(Clone)]
pub struct BlockFetcher {
    client: reqwest::Client,
    api_url: String,
    fetch_limit: usize,
    history_len: usize,
    metrics: MetricsCollector,
}

impl BlockFetcher {
    pub fn new(config: &Config, metrics: MetricsCollector) -> Result<Self, DashboardError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            fetch_limit: config.fetch_limit,
            history_len: config.history_len,
            metrics,
        })
    }

    pub async fn fetch_latest(&self) -> Result<Vec<BlockSummary>, DashboardError> {
        info!(
            event = "fetching_blocks",
            message = "Fetching recent blocks",
            api_url = %self.api_url,
            limit = self.fetch_limit
        );

        let start_time = Instant::now();
        let body = self.client
            .get(&self.api_url)
            .query(&[("limit", self.fetch_limit)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let blocks = parse_blocks(&body)?;
        self.metrics.record_fetch(start_time, blocks.len());

        info!(
            event = "blocks_fetched",
            message = "Successfully fetched recent blocks",
            count = blocks.len(),
            latest_height = ?blocks.first().map(|b| b.height)
        );
        Ok(blocks)
    }

    /// Fetches and applies to `state`. Failures are logged and leave `state`
    /// as it was; returns whether the state changed.
    pub async fn refresh(&self, state: &mut ChainState) -> bool {
        match self.fetch_latest().await {
            Ok(blocks) => {
                let applied = state.apply(blocks, self.history_len);
                if let Some(current) = state.current() {
                    self.metrics.record_current_block(current);
                }
                applied
            }
            Err(e) => {
                self.metrics.record_fetch_failure();
                error!(
                    event = "block_fetch_error",
                    message = "Failed to fetch blockchain data",
                    error = %e
                );
                false
            }
        }
    }
}

/// Parses an explorer response body. The first record must be valid since it
/// becomes the current block; later invalid records are skipped.
pub fn parse_blocks(body: &str) -> Result<Vec<BlockSummary>, DashboardError> {
    let response: BlocksResponse = serde_json::from_str(body)?;
    let raw: Vec<RawBlock> = match response.data {
        Some(data @ serde_json::Value::Array(_)) => serde_json::from_value(data)?,
        _ => return Err(DashboardError::EmptyResponse),
    };

    let mut records = raw.iter();
    let first = records.next().ok_or(DashboardError::EmptyResponse)?;
    let mut blocks = Vec::with_capacity(raw.len());
    blocks.push(first.normalize().map_err(DashboardError::InvalidBlock)?);

    for record in records {
        match record.normalize() {
            Ok(block) => blocks.push(block),
            Err(reason) => warn!(
                event = "block_skipped",
                message = "Skipping malformed block record",
                reason = %reason
            ),
        }
    }

    Ok(blocks)
}
