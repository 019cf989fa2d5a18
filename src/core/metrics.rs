use anyhow::Result;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use crate::models::BlockSummary;
use std::time::Instant;

/// Without a port no recorder is installed and every call is a no-op.
#[derive(Clone)]
pub struct MetricsCollector {
    port: Option<u16>,
}

impl MetricsCollector {
    pub fn new(port: Option<u16>) -> Result<Self> {
        if let Some(port) = port {
            PrometheusBuilder::new()
                .with_http_listener(([0, 0, 0, 0], port))
                .install()?;
        }

        Ok(Self { port })
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn record_fetch(&self, start_time: Instant, blocks: usize) {
        counter!("block_fetches_total").increment(1);
        counter!("blocks_received_total").increment(blocks as u64);
        histogram!("block_fetch_time_seconds").record(start_time.elapsed().as_secs_f64());
    }

    pub fn record_fetch_failure(&self) {
        counter!("block_fetch_failures_total").increment(1);
    }

    pub fn record_current_block(&self, block: &BlockSummary) {
        gauge!("current_block_height").set(block.height as f64);
    }

    pub fn record_bet(&self, success: bool) {
        if success {
            counter!("bets_submitted_total").increment(1);
        } else {
            counter!("bets_failed_total").increment(1);
        }
    }
}
