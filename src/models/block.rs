use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Smallest currency units per coin.
const SATS_PER_COIN: f64 = 100_000_000.0;

/// A mined block, normalized for display. Optional fields render as placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub height: u64,
    pub hash: String,
    /// Unix epoch seconds.
    pub timestamp: Option<i64>,
    pub size: Option<u64>,
    pub weight: Option<u64>,
    pub health: Option<f64>,
    pub fee_range: Option<(f64, f64)>,
    /// sat/byte
    pub median_fee: Option<f64>,
    /// BTC
    pub total_fee: Option<f64>,
    /// BTC, subsidy plus fees.
    pub reward: Option<f64>,
    pub miner: Option<String>,
}

#[cfg(test)]
impl BlockSummary {
    pub fn new(height: u64, hash: impl Into<String>) -> Self {
        Self {
            height,
            hash: hash.into(),
            timestamp: None,
            size: None,
            weight: None,
            health: None,
            fee_range: None,
            median_fee: None,
            total_fee: None,
            reward: None,
            miner: None,
        }
    }
}

/// Envelope returned by the block-explorer `blocks` endpoint.
#[derive(Debug, Deserialize)]
pub struct BlocksResponse {
    #[serde(default)]
    pub data: Option<Value>,
}

/// One block as the explorer sends it. Numeric fields arrive either as JSON
/// numbers or as numeric strings, so they are kept loose until normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBlock {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub time: Option<Value>,
    #[serde(default)]
    pub size: Option<Value>,
    #[serde(default)]
    pub weight: Option<Value>,
    #[serde(default)]
    pub fee_per_kb: Option<Value>,
    #[serde(default)]
    pub fee_total: Option<Value>,
    #[serde(default)]
    pub reward: Option<Value>,
    #[serde(default)]
    pub guessed_miner: Option<String>,
}

impl RawBlock {
    /// Unit-converts the raw fields. Fails when the record has no usable
    /// height or hash.
    pub fn normalize(&self) -> Result<BlockSummary, String> {
        let height = count(&self.id).ok_or_else(|| format!("missing or invalid id: {:?}", self.id))?;
        let hash = self
            .hash
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| format!("block {} has no hash", height))?;

        Ok(BlockSummary {
            height,
            hash: hash.to_string(),
            timestamp: epoch_seconds(&self.time),
            size: count(&self.size),
            weight: count(&self.weight),
            health: None,
            fee_range: None,
            median_fee: number(&self.fee_per_kb).map(|fee| fee / 1000.0),
            total_fee: number(&self.fee_total).map(|fee| fee / SATS_PER_COIN),
            reward: number(&self.reward).map(|reward| reward / SATS_PER_COIN),
            miner: self
                .guessed_miner
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
        })
    }
}

fn number(value: &Option<Value>) -> Option<f64> {
    let n = match value.as_ref()? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn count(value: &Option<Value>) -> Option<u64> {
    let n = number(value)?;
    (n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64).then_some(n as u64)
}

/// Explorer times are UTC `YYYY-MM-DD HH:MM:SS`; RFC 3339 strings and
/// millisecond epochs are accepted too.
fn epoch_seconds(value: &Option<Value>) -> Option<i64> {
    match value.as_ref()? {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(naive.and_utc().timestamp());
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.timestamp());
            }
            s.parse::<i64>().ok().map(|ms| ms / 1000)
        }
        Value::Number(n) => match n.as_i64() {
            Some(ms) => Some(ms / 1000),
            None => n
                .as_f64()
                .filter(|ms| ms.is_finite())
                .map(|ms| (ms / 1000.0).floor() as i64),
        },
        _ => None,
    }
}
