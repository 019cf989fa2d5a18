//! Display formatting for block data. Every function is total: missing input
//! renders as a placeholder instead of failing.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, Utc};

use crate::models::BlockSummary;

pub const NOT_AVAILABLE: &str = "N/A";
pub const LOADING: &str = "Loading...";
pub const PENDING_HEIGHT: &str = "...";

/// Hashes considered by [`last_char_frequency`].
const FREQUENCY_WINDOW: usize = 16;

const MIB: f64 = 1024.0 * 1024.0;

/// `123456` -> `"123,456"`.
pub fn format_height(height: u64) -> String {
    let digits = height.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Height for the current-block header, where zero means nothing is loaded yet.
pub fn height_label(height: Option<u64>) -> String {
    match height {
        Some(h) if h > 0 => format_height(h),
        _ => PENDING_HEIGHT.to_string(),
    }
}

pub fn truncate_hash(hash: Option<&str>) -> String {
    let Some(hash) = hash.filter(|h| !h.is_empty()) else {
        return LOADING.to_string();
    };
    let chars: Vec<char> = hash.chars().collect();
    let head: String = chars.iter().take(8).collect();
    let tail: String = chars[chars.len().saturating_sub(8)..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Wallet button label: `0x1234...abcd`.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    let head: String = chars.iter().take(6).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}

pub fn format_timestamp(timestamp: Option<i64>, now: DateTime<Utc>) -> String {
    let Some(date) = timestamp
        .filter(|ts| *ts != 0)
        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
    else {
        return NOT_AVAILABLE.to_string();
    };
    let minutes_ago = (now - date).num_minutes();
    format!(
        "{} ({} minutes ago)",
        date.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
        minutes_ago
    )
}

pub fn format_size(bytes: Option<u64>) -> String {
    scaled(bytes, "MB")
}

pub fn format_weight(weight: Option<u64>) -> String {
    scaled(weight, "MWU")
}

fn scaled(value: Option<u64>, unit: &str) -> String {
    match value.filter(|v| *v > 0) {
        Some(v) => format!("{:.2} {}", v as f64 / MIB, unit),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_fee(fee: Option<f64>) -> String {
    match present(fee) {
        Some(fee) => format!("{} sat/B", fee),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_fee_range(range: Option<(f64, f64)>) -> String {
    match range {
        Some((low, high)) => format!("{} - {}", format_fee(Some(low)), format_fee(Some(high))),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_btc(amount: Option<f64>) -> String {
    match present(amount) {
        Some(amount) => format!("{:.3} BTC", amount),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_health(health: Option<f64>) -> String {
    match present(health) {
        Some(health) => format!("{:.2}%", health),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

/// Counts the trailing character of the first sixteen hashes and renders the
/// counts as `char:count` pairs in character order, e.g. `"0:2 7:1 a:3"`.
pub fn last_char_frequency(blocks: &[BlockSummary]) -> String {
    let counts = blocks
        .iter()
        .take(FREQUENCY_WINDOW)
        .filter_map(|block| block.hash.chars().last())
        .fold(BTreeMap::<char, usize>::new(), |mut acc, c| {
            *acc.entry(c).or_default() += 1;
            acc
        });

    if counts.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    counts
        .iter()
        .map(|(c, n)| format!("{}:{}", c, n))
        .collect::<Vec<_>>()
        .join(" ")
}
