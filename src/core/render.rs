use crate::core::format::{self, NOT_AVAILABLE};
use crate::core::ChainState;
use crate::models::BetTag;
use chrono::{DateTime, Datelike, Utc};
use std::fmt::Write;

const GRID_COLUMNS: usize = 4;
const RULE: &str = "------------------------------------------------------------";

pub struct DashboardView<'a> {
    pub state: &'a ChainState,
    pub wallet_label: String,
    /// Whether the block history panel is open.
    pub expanded: bool,
    pub now: DateTime<Utc>,
}

pub fn render_dashboard(view: &DashboardView<'_>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_dashboard(&mut out, view);
    out
}

fn write_dashboard(out: &mut String, view: &DashboardView<'_>) -> std::fmt::Result {
    let current = view.state.current();

    writeln!(out, "BetMarket{:>51}", format!("[{}]", view.wallet_label))?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Current Block  #{}", format::height_label(current.map(|b| b.height)))?;
    writeln!(out, "Block Hash     {}", format::truncate_hash(current.map(|b| b.hash.as_str())))?;
    if let Some(block) = current.filter(|_| view.expanded) {
        writeln!(out, "Full Hash      {}", block.hash)?;
    }
    writeln!(out)?;

    let rows = [
        ("Height", format!("#{}", format::height_label(current.map(|b| b.height)))),
        ("Hash", format::truncate_hash(current.map(|b| b.hash.as_str()))),
        ("Last char frequency (16 blocks)", view.state.last_char_frequency()),
        ("Timestamp", format::format_timestamp(current.and_then(|b| b.timestamp), view.now)),
        ("Size", format::format_size(current.and_then(|b| b.size))),
        ("Weight", format::format_weight(current.and_then(|b| b.weight))),
        ("Health", format::format_health(current.and_then(|b| b.health))),
        ("Fee range", format::format_fee_range(current.and_then(|b| b.fee_range))),
        ("Median fee", format::format_fee(current.and_then(|b| b.median_fee))),
        ("Total fees", format::format_btc(current.and_then(|b| b.total_fee))),
        ("Subsidy + fees", format::format_btc(current.and_then(|b| b.reward))),
        (
            "Miner",
            current
                .and_then(|b| b.miner.clone())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
    ];
    for (label, value) in rows {
        writeln!(out, "  {:<32} {}", label, value)?;
    }
    writeln!(out)?;

    write_history(out, view)?;
    writeln!(out, "{}", RULE)?;
    write_grid(out)?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Powered by N3LAB (c) {}", view.now.year())?;
    Ok(())
}

fn write_history(out: &mut String, view: &DashboardView<'_>) -> std::fmt::Result {
    let marker = if view.expanded { "[-]" } else { "[+]" };
    writeln!(out, "{} Recent Blocks History (Last 16)", marker)?;
    if !view.expanded {
        return Ok(());
    }

    writeln!(out, "  {:<14} {}", "Height", "Hash")?;
    for block in view.state.historical().iter().take(16) {
        writeln!(
            out,
            "  {:<14} {}",
            format!("#{}", format::format_height(block.height)),
            format::truncate_hash(Some(block.hash.as_str()))
        )?;
    }
    Ok(())
}

fn write_grid(out: &mut String) -> std::fmt::Result {
    let tags: Vec<BetTag> = BetTag::all().collect();
    for row in tags.chunks(GRID_COLUMNS) {
        let line: Vec<String> = row.iter().map(|tag| format!("[ {} ] Buy", tag)).collect();
        writeln!(out, "  {}", line.join("    "))?;
    }
    Ok(())
}

/// Screen shown when a command fails outright.
pub fn render_fallback(message: Option<&str>) -> String {
    let message = message
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or("An unexpected error occurred");
    format!("Something went wrong\n{}\nRun the command again to retry.\n", message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockSummary;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 20, 10, 30, 0).unwrap()
    }

    fn loaded_state() -> ChainState {
        let mut current = BlockSummary::new(870_123, format!("{:0>64}", "abcdef0123456789"));
        current.size = Some(1_572_864);
        current.total_fee = Some(0.1825);
        current.miner = Some("Foundry USA".to_string());

        let mut blocks = vec![current];
        for i in 1..=17u64 {
            blocks.push(BlockSummary::new(870_123 - i, format!("{:063x}a", i)));
        }
        let mut state = ChainState::default();
        state.apply(blocks, 16);
        state
    }

    #[test]
    fn empty_state_shows_placeholders() {
        let state = ChainState::default();
        let out = render_dashboard(&DashboardView {
            state: &state,
            wallet_label: "Connect Wallet".into(),
            expanded: true,
            now: now(),
        });

        assert!(out.contains("[Connect Wallet]"));
        assert!(out.contains("Current Block  #..."));
        assert!(out.contains("Block Hash     Loading..."));
        assert!(out.contains("Miner"));
        assert!(out.contains("N/A"));
        assert!(!out.contains("Full Hash"));
    }

    #[test]
    fn loaded_state_shows_current_block() {
        let state = loaded_state();
        let out = render_dashboard(&DashboardView {
            state: &state,
            wallet_label: "0x8ba1...ba72".into(),
            expanded: false,
            now: now(),
        });

        assert!(out.contains("Current Block  #870,123"));
        assert!(out.contains("00000000...23456789"));
        assert!(out.contains("a:16"));
        assert!(out.contains("1.50 MB"));
        assert!(out.contains("0.182 BTC"));
        assert!(out.contains("Foundry USA"));
        assert!(out.contains("[+] Recent Blocks History (Last 16)"));
        assert!(!out.contains("#870,122"));
        assert!(!out.contains("Full Hash"));
    }

    #[test]
    fn expanded_history_lists_sixteen_rows() {
        let state = loaded_state();
        let out = render_dashboard(&DashboardView {
            state: &state,
            wallet_label: "Connect Wallet".into(),
            expanded: true,
            now: now(),
        });

        assert!(out.contains("[-] Recent Blocks History (Last 16)"));
        assert!(out.contains(&format!("Full Hash      {:0>64}\n", "abcdef0123456789")));
        assert!(out.contains("#870,122"));
        assert!(out.contains("#870,107"));
        assert!(!out.contains("#870,106"));
    }

    #[test]
    fn grid_has_sixteen_options() {
        let state = ChainState::default();
        let out = render_dashboard(&DashboardView {
            state: &state,
            wallet_label: String::new(),
            expanded: false,
            now: now(),
        });

        assert_eq!(out.matches("] Buy").count(), 16);
        assert!(out.contains("  [ 0 ] Buy    [ 1 ] Buy    [ 2 ] Buy    [ 3 ] Buy\n"));
        assert!(out.contains("[ f ] Buy"));
        assert!(out.contains("Powered by N3LAB (c) 2024"));
    }

    #[test]
    fn fallback_message() {
        assert_eq!(
            render_fallback(Some("rpc down")),
            "Something went wrong\nrpc down\nRun the command again to retry.\n"
        );
        assert!(render_fallback(None).contains("An unexpected error occurred"));
        assert!(render_fallback(Some("  ")).contains("An unexpected error occurred"));
    }
}
