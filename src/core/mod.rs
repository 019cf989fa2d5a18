mod format;
mod fetcher;
mod market;
mod metrics;
mod notice;
mod render;
mod state;
mod wallet;

use anyhow::Result;
use chrono::Utc;
use crate::config::Config;
use crate::models::BetTag;
use crate::utils::error::DashboardError;
use std::io::Write;
use tracing::{info, error};

pub use fetcher::BlockFetcher;
pub use market::{confirm_bet, BetMarket, BetRequest};
pub use metrics::MetricsCollector;
pub use notice::Notice;
pub use render::{render_dashboard, render_fallback, DashboardView};
pub use state::ChainState;
pub use wallet::{WalletProvider, WalletSession, WalletStore};

pub struct Dashboard {
    fetcher: BlockFetcher,
    state: ChainState,
    session: WalletSession,
    provider: Option<WalletProvider>,
    metrics_collector: MetricsCollector,
    config: Config,
}

impl Dashboard {
    pub fn new(config: Config) -> Result<Self> {
        let metrics_collector = MetricsCollector::new(config.metrics_port)?;
        let fetcher = BlockFetcher::new(&config, metrics_collector.clone())?;
        let session = WalletSession::restore(WalletStore::new(config.wallet_file()));
        let provider = config
            .rpc_endpoint
            .as_deref()
            .map(WalletProvider::new)
            .transpose()?;

        info!(
            event = "dashboard_initialized",
            message = "Dashboard ready",
            api_url = %config.api_url,
            wallet_provider = provider.is_some(),
            metrics_port = ?metrics_collector.port()
        );

        Ok(Self {
            fetcher,
            state: ChainState::default(),
            session,
            provider,
            metrics_collector,
            config,
        })
    }

    /// Fetches once and prints the dashboard.
    pub async fn show(&mut self, expanded: bool) -> Result<()> {
        self.fetcher.refresh(&mut self.state).await;

        let view = DashboardView {
            state: &self.state,
            wallet_label: self.session.label(),
            expanded,
            now: Utc::now(),
        };
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(render_dashboard(&view).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    pub async fn connect(&mut self) -> Result<()> {
        let provider = match self.provider.as_ref().ok_or(DashboardError::ProviderUnavailable) {
            Ok(provider) => provider,
            Err(e) => {
                Notice::warning("Wallet Required", e.to_string()).emit();
                return Ok(());
            }
        };

        let result = match provider.request_accounts().await {
            Ok(accounts) if accounts.is_empty() => Err(DashboardError::WalletError(
                "provider returned no accounts".into(),
            )),
            Ok(accounts) => self.session.handle_accounts_changed(&accounts),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                info!(
                    event = "wallet_connected",
                    message = "Wallet connected",
                    account = ?self.session.account()
                );
                Notice::success("Connected", "Wallet connected successfully!").emit();
            }
            Err(e) => {
                error!(
                    event = "wallet_connect_error",
                    message = "Wallet connection error",
                    error = %e
                );
                Notice::error("Error", "Failed to connect wallet").emit();
            }
        }
        Ok(())
    }

    pub fn disconnect(&mut self) -> Result<()> {
        self.session.handle_accounts_changed(&[])?;
        info!(event = "wallet_disconnected", message = "Wallet address cleared");
        Notice::success("Disconnected", "Wallet address cleared").emit();
        Ok(())
    }

    /// Validates the buy, asks for confirmation unless `assume_yes`, then
    /// submits it. Contract failures surface as an error notice.
    pub async fn bet(&mut self, tag: BetTag, amount: &str, assume_yes: bool) -> Result<()> {
        let request = match BetRequest::prepare(
            self.session.account(),
            Some(tag),
            amount,
            self.config.token_decimals,
        ) {
            Ok(request) => request,
            Err(e) => {
                Notice::warning("Cannot place bet", e.to_string()).emit();
                return Ok(());
            }
        };

        let (Some(provider), Some(contract_address)) =
            (&self.provider, self.config.contract_address.as_deref())
        else {
            Notice::warning(
                "Wallet Required",
                "Configure an RPC endpoint and contract address to place bets",
            )
            .emit();
            return Ok(());
        };

        if !assume_yes {
            let mut input = std::io::stdin().lock();
            let mut output = std::io::stdout().lock();
            if !confirm_bet(&request, &mut input, &mut output)? {
                info!(event = "bet_cancelled", message = "Bet cancelled by user");
                return Ok(());
            }
        }

        let outcome = match BetMarket::new(provider, contract_address, self.config.confirmations) {
            Ok(market) => {
                info!(
                    event = "bet_confirmed_by_user",
                    message = "Placing bet",
                    contract = ?market.address(),
                    tag = %request.tag
                );
                market.place_bet(&request).await
            }
            Err(e) => Err(e),
        };
        self.metrics_collector.record_bet(outcome.is_ok());

        match outcome {
            Ok(tx_hash) => {
                Notice::success("Success", format!("Bet placed successfully! ({:?})", tx_hash)).emit();
            }
            Err(e) => {
                error!(
                    event = "bet_error",
                    message = "Betting error",
                    error = %e
                );
                Notice::error("Error", e.to_string()).emit();
            }
        }
        Ok(())
    }
}
