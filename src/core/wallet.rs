use crate::core::format;
use crate::utils::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use web3::types::Address;
use web3::Web3;

const CONNECT_PROMPT: &str = "Connect Wallet";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredWallet {
    #[serde(rename = "walletAddress", default, skip_serializing_if = "Option::is_none")]
    wallet_address: Option<String>,
}

/// Keeps the last connected address under the `walletAddress` key of a JSON file.
#[derive(Debug, Clone)]
pub struct WalletStore {
    path: PathBuf,
}

impl WalletStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or unreadable file means no saved account.
    pub fn load(&self) -> Option<String> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(
                    event = "wallet_store_unreadable",
                    message = "Failed to read saved wallet",
                    path = %self.path.display(),
                    error = %e
                );
                return None;
            }
        };

        match serde_json::from_str::<StoredWallet>(&raw) {
            Ok(stored) => stored.wallet_address.filter(|a| !a.is_empty()),
            Err(e) => {
                warn!(
                    event = "wallet_store_corrupt",
                    message = "Ignoring corrupt wallet file",
                    path = %self.path.display(),
                    error = %e
                );
                None
            }
        }
    }

    pub fn save(&self, address: &str) -> Result<(), DashboardError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let stored = StoredWallet {
            wallet_address: Some(address.to_string()),
        };
        std::fs::write(&self.path, serde_json::to_vec_pretty(&stored)?)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), DashboardError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The connected account, restored from the store at startup.
#[derive(Debug)]
pub struct WalletSession {
    account: Option<String>,
    store: WalletStore,
}

impl WalletSession {
    pub fn restore(store: WalletStore) -> Self {
        let account = store.load();
        if let Some(account) = &account {
            info!(
                event = "wallet_restored",
                message = "Restored saved wallet address",
                account = %account,
                path = %store.path().display()
            );
        }
        Self { account, store }
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// First account becomes current and is saved; an empty list disconnects.
    pub fn handle_accounts_changed(&mut self, accounts: &[String]) -> Result<(), DashboardError> {
        match accounts.first() {
            Some(account) => {
                self.store.save(account)?;
                self.account = Some(account.clone());
            }
            None => self.disconnect()?,
        }
        Ok(())
    }

    pub fn disconnect(&mut self) -> Result<(), DashboardError> {
        self.store.clear()?;
        self.account = None;
        Ok(())
    }

    pub fn label(&self) -> String {
        match &self.account {
            Some(account) => format::short_address(account),
            None => CONNECT_PROMPT.to_string(),
        }
    }
}

/// Wallet RPC over HTTP.
#[derive(Clone)]
pub struct WalletProvider {
    web3: Web3<web3::transports::Http>,
}

impl WalletProvider {
    pub fn new(rpc_endpoint: &str) -> Result<Self, DashboardError> {
        let transport = web3::transports::Http::new(rpc_endpoint)?;
        Ok(Self {
            web3: Web3::new(transport),
        })
    }

    pub fn web3(&self) -> &Web3<web3::transports::Http> {
        &self.web3
    }

    pub async fn request_accounts(&self) -> Result<Vec<String>, DashboardError> {
        let accounts = self.web3.eth().request_accounts().await?;
        Ok(accounts.iter().map(address_string).collect())
    }
}

pub fn address_string(address: &Address) -> String {
    format!("{:?}", address)
}

pub fn parse_address(value: &str) -> Result<Address, DashboardError> {
    let hex = value.trim().trim_start_matches("0x");
    hex.parse::<Address>()
        .map_err(|e| DashboardError::WalletError(format!("invalid address '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "0x8ba1f109551bd432803012645ac136ddd64dba72";
    const BOB: &str = "0x71c7656ec7ab88b098defb751b7401b5f6d8976f";

    fn store(dir: &tempfile::TempDir) -> WalletStore {
        WalletStore::new(dir.path().join("nested").join("wallet.json"))
    }

    #[test]
    fn empty_store_has_no_account() {
        let dir = tempfile::tempdir().unwrap();
        let session = WalletSession::restore(store(&dir));
        assert_eq!(session.account(), None);
        assert_eq!(session.label(), "Connect Wallet");
    }

    #[test]
    fn account_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = WalletSession::restore(store(&dir));
        session.handle_accounts_changed(&[ALICE.to_string()]).unwrap();

        let restored = WalletSession::restore(store(&dir));
        assert_eq!(restored.account(), Some(ALICE));
        assert_eq!(restored.label(), "0x8ba1...ba72");

        let raw = std::fs::read_to_string(store(&dir).path()).unwrap();
        assert!(raw.contains("\"walletAddress\""));
    }

    #[test]
    fn first_changed_account_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = WalletSession::restore(store(&dir));
        session
            .handle_accounts_changed(&[BOB.to_string(), ALICE.to_string()])
            .unwrap();
        assert_eq!(session.account(), Some(BOB));
        assert_eq!(store(&dir).load().as_deref(), Some(BOB));
    }

    #[test]
    fn empty_accounts_disconnect() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = WalletSession::restore(store(&dir));
        session.handle_accounts_changed(&[ALICE.to_string()]).unwrap();
        session.handle_accounts_changed(&[]).unwrap();

        assert_eq!(session.account(), None);
        assert!(!store(&dir).path().exists());
        assert_eq!(WalletSession::restore(store(&dir)).account(), None);
    }

    #[test]
    fn disconnect_without_saved_account() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = WalletSession::restore(store(&dir));
        assert!(session.disconnect().is_ok());
    }

    #[test]
    fn corrupt_store_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(WalletStore::new(path).load(), None);
    }

    #[test]
    fn parses_addresses() {
        let address = parse_address(ALICE).unwrap();
        assert_eq!(address_string(&address), ALICE);
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("not an address").is_err());
    }
}
