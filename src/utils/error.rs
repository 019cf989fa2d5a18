use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("No data returned from API")]
    EmptyResponse,

    #[error("Invalid block record: {0}")]
    InvalidBlock(String),

    #[error("Wallet provider unavailable: configure an RPC endpoint to connect a wallet")]
    ProviderUnavailable,

    #[error("Wallet error: {0}")]
    WalletError(String),

    #[error("Invalid bet: {0}")]
    InvalidBet(String),

    #[error("Contract error: {0}")]
    ContractError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),
}

impl From<web3::Error> for DashboardError {
    fn from(e: web3::Error) -> Self {
        DashboardError::WalletError(e.to_string())
    }
}
