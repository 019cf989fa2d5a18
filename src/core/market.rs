use crate::core::wallet::{parse_address, WalletProvider};
use crate::models::BetTag;
use crate::utils::error::DashboardError;
use std::io::{BufRead, Write};
use tracing::info;
use web3::contract::{Contract, Options};
use web3::ethabi::Token;
use web3::types::{Address, H256, U256, U64};

const BET_MARKET_ABI: &str = r#"[
  {
    "type": "function",
    "name": "placeBet",
    "stateMutability": "nonpayable",
    "inputs": [
      { "name": "tag", "type": "bytes1" },
      { "name": "amount", "type": "uint256" }
    ],
    "outputs": []
  }
]"#;

/// Scales a decimal amount such as `"12.5"` by `10^decimals`.
pub fn parse_units(amount: &str, decimals: u32) -> Result<U256, DashboardError> {
    let invalid = |reason: &str| DashboardError::InvalidBet(format!("amount '{}' {}", amount, reason));

    let amount = amount.trim();
    if amount.is_empty() {
        return Err(invalid("is empty"));
    }
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("has no digits"));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid("is not a positive decimal number"));
    }
    if fraction.len() > decimals as usize {
        return Err(invalid(&format!("has more than {} decimal places", decimals)));
    }

    let digits = format!("{}{:0<width$}", whole, fraction, width = decimals as usize);
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_dec_str(digits).map_err(|_| invalid("is too large"))
}

/// A validated buy: account, grid option and scaled amount.
#[derive(Debug, Clone, PartialEq)]
pub struct BetRequest {
    pub account: String,
    pub tag: BetTag,
    pub amount: U256,
    pub display_amount: String,
}

impl BetRequest {
    pub fn prepare(
        account: Option<&str>,
        tag: Option<BetTag>,
        amount: &str,
        decimals: u32,
    ) -> Result<Self, DashboardError> {
        let account = account
            .filter(|a| !a.is_empty())
            .ok_or_else(|| DashboardError::InvalidBet("no wallet connected".into()))?;
        let tag = tag.ok_or_else(|| DashboardError::InvalidBet("no option selected".into()))?;
        let scaled = parse_units(amount, decimals)?;
        if scaled.is_zero() {
            return Err(DashboardError::InvalidBet("amount must be greater than zero".into()));
        }

        Ok(Self {
            account: account.to_string(),
            tag,
            amount: scaled,
            display_amount: amount.trim().to_string(),
        })
    }
}

/// Asks the buy confirmation; anything but an explicit yes cancels.
pub fn confirm_bet(
    request: &BetRequest,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> std::io::Result<bool> {
    writeln!(output, "Buy Confirmation")?;
    writeln!(output, "  Option:        {}", request.tag)?;
    writeln!(output, "  Amount (USDT): {}", request.display_amount)?;
    write!(output, "Buy? [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Client for the betting contract's `placeBet` call.
pub struct BetMarket {
    contract: Contract<web3::transports::Http>,
    confirmations: usize,
}

impl BetMarket {
    pub fn new(
        provider: &WalletProvider,
        contract_address: &str,
        confirmations: usize,
    ) -> Result<Self, DashboardError> {
        let address = parse_address(contract_address)?;
        let contract = Contract::from_json(provider.web3().eth(), address, BET_MARKET_ABI.as_bytes())
            .map_err(|e| DashboardError::ContractError(e.to_string()))?;

        Ok(Self {
            contract,
            confirmations,
        })
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    /// Sends `placeBet(tag, amount)` from the request's account and waits for
    /// the configured number of confirmations.
    pub async fn place_bet(&self, request: &BetRequest) -> Result<H256, DashboardError> {
        let from = parse_address(&request.account)?;
        let params = (Token::FixedBytes(vec![request.tag.as_byte()]), request.amount);

        info!(
            event = "bet_submitting",
            message = "Submitting bet transaction",
            contract = ?self.contract.address(),
            account = %request.account,
            tag = %request.tag,
            amount = %request.amount
        );

        let receipt = self
            .contract
            .call_with_confirmations("placeBet", params, from, Options::default(), self.confirmations)
            .await?;

        if receipt.status == Some(U64::zero()) {
            return Err(DashboardError::ContractError(format!(
                "transaction {:?} reverted",
                receipt.transaction_hash
            )));
        }

        info!(
            event = "bet_confirmed",
            message = "Bet transaction confirmed",
            tx_hash = ?receipt.transaction_hash,
            block_number = ?receipt.block_number
        );
        Ok(receipt.transaction_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "0x8ba1f109551bd432803012645ac136ddd64dba72";

    fn tag(label: &str) -> Option<BetTag> {
        label.parse().ok()
    }

    #[test]
    fn scales_decimal_amounts() {
        assert_eq!(parse_units("1", 18).unwrap(), U256::exp10(18));
        assert_eq!(parse_units("12.5", 18).unwrap(), U256::from(125u64) * U256::exp10(17));
        assert_eq!(parse_units("0.000000000000000001", 18).unwrap(), U256::one());
        assert_eq!(parse_units(".5", 6).unwrap(), U256::from(500_000u64));
        assert_eq!(parse_units("3.", 2).unwrap(), U256::from(300u64));
        assert_eq!(parse_units("0", 18).unwrap(), U256::zero());
    }

    #[test]
    fn rejects_bad_amounts() {
        for amount in ["", " ", ".", "-1", "1e3", "abc", "1.2.3", "0.0000001"] {
            assert!(parse_units(amount, 6).is_err(), "{:?} should be rejected", amount);
        }
    }

    #[test]
    fn request_needs_account_tag_and_amount() {
        assert!(BetRequest::prepare(None, tag("a"), "10", 18).is_err());
        assert!(BetRequest::prepare(Some(""), tag("a"), "10", 18).is_err());
        assert!(BetRequest::prepare(Some(ALICE), None, "10", 18).is_err());
        assert!(BetRequest::prepare(Some(ALICE), tag("a"), "", 18).is_err());
        assert!(BetRequest::prepare(Some(ALICE), tag("a"), "0.00", 18).is_err());

        let request = BetRequest::prepare(Some(ALICE), tag("a"), " 10 ", 18).unwrap();
        assert_eq!(request.tag.as_byte(), 10);
        assert_eq!(request.amount, U256::from(10u64) * U256::exp10(18));
        assert_eq!(request.display_amount, "10");
    }

    #[test]
    fn confirmation_requires_yes() {
        let request = BetRequest::prepare(Some(ALICE), tag("f"), "2.5", 18).unwrap();

        let mut output = Vec::new();
        assert!(confirm_bet(&request, &mut "y\n".as_bytes(), &mut output).unwrap());
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("Buy Confirmation"));
        assert!(shown.contains("Amount (USDT): 2.5"));
        assert!(shown.contains("Option:        f"));

        assert!(confirm_bet(&request, &mut "YES\n".as_bytes(), &mut Vec::new()).unwrap());
        assert!(!confirm_bet(&request, &mut "n\n".as_bytes(), &mut Vec::new()).unwrap());
        assert!(!confirm_bet(&request, &mut "\n".as_bytes(), &mut Vec::new()).unwrap());
        assert!(!confirm_bet(&request, &mut "".as_bytes(), &mut Vec::new()).unwrap());
    }

    #[test]
    fn contract_abi_has_place_bet() {
        let provider = WalletProvider::new("http://127.0.0.1:8545").unwrap();
        let market = BetMarket::new(&provider, ALICE, 1).unwrap();
        assert_eq!(format!("{:?}", market.address()), ALICE);
        assert!(market.contract.abi().function("placeBet").is_ok());
    }
}
