//! Configuration for the swap watcher.
//!
//! Configuration comes from two sources:
//! - Environment variables (via .env file or shell): connection details, keys
//! - CLI arguments: the command to run and its quantities

use clap::{Parser, Subcommand};
use fastnum::{UD256, decimal::Context};
use oracle_swap_sdk::Market;
use url::Url;

/// Environment configuration (connection details, credentials).
#[derive(derive_more::Debug, serde::Deserialize)]
pub struct EnvConfig {
    /// RPC URL for the node
    pub node_rpc_url: String,

    /// Private key for signing transactions
    #[debug("<redacted>")]
    pub private_key: String,

    /// Swap contract address (default: reference testnet deployment)
    pub swap_contract_address: Option<String>,

    /// Pyth contract address (default: reference testnet deployment)
    pub pyth_contract_address: Option<String>,

    /// Hermes price service URL (default: the public endpoint)
    pub hermes_url: Option<String>,

    /// Balance poll interval (default: 3s)
    pub poll_interval_seconds: Option<u64>,
}

impl EnvConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Market configuration: the testnet deployment with any overrides
    /// applied. The token pair itself is fixed.
    pub fn market(&self) -> Result<Market, ConfigError> {
        let defaults = Market::testnet();
        let swap_contract = match &self.swap_contract_address {
            Some(addr) => addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress(addr.clone()))?,
            None => defaults.swap_contract(),
        };
        let pyth_contract = match &self.pyth_contract_address {
            Some(addr) => addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress(addr.clone()))?,
            None => defaults.pyth_contract(),
        };
        let hermes_url = match &self.hermes_url {
            Some(url) => Url::parse(url).map_err(ConfigError::InvalidUrl)?,
            None => defaults.hermes_url().clone(),
        };
        Ok(Market::custom(
            defaults.base_token().clone(),
            defaults.quote_token().clone(),
            swap_contract,
            pyth_contract,
            hermes_url,
        ))
    }
}

/// CLI arguments for the swap watcher.
#[derive(Debug, Parser)]
#[command(name = "swap-watcher")]
#[command(about = "Balance watcher and transaction runner for the oracle swap contract")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Watch balances and the oracle exchange rate
    Watch,

    /// Faucet-mint tokens to the wallet (or the pool)
    Mint {
        /// Mint the quote token instead of the base token
        #[arg(long)]
        quote: bool,

        /// Mint to the swap contract instead of the wallet
        #[arg(long)]
        to_pool: bool,

        /// Quantity in whole tokens
        #[arg(long, default_value = "10000")]
        qty: String,
    },

    /// Deposit tokens into the swap contract ledger
    Deposit {
        /// Deposit the quote token instead of the base token
        #[arg(long)]
        quote: bool,

        /// Quantity in whole tokens
        #[arg(long, default_value = "5000")]
        qty: String,
    },

    /// Withdraw tokens from the swap contract ledger
    Withdraw {
        /// Withdraw the quote token instead of the base token
        #[arg(long)]
        quote: bool,

        /// Quantity in whole tokens
        #[arg(long, default_value = "5000")]
        qty: String,
    },

    /// Trade base tokens at the current oracle rate
    Swap {
        /// Sell base tokens instead of buying them
        #[arg(long)]
        sell: bool,

        /// Quantity in base tokens
        #[arg(long, default_value = "1")]
        qty: String,
    },
}

/// Parses a human decimal token quantity.
pub fn parse_qty(value: &str) -> Result<UD256, ConfigError> {
    let qty = UD256::from_str(value, Context::default())
        .map_err(|_| ConfigError::InvalidQuantity(value.to_string()))?;
    if qty == UD256::ZERO {
        return Err(ConfigError::ZeroQuantity);
    }
    Ok(qty)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Quantity cannot be zero")]
    ZeroQuantity,

    #[error("Invalid contract address: {0}")]
    InvalidAddress(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use fastnum::udec256;

    use super::*;

    #[test]
    fn test_parse_qty() {
        assert_eq!(parse_qty("5000").unwrap(), udec256!(5000));
        assert_eq!(parse_qty("0.5").unwrap(), udec256!(0.5));
    }

    #[test]
    fn test_parse_qty_rejects_garbage() {
        assert!(matches!(
            parse_qty("five"),
            Err(ConfigError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn test_parse_qty_rejects_zero() {
        assert!(matches!(parse_qty("0"), Err(ConfigError::ZeroQuantity)));
    }

    #[test]
    fn test_market_defaults_and_overrides() {
        let env = EnvConfig {
            node_rpc_url: "http://localhost:8545".to_string(),
            private_key: String::new(),
            swap_contract_address: Some(
                "0x0000000000000000000000000000000000000001".to_string(),
            ),
            pyth_contract_address: None,
            hermes_url: None,
            poll_interval_seconds: None,
        };
        let market = env.market().unwrap();
        assert_eq!(
            market.swap_contract().to_string().to_lowercase(),
            "0x0000000000000000000000000000000000000001"
        );
        assert_eq!(market.pyth_contract(), Market::testnet().pyth_contract());
        assert_eq!(market.hermes_url(), Market::testnet().hermes_url());
    }

    #[test]
    fn test_market_rejects_bad_address() {
        let env = EnvConfig {
            node_rpc_url: String::new(),
            private_key: String::new(),
            swap_contract_address: Some("not-an-address".to_string()),
            pyth_contract_address: None,
            hermes_url: None,
            poll_interval_seconds: None,
        };
        assert!(matches!(
            env.market(),
            Err(ConfigError::InvalidAddress(_))
        ));
    }
}
