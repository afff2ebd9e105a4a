//! Error types for the swap watcher.

use oracle_swap_sdk::error::SwapError;

use crate::config::ConfigError;

/// Main error type for the swap watcher.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Environment configuration error: {0}")]
    EnvConfig(#[from] envy::Error),

    #[error("Swap SDK error: {0}")]
    Swap(#[from] SwapError),

    #[error("Alloy signer error: {0}")]
    AlloySigner(#[from] alloy::signers::local::LocalSignerError),

    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(#[from] url::ParseError),

    #[error("Price stream closed unexpectedly")]
    PriceStreamClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
