//! Balance watcher and transaction runner for the oracle swap contract.
//!
//! `watch` polls the eight on-chain balances and the oracle exchange
//! rate; the other subcommands submit a single mint, deposit, withdraw
//! or swap transaction and exit.

mod config;
mod error;
mod watcher;

use std::{process::exit, time::Duration};

use alloy::{
    network::EthereumWallet,
    providers::{DynProvider, ProviderBuilder},
    rpc::client::RpcClient,
    signers::local::PrivateKeySigner,
};
use clap::Parser;
use oracle_swap_sdk::dispatch::{Action, ActionDispatcher};
use tracing::error;
use url::Url;

use config::{CliConfig, Command, EnvConfig, parse_qty};
use error::Result;
use watcher::Watcher;

#[tokio::main]
async fn main() {
    // Load .env file
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Warning: Failed to load .env file: {}", e);
    }

    let env_config = match EnvConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to parse environment configuration: {}", e);
            exit(1);
        }
    };

    let cli_config = CliConfig::parse();

    // Set up logging
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(env_config, cli_config).await {
        error!(%e, "Swap watcher encountered an error, shutting down");
        exit(1);
    }
}

async fn run(env_config: EnvConfig, cli_config: CliConfig) -> Result<()> {
    let market = env_config.market()?;

    let signer: PrivateKeySigner = env_config.private_key.parse()?;
    let account = signer.address();
    let wallet = EthereumWallet::new(signer);

    let node_url = Url::parse(&env_config.node_rpc_url)?;
    let rpc_client = RpcClient::new_http(node_url);
    let provider = DynProvider::new(
        ProviderBuilder::new()
            .wallet(wallet)
            .connect_client(rpc_client),
    );

    match cli_config.command {
        Command::Watch => {
            let poll_interval =
                Duration::from_secs(env_config.poll_interval_seconds.unwrap_or(3));
            let mut watcher = Watcher::new(market, provider, account, poll_interval);
            watcher.run().await
        }
        Command::Mint { quote, to_pool, qty } => {
            let destination = if to_pool { market.swap_contract() } else { account };
            let action = Action::Mint {
                is_base: !quote,
                destination,
                qty: parse_qty(&qty)?,
            };
            ActionDispatcher::new(&market, provider).dispatch(action).await;
            Ok(())
        }
        Command::Deposit { quote, qty } => {
            let action = Action::Deposit {
                is_base: !quote,
                qty: parse_qty(&qty)?,
            };
            ActionDispatcher::new(&market, provider).dispatch(action).await;
            Ok(())
        }
        Command::Withdraw { quote, qty } => {
            let action = Action::Withdraw {
                is_base: !quote,
                qty: parse_qty(&qty)?,
            };
            ActionDispatcher::new(&market, provider).dispatch(action).await;
            Ok(())
        }
        Command::Swap { sell, qty } => {
            let action = Action::Swap {
                is_buy: !sell,
                qty: parse_qty(&qty)?,
            };
            ActionDispatcher::new(&market, provider).dispatch(action).await;
            Ok(())
        }
    }
}
