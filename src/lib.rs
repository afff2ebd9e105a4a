//! Oracle swap client SDK.
//!
//! # Overview
//!
//! Off-chain client for a Pyth-powered oracle swap contract: two ERC-20
//! tokens traded at the oracle exchange rate, with deposits, withdrawals
//! and fee accumulators keyed by a base/quote flag.
//!
//! Use [`state::Session`] to hold the client-side view: a periodically
//! rebuilt [`state::ChainState`] snapshot of wallet/pool/staked balances
//! (via [`reader::BalanceReader`]) and a [`state::PriceBoard`] fed by
//! [`oracle::stream`] with the freshest Hermes prices, from which the
//! base/quote exchange rate is derived on every update.
//!
//! Use [`dispatch::ActionDispatcher`] to submit mint, deposit, withdraw
//! and swap transactions. Swap transactions carry Hermes price-update
//! payloads and pay the Pyth update fee.
//!
//! See `./tests` and the `swap_watcher` binary for examples.
//!
//! # Limitations/follow-ups
//!
//! * The price stream polls the Hermes HTTP endpoint; a streaming (SSE)
//!   transport would cut update latency.
//! * Dispatch has no retry policy: failed transactions are reported (or
//!   logged and dropped via [`dispatch::ActionDispatcher::dispatch`]) and
//!   the next balance poll reflects whatever landed on chain.

pub mod abi;
pub mod dispatch;
pub mod error;
pub mod num;
pub mod oracle;
pub mod reader;
pub mod state;
pub mod testing;

use alloy::primitives::{Address, B256, address, b256};
use url::Url;

/// Identifier of one asset's price stream in the oracle network.
pub type FeedId = B256;

/// One tradable token: its on-chain contract, oracle feed and precision.
#[derive(Clone, Debug)]
pub struct TokenConfig {
    name: String,
    address: Address,
    feed_id: FeedId,
    decimals: u8,
}

impl TokenConfig {
    pub fn new(name: impl Into<String>, address: Address, feed_id: FeedId, decimals: u8) -> Self {
        Self {
            name: name.into(),
            address,
            feed_id,
            decimals,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// ERC-20 contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Hermes feed the token is priced by.
    pub fn feed_id(&self) -> FeedId {
        self.feed_id
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Converter between human decimal quantities and minor units.
    pub fn converter(&self) -> num::Converter {
        num::Converter::new(self.decimals)
    }
}

/// Market the swap contract is operating on: the base/quote token pair,
/// contract addresses and the oracle endpoint.
#[derive(Clone, Debug)]
pub struct Market {
    base_token: TokenConfig,
    quote_token: TokenConfig,
    swap_contract: Address,
    pyth_contract: Address,
    hermes_url: Url,
}

impl Market {
    /// METH/MUSDT market of the reference testnet deployment.
    pub fn testnet() -> Self {
        Self {
            base_token: TokenConfig::new(
                "METH",
                address!("0xE4C73672477a6e1dA94b7d84E910254eb9821910"),
                b256!("ff61491a931112ddf1bd8147cd1b641375f79f5825126d665480874634fd0ace"),
                18,
            ),
            quote_token: TokenConfig::new(
                "MUSDT",
                address!("0x24d1bbb1D87AaCCcEF4D2F165E302653Ed33b65C"),
                b256!("2b89b9dc8fdf9f34709a5b106b472f0f39bb6ca9ce04b0fd7f2e971688e2e53b"),
                18,
            ),
            swap_contract: address!("0xB6dF9f27De9275b5B9640DFC4BEb3855bf8539dC"),
            pyth_contract: address!("0x0708325268dF9F66270F1401206434524814508b"),
            hermes_url: "https://hermes.pyth.network"
                .parse()
                .expect("static URL parses"),
        }
    }

    pub fn custom(
        base_token: TokenConfig,
        quote_token: TokenConfig,
        swap_contract: Address,
        pyth_contract: Address,
        hermes_url: Url,
    ) -> Self {
        Self {
            base_token,
            quote_token,
            swap_contract,
            pyth_contract,
            hermes_url,
        }
    }

    pub fn base_token(&self) -> &TokenConfig {
        &self.base_token
    }

    pub fn quote_token(&self) -> &TokenConfig {
        &self.quote_token
    }

    /// Token selected by the contract-wide base/quote flag.
    pub fn token(&self, is_base: bool) -> &TokenConfig {
        if is_base {
            &self.base_token
        } else {
            &self.quote_token
        }
    }

    pub fn swap_contract(&self) -> Address {
        self.swap_contract
    }

    pub fn pyth_contract(&self) -> Address {
        self.pyth_contract
    }

    pub fn hermes_url(&self) -> &Url {
        &self.hermes_url
    }

    /// Both feed ids, base first.
    pub fn feed_ids(&self) -> [FeedId; 2] {
        [self.base_token.feed_id, self.quote_token.feed_id]
    }
}
