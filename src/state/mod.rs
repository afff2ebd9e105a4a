//! Client-side session state tracking.
//!
//! [`Session`] is the single owner of everything the client derives from
//! the outside world: the [`ChainState`] balance snapshot rebuilt by the
//! fixed-interval poll, and the [`PriceBoard`] mutated by incoming oracle
//! updates. All mutation happens on one cooperative task; concurrent
//! activities interleave only at await points, so no locking is needed.

mod chain;
mod prices;

use alloy::primitives::Address;

use crate::{Market, error::SwapError, reader::ChainReader};

// Public re-exports
pub use chain::*;
pub use prices::*;

/// Session state: wallet connection, balance snapshot and price board.
///
/// The poller side is a two-state machine. While connected, [`Self::refresh`]
/// rebuilds the snapshot; while disconnected, the snapshot is absent and
/// refreshing is a no-op. Price updates are applied independently of the
/// connection state.
#[derive(Clone, Debug)]
pub struct Session {
    market: Market,
    account: Option<Address>,
    chain_state: Option<ChainState>,
    prices: PriceBoard,
}

impl Session {
    pub fn new(market: Market) -> Self {
        let prices = PriceBoard::new(&market);
        Self {
            market,
            account: None,
            chain_state: None,
            prices,
        }
    }

    pub fn market(&self) -> &Market {
        &self.market
    }

    /// Connects the session to a wallet account. The snapshot stays empty
    /// until the next successful refresh.
    pub fn connect(&mut self, account: Address) {
        self.account = Some(account);
    }

    /// Disconnects the wallet and clears the snapshot.
    pub fn disconnect(&mut self) {
        self.account = None;
        self.chain_state = None;
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    /// Latest successfully published snapshot, if any.
    pub fn chain_state(&self) -> Option<&ChainState> {
        self.chain_state.as_ref()
    }

    pub fn prices(&self) -> &PriceBoard {
        &self.prices
    }

    /// Routes an incoming oracle update into the price board, re-deriving
    /// the exchange rate.
    pub fn apply_price_update(&mut self, update: crate::oracle::PriceFeedUpdate) {
        self.prices.apply_update(update);
    }

    pub fn exchange_rate(&self) -> Option<ExchangeRate> {
        self.prices.exchange_rate()
    }

    /// One poll tick: rebuilds the snapshot from the eight balance reads
    /// and publishes it atomically.
    ///
    /// On any read failure the previously published snapshot is retained
    /// and the error is returned for the caller to log; the next scheduled
    /// tick is the retry. While disconnected this is a no-op with an empty
    /// snapshot.
    pub async fn refresh<R: ChainReader>(&mut self, reader: &R) -> Result<(), SwapError> {
        let Some(account) = self.account else {
            self.chain_state = None;
            return Ok(());
        };
        let snapshot = ChainState::read_from(reader, account).await?;
        self.chain_state = Some(snapshot);
        Ok(())
    }
}
