//! Test utilities.
//!
//! [`ChainStateBuilder`] and [`PriceUpdateBuilder`] create state values
//! with controlled contents for unit testing the poller and the rate
//! derivation. [`StubReader`] stands in for a live node behind the
//! [`ChainReader`] seam.

use std::sync::atomic::{AtomicUsize, Ordering};

use alloy::primitives::{Address, U256};

use crate::{
    FeedId,
    error::SwapError,
    oracle::PriceFeedUpdate,
    reader::ChainReader,
    state::ChainState,
};

/// Builder for [`ChainState`] snapshots with controlled values.
#[derive(Clone, Debug, Default)]
pub struct ChainStateBuilder {
    account_base: U256,
    account_quote: U256,
    pool_base: U256,
    pool_quote: U256,
    staked_base: U256,
    staked_quote: U256,
    buy_fee_total: U256,
    sell_fee_total: U256,
}

impl ChainStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_balance(mut self, is_base: bool, value: U256) -> Self {
        if is_base {
            self.account_base = value;
        } else {
            self.account_quote = value;
        }
        self
    }

    pub fn pool_balance(mut self, is_base: bool, value: U256) -> Self {
        if is_base {
            self.pool_base = value;
        } else {
            self.pool_quote = value;
        }
        self
    }

    pub fn staked_balance(mut self, is_base: bool, value: U256) -> Self {
        if is_base {
            self.staked_base = value;
        } else {
            self.staked_quote = value;
        }
        self
    }

    pub fn fee_total(mut self, is_buy: bool, value: U256) -> Self {
        if is_buy {
            self.buy_fee_total = value;
        } else {
            self.sell_fee_total = value;
        }
        self
    }

    pub fn build(self) -> ChainState {
        ChainState::new(
            self.account_base,
            self.account_quote,
            self.pool_base,
            self.pool_quote,
            self.staked_base,
            self.staked_quote,
            self.buy_fee_total,
            self.sell_fee_total,
        )
    }
}

/// Builder for [`PriceFeedUpdate`] values.
#[derive(Clone, Copy, Debug)]
pub struct PriceUpdateBuilder {
    feed_id: FeedId,
    price: i64,
    conf: u64,
    expo: i32,
    publish_time: u64,
}

impl PriceUpdateBuilder {
    pub fn new(feed_id: FeedId) -> Self {
        Self {
            feed_id,
            price: 1,
            conf: 0,
            expo: 0,
            publish_time: 0,
        }
    }

    /// Sets the fixed-point price: the published value is `price * 10^expo`.
    pub fn price(mut self, price: i64, expo: i32) -> Self {
        self.price = price;
        self.expo = expo;
        self
    }

    pub fn conf(mut self, conf: u64) -> Self {
        self.conf = conf;
        self
    }

    pub fn publish_time(mut self, publish_time: u64) -> Self {
        self.publish_time = publish_time;
        self
    }

    pub fn build(self) -> PriceFeedUpdate {
        PriceFeedUpdate {
            feed_id: self.feed_id,
            price: self.price,
            conf: self.conf,
            expo: self.expo,
            publish_time: self.publish_time,
        }
    }
}

/// [`ChainReader`] serving values from a prepared snapshot, with an
/// optional injected failure on the sell-side fee read (the last of the
/// eight reads a poll tick issues).
#[derive(Debug)]
pub struct StubReader {
    snapshot: ChainState,
    fail_sell_fee: bool,
    reads: AtomicUsize,
}

impl StubReader {
    pub fn new(snapshot: ChainState) -> Self {
        Self {
            snapshot,
            fail_sell_fee: false,
            reads: AtomicUsize::new(0),
        }
    }

    /// Makes the sell-side fee read fail, so one of the tick's eight
    /// reads errors while the other seven succeed.
    pub fn with_failing_read(mut self) -> Self {
        self.fail_sell_fee = true;
        self
    }

    /// Replaces the values served by subsequent reads.
    pub fn set_snapshot(&mut self, snapshot: ChainState) {
        self.snapshot = snapshot;
    }

    /// Number of individual reads issued so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    fn record(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }
}

impl ChainReader for StubReader {
    async fn account_balance(&self, is_base: bool, _account: Address) -> Result<U256, SwapError> {
        self.record();
        Ok(self.snapshot.account_balance(is_base))
    }

    async fn pool_balance(&self, is_base: bool) -> Result<U256, SwapError> {
        self.record();
        Ok(self.snapshot.pool_balance(is_base))
    }

    async fn staked_balance(&self, is_base: bool, _account: Address) -> Result<U256, SwapError> {
        self.record();
        Ok(self.snapshot.staked_balance(is_base))
    }

    async fn fee_total(&self, is_buy: bool) -> Result<U256, SwapError> {
        self.record();
        if !is_buy && self.fail_sell_fee {
            return Err(SwapError::Transport("stub read failure".to_string()));
        }
        Ok(self.snapshot.fee_total(is_buy))
    }
}
