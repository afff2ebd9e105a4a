use alloy::primitives::{Address, U256};

use crate::{error::SwapError, reader::ChainReader};

/// On-chain balance snapshot, taken at one point in time.
///
/// Rebuilt wholesale on every poll tick and replaced atomically: a reader
/// never observes a mix of values from different ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainState {
    account_base_balance: U256,
    account_quote_balance: U256,
    pool_base_balance: U256,
    pool_quote_balance: U256,
    staked_base_balance: U256,
    staked_quote_balance: U256,
    buy_fee_total: U256,
    sell_fee_total: U256,
}

impl ChainState {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        account_base_balance: U256,
        account_quote_balance: U256,
        pool_base_balance: U256,
        pool_quote_balance: U256,
        staked_base_balance: U256,
        staked_quote_balance: U256,
        buy_fee_total: U256,
        sell_fee_total: U256,
    ) -> Self {
        Self {
            account_base_balance,
            account_quote_balance,
            pool_base_balance,
            pool_quote_balance,
            staked_base_balance,
            staked_quote_balance,
            buy_fee_total,
            sell_fee_total,
        }
    }

    /// Reads a fresh snapshot for `account`.
    ///
    /// All eight reads are issued concurrently and joined: the snapshot
    /// materializes only once every read succeeds, so a failure of any
    /// single read fails the whole tick and no partial state escapes.
    pub async fn read_from<R: ChainReader>(reader: &R, account: Address) -> Result<Self, SwapError> {
        let (
            account_base_balance,
            account_quote_balance,
            pool_base_balance,
            pool_quote_balance,
            staked_base_balance,
            staked_quote_balance,
            buy_fee_total,
            sell_fee_total,
        ) = futures::try_join!(
            reader.account_balance(true, account),
            reader.account_balance(false, account),
            reader.pool_balance(true),
            reader.pool_balance(false),
            reader.staked_balance(true, account),
            reader.staked_balance(false, account),
            reader.fee_total(true),
            reader.fee_total(false),
        )?;
        Ok(Self::new(
            account_base_balance,
            account_quote_balance,
            pool_base_balance,
            pool_quote_balance,
            staked_base_balance,
            staked_quote_balance,
            buy_fee_total,
            sell_fee_total,
        ))
    }

    /// Wallet balance of the base or quote token.
    pub fn account_balance(&self, is_base: bool) -> U256 {
        if is_base {
            self.account_base_balance
        } else {
            self.account_quote_balance
        }
    }

    /// Token balance held by the swap contract.
    pub fn pool_balance(&self, is_base: bool) -> U256 {
        if is_base {
            self.pool_base_balance
        } else {
            self.pool_quote_balance
        }
    }

    /// Balance deposited into the swap contract's internal ledger.
    pub fn staked_balance(&self, is_base: bool) -> U256 {
        if is_base {
            self.staked_base_balance
        } else {
            self.staked_quote_balance
        }
    }

    /// Accumulated incentive-fee total on the buy or sell side.
    pub fn fee_total(&self, is_buy: bool) -> U256 {
        if is_buy {
            self.buy_fee_total
        } else {
            self.sell_fee_total
        }
    }
}
