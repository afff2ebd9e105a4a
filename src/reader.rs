//! Read-only balance and fee queries against the token and swap
//! contracts.
//!
//! Reads are plain request/response `eth_call`s and are not retried here:
//! the fixed-interval balance poll provides the implicit retry.

use alloy::{
    primitives::{Address, U256},
    providers::Provider,
};

use crate::{Market, abi, error::SwapError};

/// The set of reads one poll tick is built from. The trait seam lets the
/// poller be exercised without a live node.
pub trait ChainReader {
    /// Wallet balance of the base or quote token held by `account`.
    fn account_balance(
        &self,
        is_base: bool,
        account: Address,
    ) -> impl Future<Output = Result<U256, SwapError>>;

    /// Token balance held by the swap contract itself.
    fn pool_balance(&self, is_base: bool) -> impl Future<Output = Result<U256, SwapError>>;

    /// Balance `account` has deposited into the swap contract's internal
    /// ledger, on the selected side.
    fn staked_balance(
        &self,
        is_base: bool,
        account: Address,
    ) -> impl Future<Output = Result<U256, SwapError>>;

    /// Accumulated incentive-fee total on the buy or sell side.
    fn fee_total(&self, is_buy: bool) -> impl Future<Output = Result<U256, SwapError>>;
}

/// [`ChainReader`] backed by contract instances on an RPC provider.
#[derive(Clone, Debug)]
pub struct BalanceReader<P> {
    base: abi::erc20::ERC20::ERC20Instance<P>,
    quote: abi::erc20::ERC20::ERC20Instance<P>,
    swap: abi::swap::OracleSwap::OracleSwapInstance<P>,
}

impl<P: Provider + Clone> BalanceReader<P> {
    pub fn new(market: &Market, provider: P) -> Self {
        Self {
            base: abi::erc20::ERC20::new(market.base_token().address(), provider.clone()),
            quote: abi::erc20::ERC20::new(market.quote_token().address(), provider.clone()),
            swap: abi::swap::OracleSwap::new(market.swap_contract(), provider),
        }
    }

    fn token(&self, is_base: bool) -> &abi::erc20::ERC20::ERC20Instance<P> {
        if is_base { &self.base } else { &self.quote }
    }
}

impl<P: Provider + Clone> ChainReader for BalanceReader<P> {
    async fn account_balance(&self, is_base: bool, account: Address) -> Result<U256, SwapError> {
        self.token(is_base)
            .balanceOf(account)
            .call()
            .await
            .map_err(SwapError::from)
    }

    async fn pool_balance(&self, is_base: bool) -> Result<U256, SwapError> {
        self.token(is_base)
            .balanceOf(*self.swap.address())
            .call()
            .await
            .map_err(SwapError::from)
    }

    async fn staked_balance(&self, is_base: bool, account: Address) -> Result<U256, SwapError> {
        self.swap
            .balanceOf(is_base, account)
            .call()
            .await
            .map_err(SwapError::from)
    }

    async fn fee_total(&self, is_buy: bool) -> Result<U256, SwapError> {
        if is_buy {
            self.swap.buyFee().call().await.map_err(SwapError::from)
        } else {
            self.swap.sellFee().call().await.map_err(SwapError::from)
        }
    }
}
