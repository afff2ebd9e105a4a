//! Transaction submitters for the swap contract and the mock tokens.
//!
//! Each operation is one-shot: encode, submit from the provider's wallet,
//! wait for the receipt. There is no retry and nothing local to roll
//! back; the next balance poll reflects whatever landed on chain.

use alloy::{
    network::Ethereum,
    primitives::{Address, U256},
    providers::{PendingTransactionBuilder, Provider},
    rpc::types::TransactionReceipt,
};
use fastnum::UD256;
use tracing::{error, info};

use crate::{Market, abi, error::SwapError, oracle::HermesClient};

/// Action a user can trigger against the market.
#[derive(Clone, derive_more::Debug)]
pub enum Action {
    /// Faucet-mint `qty` tokens to `destination`.
    Mint {
        is_base: bool,
        destination: Address,
        #[debug("{qty}")]
        qty: UD256,
    },
    /// Deposit `qty` tokens into the swap contract ledger.
    Deposit {
        is_base: bool,
        #[debug("{qty}")]
        qty: UD256,
    },
    /// Withdraw `qty` tokens from the swap contract ledger.
    Withdraw {
        is_base: bool,
        #[debug("{qty}")]
        qty: UD256,
    },
    /// Trade `qty` base tokens at the current oracle rate.
    Swap {
        is_buy: bool,
        #[debug("{qty}")]
        qty: UD256,
    },
}

/// Submits state-changing transactions against the market contracts.
#[derive(Clone, Debug)]
pub struct ActionDispatcher<P> {
    market: Market,
    base: abi::erc20::ERC20::ERC20Instance<P>,
    quote: abi::erc20::ERC20::ERC20Instance<P>,
    swap: abi::swap::OracleSwap::OracleSwapInstance<P>,
    pyth: abi::pyth::IPyth::IPythInstance<P>,
    hermes: HermesClient,
}

impl<P: Provider + Clone> ActionDispatcher<P> {
    pub fn new(market: &Market, provider: P) -> Self {
        Self {
            base: abi::erc20::ERC20::new(market.base_token().address(), provider.clone()),
            quote: abi::erc20::ERC20::new(market.quote_token().address(), provider.clone()),
            swap: abi::swap::OracleSwap::new(market.swap_contract(), provider.clone()),
            pyth: abi::pyth::IPyth::new(market.pyth_contract(), provider),
            hermes: HermesClient::new(market.hermes_url().clone()),
            market: market.clone(),
        }
    }

    /// Human decimal quantity -> minor units of the selected token.
    fn minor_units(&self, is_base: bool, qty: UD256) -> U256 {
        self.market.token(is_base).converter().to_minor_units(qty)
    }

    /// Faucet-mints `qty` tokens of the selected side to `destination`
    /// (the wallet itself or, to grow the pool, the swap contract).
    pub async fn mint(
        &self,
        is_base: bool,
        destination: Address,
        qty: UD256,
    ) -> Result<TransactionReceipt, SwapError> {
        let amount = self.minor_units(is_base, qty);
        let token = if is_base { &self.base } else { &self.quote };
        let pending = token
            .mint(destination, amount)
            .send()
            .await
            .map_err(SwapError::from)?;
        confirmed(pending).await
    }

    /// Deposits `qty` tokens into the swap contract's internal ledger.
    pub async fn deposit(
        &self,
        is_base: bool,
        qty: UD256,
    ) -> Result<TransactionReceipt, SwapError> {
        let amount = self.minor_units(is_base, qty);
        let pending = self
            .swap
            .deposit(is_base, amount)
            .send()
            .await
            .map_err(SwapError::from)?;
        confirmed(pending).await
    }

    /// Withdraws `qty` tokens from the swap contract's internal ledger.
    pub async fn withdraw(
        &self,
        is_base: bool,
        qty: UD256,
    ) -> Result<TransactionReceipt, SwapError> {
        let amount = self.minor_units(is_base, qty);
        let pending = self
            .swap
            .withdraw(is_base, amount)
            .send()
            .await
            .map_err(SwapError::from)?;
        confirmed(pending).await
    }

    /// Trades `qty` base tokens at the current oracle rate.
    ///
    /// Fetches fresh price-update payloads from Hermes, reads the posting
    /// fee from the Pyth contract and attaches it as the transaction value.
    pub async fn swap(&self, is_buy: bool, qty: UD256) -> Result<TransactionReceipt, SwapError> {
        let size = self.minor_units(true, qty);
        let payloads = self
            .hermes
            .price_update_payloads(&self.market.feed_ids())
            .await?;
        let update_fee = self
            .pyth
            .getUpdateFee(payloads.clone())
            .call()
            .await
            .map_err(SwapError::from)?;
        let pending = self
            .swap
            .swap(is_buy, size, payloads)
            .value(update_fee)
            .send()
            .await
            .map_err(SwapError::from)?;
        confirmed(pending).await
    }

    /// Fire-and-forget submission: failures are logged and dropped.
    ///
    /// This mirrors the intended UI behavior: errors are observability
    /// only, there is no retry, and the absence of the expected balance
    /// change on the next poll is the user-visible signal.
    pub async fn dispatch(&self, action: Action) {
        let result = match &action {
            Action::Mint {
                is_base,
                destination,
                qty,
            } => self.mint(*is_base, *destination, *qty).await,
            Action::Deposit { is_base, qty } => self.deposit(*is_base, *qty).await,
            Action::Withdraw { is_base, qty } => self.withdraw(*is_base, *qty).await,
            Action::Swap { is_buy, qty } => self.swap(*is_buy, *qty).await,
        };
        match result {
            Ok(receipt) => info!(
                tx_hash = %receipt.transaction_hash,
                ?action,
                "action submitted"
            ),
            Err(e) => error!(%e, ?action, "action failed"),
        }
    }
}

async fn confirmed(
    pending: PendingTransactionBuilder<Ethereum>,
) -> Result<TransactionReceipt, SwapError> {
    let receipt = pending.get_receipt().await.map_err(SwapError::from)?;
    if !receipt.status() {
        return Err(SwapError::Reverted(format!(
            "transaction {} reverted",
            receipt.transaction_hash
        )));
    }
    Ok(receipt)
}
