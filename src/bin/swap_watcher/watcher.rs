//! Watch loop: balance polling, price subscription and display clock.
//!
//! One cooperative task drives three sources through `tokio::select!`:
//! the fixed-interval balance poll, the oracle price stream and a faster
//! display tick that reports the current rate and its age. Dropping the
//! watcher tears all three down.

use std::{
    pin::pin,
    time::{Duration, SystemTime},
};

use alloy::{primitives::Address, providers::DynProvider};
use fastnum::UD256;
use futures::StreamExt;
use oracle_swap_sdk::{
    Market,
    oracle::{self, HermesClient},
    reader::BalanceReader,
    state::{ChainState, Session},
};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Interval between Hermes latest-price polls.
const PRICE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Interval between rate display lines.
const DISPLAY_TICK: Duration = Duration::from_secs(1);

/// Balance and exchange-rate watcher for one wallet on one market.
#[derive(Debug)]
pub struct Watcher {
    session: Session,
    reader: BalanceReader<DynProvider>,
    hermes: HermesClient,
    poll_interval: Duration,
}

impl Watcher {
    pub fn new(
        market: Market,
        provider: DynProvider,
        account: Address,
        poll_interval: Duration,
    ) -> Self {
        let reader = BalanceReader::new(&market, provider);
        let hermes = HermesClient::new(market.hermes_url().clone());
        let mut session = Session::new(market);
        session.connect(account);
        Self {
            session,
            reader,
            hermes,
            poll_interval,
        }
    }

    /// Run the watch loop until the price stream ends.
    pub async fn run(&mut self) -> Result<()> {
        let feed_ids = self.session.market().feed_ids().to_vec();
        let mut price_stream = pin!(oracle::stream(
            self.hermes.clone(),
            feed_ids,
            PRICE_POLL_INTERVAL,
            tokio::time::sleep,
        ));

        let mut poll = tokio::time::interval(self.poll_interval);
        let mut clock = tokio::time::interval(DISPLAY_TICK);

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    match self.session.refresh(&self.reader).await {
                        Ok(()) => self.log_balances(),
                        Err(e) => warn!(%e, "Balance poll failed, keeping previous snapshot"),
                    }
                }
                update = price_stream.next() => {
                    let Some(update) = update else {
                        return Err(Error::PriceStreamClosed);
                    };
                    match update {
                        Ok(update) => {
                            debug!(
                                feed_id = %update.feed_id,
                                price = update.value(),
                                publish_time = update.publish_time,
                                "Price update"
                            );
                            self.session.apply_price_update(update);
                        }
                        Err(e) => warn!(%e, "Price poll failed"),
                    }
                }
                _ = clock.tick() => self.log_rate(),
            }
        }
    }

    fn log_balances(&self) {
        let Some(state) = self.session.chain_state() else {
            return;
        };
        let market = self.session.market();
        let base = market.base_token().converter();
        let quote = market.quote_token().converter();
        let (buy_fees, sell_fees) = fee_totals(market, state);
        info!(
            base = market.base_token().name(),
            quote = market.quote_token().name(),
            wallet_base = %base.to_decimal::<4>(state.account_balance(true)),
            wallet_quote = %quote.to_decimal::<4>(state.account_balance(false)),
            pool_base = %base.to_decimal::<4>(state.pool_balance(true)),
            pool_quote = %quote.to_decimal::<4>(state.pool_balance(false)),
            staked_base = %base.to_decimal::<4>(state.staked_balance(true)),
            staked_quote = %quote.to_decimal::<4>(state.staked_balance(false)),
            %buy_fees,
            %sell_fees,
            "Balances"
        );
    }

    fn log_rate(&self) {
        match self.session.exchange_rate() {
            Some(rate) => info!(
                rate = rate.rate(),
                age_secs = rate.age(SystemTime::now()).as_secs(),
                "Exchange rate"
            ),
            None => debug!("Exchange rate not yet available"),
        }
    }
}

/// Incentive-fee totals for display. The contract accumulates both fee
/// pools in the quote token, so both sides scale by the quote decimals.
fn fee_totals(market: &Market, state: &ChainState) -> (UD256, UD256) {
    let quote = market.quote_token().converter();
    (
        quote.to_decimal::<4>(state.fee_total(true)),
        quote.to_decimal::<4>(state.fee_total(false)),
    )
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{U256, address, b256};
    use fastnum::udec256;
    use oracle_swap_sdk::{TokenConfig, testing::ChainStateBuilder};
    use url::Url;

    use super::*;

    #[test]
    fn test_fee_totals_use_quote_decimals_on_both_sides() {
        // Base and quote precision differ, so a base-scaled buy figure
        // would be off by twelve orders of magnitude
        let market = Market::custom(
            TokenConfig::new(
                "BASE",
                address!("0x0000000000000000000000000000000000000001"),
                b256!("0101010101010101010101010101010101010101010101010101010101010101"),
                18,
            ),
            TokenConfig::new(
                "QUOTE",
                address!("0x0000000000000000000000000000000000000002"),
                b256!("0202020202020202020202020202020202020202020202020202020202020202"),
                6,
            ),
            address!("0x0000000000000000000000000000000000000003"),
            address!("0x0000000000000000000000000000000000000004"),
            Url::parse("https://hermes.pyth.network").unwrap(),
        );
        let state = ChainStateBuilder::new()
            .fee_total(true, U256::from(1_500_000u64))
            .fee_total(false, U256::from(2_250_000u64))
            .build();

        let (buy_fees, sell_fees) = fee_totals(&market, &state);
        assert_eq!(buy_fees, udec256!(1.5));
        assert_eq!(sell_fees, udec256!(2.25));
    }
}
