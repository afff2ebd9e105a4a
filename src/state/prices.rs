use std::{
    collections::HashMap,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use crate::{FeedId, Market, oracle::PriceFeedUpdate};

/// Exchange rate derived from the two latest feed prices: quote units per
/// base unit. Never a source of truth, always recomputable from the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExchangeRate {
    rate: f64,
    publish_time: u64,
}

impl ExchangeRate {
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Publish time of the younger of the two prices, in unix seconds.
    pub fn publish_time(&self) -> u64 {
        self.publish_time
    }

    /// Publish time as wall-clock time.
    pub fn last_updated(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.publish_time)
    }

    /// Age of the rate relative to `now`; zero if `now` is behind.
    pub fn age(&self, now: SystemTime) -> Duration {
        now.duration_since(self.last_updated())
            .unwrap_or(Duration::ZERO)
    }
}

/// Derives the base/quote rate from the two latest prices.
///
/// Returns `None` while either price is missing, the expected transient
/// state until both subscriptions have delivered.
pub fn derive_rate(
    base: Option<&PriceFeedUpdate>,
    quote: Option<&PriceFeedUpdate>,
) -> Option<ExchangeRate> {
    let (base, quote) = (base?, quote?);
    Some(ExchangeRate {
        rate: base.value() / quote.value(),
        publish_time: base.publish_time.max(quote.publish_time),
    })
}

/// Latest price per feed, plus the derived exchange rate.
///
/// Entries are only ever inserted or replaced by incoming updates; the
/// rate is recomputed on every mutation rather than on read.
#[derive(Clone, Debug)]
pub struct PriceBoard {
    base_feed: FeedId,
    quote_feed: FeedId,
    feeds: HashMap<FeedId, PriceFeedUpdate>,
    rate: Option<ExchangeRate>,
}

impl PriceBoard {
    pub fn new(market: &Market) -> Self {
        Self {
            base_feed: market.base_token().feed_id(),
            quote_feed: market.quote_token().feed_id(),
            feeds: HashMap::new(),
            rate: None,
        }
    }

    /// Stores the update (last value per feed wins) and re-derives the
    /// exchange rate.
    pub fn apply_update(&mut self, update: PriceFeedUpdate) {
        self.feeds.insert(update.feed_id, update);
        self.rate = derive_rate(
            self.feeds.get(&self.base_feed),
            self.feeds.get(&self.quote_feed),
        );
    }

    /// Latest observed update for the given feed.
    pub fn latest(&self, feed_id: FeedId) -> Option<&PriceFeedUpdate> {
        self.feeds.get(&feed_id)
    }

    /// Currently derived exchange rate, if both prices have arrived.
    pub fn exchange_rate(&self) -> Option<ExchangeRate> {
        self.rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::PriceUpdateBuilder;

    fn board() -> PriceBoard {
        PriceBoard::new(&Market::testnet())
    }

    fn base_feed() -> FeedId {
        Market::testnet().base_token().feed_id()
    }

    fn quote_feed() -> FeedId {
        Market::testnet().quote_token().feed_id()
    }

    #[test]
    fn test_rate_requires_both_feeds() {
        let mut board = board();
        assert!(board.exchange_rate().is_none());

        board.apply_update(
            PriceUpdateBuilder::new(base_feed())
                .price(195032, -2)
                .publish_time(1000)
                .build(),
        );
        assert!(board.exchange_rate().is_none());

        board.apply_update(
            PriceUpdateBuilder::new(quote_feed())
                .price(100, -2)
                .publish_time(1002)
                .build(),
        );
        assert!(board.exchange_rate().is_some());
    }

    #[test]
    fn test_rate_is_base_over_quote_with_max_publish_time() {
        let mut board = board();
        board.apply_update(
            PriceUpdateBuilder::new(base_feed())
                .price(195032, -2)
                .publish_time(1000)
                .build(),
        );
        board.apply_update(
            PriceUpdateBuilder::new(quote_feed())
                .price(100, -2)
                .publish_time(1002)
                .build(),
        );

        let rate = board.exchange_rate().unwrap();
        assert!((rate.rate() - 1950.32).abs() < 1e-9);
        assert_eq!(rate.publish_time(), 1002);
        assert_eq!(
            rate.last_updated(),
            UNIX_EPOCH + Duration::from_secs(1002)
        );
    }

    #[test]
    fn test_last_value_per_feed_wins() {
        let mut board = board();
        board.apply_update(
            PriceUpdateBuilder::new(base_feed())
                .price(200000, -2)
                .publish_time(1000)
                .build(),
        );
        board.apply_update(
            PriceUpdateBuilder::new(quote_feed())
                .price(100, -2)
                .publish_time(1000)
                .build(),
        );
        board.apply_update(
            PriceUpdateBuilder::new(base_feed())
                .price(210000, -2)
                .publish_time(1010)
                .build(),
        );

        let rate = board.exchange_rate().unwrap();
        assert!((rate.rate() - 2100.0).abs() < 1e-9);
        assert_eq!(rate.publish_time(), 1010);
    }

    #[test]
    fn test_rate_handles_differing_exponents() {
        let mut board = board();
        board.apply_update(
            PriceUpdateBuilder::new(base_feed())
                .price(195032000000, -8)
                .publish_time(500)
                .build(),
        );
        board.apply_update(
            PriceUpdateBuilder::new(quote_feed())
                .price(99998000, -8)
                .publish_time(400)
                .build(),
        );

        let rate = board.exchange_rate().unwrap();
        assert!((rate.rate() - 1950.32 / 0.99998).abs() < 1e-6);
        assert_eq!(rate.publish_time(), 500);
    }

    #[test]
    fn test_rate_age() {
        let rate = derive_rate(
            Some(
                &PriceUpdateBuilder::new(base_feed())
                    .price(1, 0)
                    .publish_time(100)
                    .build(),
            ),
            Some(
                &PriceUpdateBuilder::new(quote_feed())
                    .price(1, 0)
                    .publish_time(90)
                    .build(),
            ),
        )
        .unwrap();
        let now = UNIX_EPOCH + Duration::from_secs(130);
        assert_eq!(rate.age(now), Duration::from_secs(30));
        assert_eq!(rate.age(UNIX_EPOCH), Duration::ZERO);
    }
}
