//! Hermes push-oracle client.
//!
//! [`HermesClient`] fetches the latest prices and the opaque update
//! payloads needed to post prices on chain with a swap transaction.
//!
//! [`stream`] turns the latest-price endpoint into a continuous stream of
//! per-feed updates: each received message is yielded at most once, and
//! the last value per feed wins. Prices arriving over the live channel
//! are accepted as-is, without a staleness check.

use std::{
    collections::{HashMap, VecDeque},
    time::Duration,
};

use alloy::primitives::Bytes;
use futures::{Stream, stream};
use url::Url;

use crate::{FeedId, error::SwapError};

/// Latest observed state of one price feed, with the price expressed as
/// `price * 10^expo`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceFeedUpdate {
    pub feed_id: FeedId,
    pub price: i64,
    pub conf: u64,
    pub expo: i32,
    pub publish_time: u64,
}

impl PriceFeedUpdate {
    /// Price normalized by its exponent.
    pub fn value(&self) -> f64 {
        self.price as f64 * 10f64.powi(self.expo)
    }
}

#[derive(Debug, serde::Deserialize)]
struct LatestPriceResponse {
    binary: BinaryData,
    parsed: Vec<ParsedPrice>,
}

#[derive(Debug, serde::Deserialize)]
struct BinaryData {
    data: Vec<String>,
}

#[derive(Debug, serde::Deserialize)]
struct ParsedPrice {
    id: String,
    price: PriceRecord,
}

/// Hermes serializes the fixed-point mantissa and confidence as strings.
#[derive(Debug, serde::Deserialize)]
struct PriceRecord {
    price: String,
    conf: String,
    expo: i32,
    publish_time: i64,
}

impl ParsedPrice {
    fn to_update(&self) -> Result<PriceFeedUpdate, SwapError> {
        let malformed = |what: &str| SwapError::OracleResponse(format!("bad {what}: {self:?}"));
        Ok(PriceFeedUpdate {
            feed_id: self.id.parse().map_err(|_| malformed("feed id"))?,
            price: self.price.price.parse().map_err(|_| malformed("price"))?,
            conf: self.price.conf.parse().map_err(|_| malformed("conf"))?,
            expo: self.price.expo,
            publish_time: u64::try_from(self.price.publish_time)
                .map_err(|_| malformed("publish time"))?,
        })
    }
}

/// Client of the Hermes price service HTTP API.
#[derive(Clone, Debug)]
pub struct HermesClient {
    endpoint: Url,
    http: reqwest::Client,
}

impl HermesClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            http: reqwest::Client::new(),
        }
    }

    /// Latest price for each of the given feeds.
    pub async fn latest_prices(
        &self,
        feed_ids: &[FeedId],
    ) -> Result<Vec<PriceFeedUpdate>, SwapError> {
        self.fetch(feed_ids)
            .await?
            .parsed
            .iter()
            .map(ParsedPrice::to_update)
            .collect()
    }

    /// Opaque price-update payloads for the given feeds, to be posted on
    /// chain along with a swap transaction.
    pub async fn price_update_payloads(
        &self,
        feed_ids: &[FeedId],
    ) -> Result<Vec<Bytes>, SwapError> {
        self.fetch(feed_ids)
            .await?
            .binary
            .data
            .iter()
            .map(|blob| {
                alloy::hex::decode(blob)
                    .map(Bytes::from)
                    .map_err(|e| SwapError::OracleResponse(format!("bad update payload: {e}")))
            })
            .collect()
    }

    async fn fetch(&self, feed_ids: &[FeedId]) -> Result<LatestPriceResponse, SwapError> {
        let url = self
            .endpoint
            .join("/v2/updates/price/latest")
            .map_err(|e| SwapError::InvalidRequest(e.to_string()))?;
        let query = feed_ids
            .iter()
            .map(|id| ("ids[]", id.to_string()))
            .collect::<Vec<_>>();
        Ok(self
            .http
            .get(url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}

/// Returns a continuous stream of price updates for the given feeds.
///
/// Polls the latest-price endpoint with the given interval and yields an
/// update only when a feed's publish time advances, so every received
/// message is delivered at most once. Transport failures are yielded as
/// errors and polling continues on the next call; reconnection/backoff
/// beyond that is the caller's concern.
pub fn stream<S, SFut>(
    client: HermesClient,
    feed_ids: Vec<FeedId>,
    poll_interval: Duration,
    sleep: S,
) -> impl Stream<Item = Result<PriceFeedUpdate, SwapError>>
where
    S: Fn(Duration) -> SFut + Copy,
    SFut: Future<Output = ()>,
{
    let published: HashMap<FeedId, u64> = HashMap::new();
    let fresh: VecDeque<PriceFeedUpdate> = VecDeque::new();
    stream::unfold(
        (client, feed_ids, published, fresh),
        move |(client, feed_ids, mut published, mut fresh)| async move {
            loop {
                if let Some(update) = fresh.pop_front() {
                    return Some((Ok(update), (client, feed_ids, published, fresh)));
                }
                sleep(poll_interval).await;
                match client.latest_prices(&feed_ids).await {
                    Ok(updates) => {
                        for update in updates {
                            let is_fresh = published
                                .get(&update.feed_id)
                                .is_none_or(|seen| *seen < update.publish_time);
                            if is_fresh {
                                published.insert(update.feed_id, update.publish_time);
                                fresh.push_back(update);
                            }
                        }
                    }
                    Err(e) => return Some((Err(e), (client, feed_ids, published, fresh))),
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use alloy::primitives::b256;

    use super::*;

    const FEED: FeedId =
        b256!("ff61491a931112ddf1bd8147cd1b641375f79f5825126d665480874634fd0ace");

    #[test]
    fn test_parse_latest_price_response() {
        let body = r#"{
            "binary": {"encoding": "hex", "data": ["504e4155"]},
            "parsed": [{
                "id": "ff61491a931112ddf1bd8147cd1b641375f79f5825126d665480874634fd0ace",
                "price": {"price": "195032000000", "conf": "61000000", "expo": -8, "publish_time": 1700000000},
                "ema_price": {"price": "195000000000", "conf": "60000000", "expo": -8, "publish_time": 1700000000}
            }]
        }"#;
        let resp: LatestPriceResponse = serde_json::from_str(body).unwrap();
        let update = resp.parsed[0].to_update().unwrap();
        assert_eq!(update.feed_id, FEED);
        assert_eq!(update.price, 195032000000);
        assert_eq!(update.conf, 61000000);
        assert_eq!(update.expo, -8);
        assert_eq!(update.publish_time, 1700000000);
        assert!((update.value() - 1950.32).abs() < 1e-9);
        assert_eq!(
            alloy::hex::decode(&resp.binary.data[0]).unwrap(),
            vec![0x50, 0x4e, 0x41, 0x55]
        );
    }

    #[test]
    fn test_parse_rejects_negative_publish_time() {
        let parsed = ParsedPrice {
            id: FEED.to_string(),
            price: PriceRecord {
                price: "1".to_string(),
                conf: "0".to_string(),
                expo: 0,
                publish_time: -1,
            },
        };
        assert!(matches!(
            parsed.to_update(),
            Err(SwapError::OracleResponse(_))
        ));
    }
}
