use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::types::models::{MarkPrice, OpenInterestSample};

/// How long a fetched payload stays valid before the next call goes back to
/// the network. Keeps rapid repeated invocations from hammering the exchange.
const CACHE_VALIDITY: Duration = Duration::from_secs(10);

/// Failure modes of the two read endpoints. Display strings are the bodies
/// callers of the scan endpoint see, so they stay stable.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Fetch Binance Mark Price Failed")]
    MarkPriceRequest(#[source] reqwest::Error),
    #[error("Invalid symbol")]
    InvalidMarkPricePayload,
    #[error("Fetch Binance Open Interest Statistics Failed")]
    OpenInterestRequest(#[source] reqwest::Error),
    #[error("Not Found the symbol")]
    SymbolNotFound,
    #[error("Symbol Is Necessary")]
    SymbolMissing,
    #[error("Invalid open interest payload")]
    InvalidOpenInterestPayload(#[source] serde_json::Error),
}

pub struct BinanceClient {
    http: Client,
    base: String,
    window_limit: u32,
    mark_cache: Mutex<Option<(Instant, Vec<MarkPrice>)>>,
    oi_cache: Mutex<HashMap<String, (Instant, Vec<OpenInterestSample>)>>,
}

impl BinanceClient {
    pub fn new(window_limit: u32) -> Self {
        Self {
            http: Client::new(),
            base: std::env::var("BINANCE_FAPI_BASE")
                .unwrap_or_else(|_| "https://fapi.binance.com".to_string()),
            window_limit,
            mark_cache: Mutex::new(None),
            oi_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Mark price and funding rate for every listed perpetual symbol.
    pub async fn fetch_mark_prices(&self) -> Result<Vec<MarkPrice>, FetchError> {
        if let Some(cached) = self.cached_mark_prices() {
            tracing::debug!("serving mark prices from cache");
            return Ok(cached);
        }

        let url = format!("{}/fapi/v1/premiumIndex", self.base);
        let payload: Value = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(FetchError::MarkPriceRequest)?
            .json()
            .await
            .map_err(FetchError::MarkPriceRequest)?;

        let prices = parse_mark_price_payload(payload)?;
        self.store_mark_prices(&prices);
        tracing::info!("fetched mark prices for {} symbols", prices.len());
        Ok(prices)
    }

    /// Open-interest history for one symbol: 5-minute interval, oldest first,
    /// `window_limit` points (289 ≈ 24h).
    pub async fn fetch_open_interest(
        &self,
        symbol: &str,
    ) -> Result<Vec<OpenInterestSample>, FetchError> {
        if let Some(cached) = self.cached_open_interest(symbol) {
            return Ok(cached);
        }

        let url = format!(
            "{}/futures/data/openInterestHist?symbol={}&period=5m&limit={}",
            self.base, symbol, self.window_limit
        );
        let payload: Value = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(FetchError::OpenInterestRequest)?
            .json()
            .await
            .map_err(FetchError::OpenInterestRequest)?;

        let window = parse_open_interest_payload(payload)?;
        self.store_open_interest(symbol, &window);
        Ok(window)
    }

    fn cached_mark_prices(&self) -> Option<Vec<MarkPrice>> {
        let guard = self.mark_cache.lock().ok()?;
        guard
            .as_ref()
            .filter(|(fetched_at, _)| fetched_at.elapsed() < CACHE_VALIDITY)
            .map(|(_, prices)| prices.clone())
    }

    fn store_mark_prices(&self, prices: &[MarkPrice]) {
        if let Ok(mut guard) = self.mark_cache.lock() {
            *guard = Some((Instant::now(), prices.to_vec()));
        }
    }

    fn cached_open_interest(&self, symbol: &str) -> Option<Vec<OpenInterestSample>> {
        let guard = self.oi_cache.lock().ok()?;
        guard
            .get(symbol)
            .filter(|(fetched_at, _)| fetched_at.elapsed() < CACHE_VALIDITY)
            .map(|(_, window)| window.clone())
    }

    fn store_open_interest(&self, symbol: &str, window: &[OpenInterestSample]) {
        if let Ok(mut guard) = self.oi_cache.lock() {
            guard.insert(symbol.to_string(), (Instant::now(), window.to_vec()));
        }
    }
}

/// The endpoint answers with either a symbol list or an `{code, msg}` error
/// object; an empty list is treated the same as an error object.
fn parse_mark_price_payload(payload: Value) -> Result<Vec<MarkPrice>, FetchError> {
    if payload.get("msg").is_some() {
        return Err(FetchError::InvalidMarkPricePayload);
    }
    let prices: Vec<MarkPrice> =
        serde_json::from_value(payload).map_err(|_| FetchError::InvalidMarkPricePayload)?;
    if prices.is_empty() {
        return Err(FetchError::InvalidMarkPricePayload);
    }
    Ok(prices)
}

/// A non-array payload means the symbol parameter was rejected; an empty
/// array means the symbol is unknown to the statistics endpoint.
fn parse_open_interest_payload(payload: Value) -> Result<Vec<OpenInterestSample>, FetchError> {
    match payload {
        Value::Array(items) if items.is_empty() => Err(FetchError::SymbolNotFound),
        items @ Value::Array(_) => {
            serde_json::from_value(items).map_err(FetchError::InvalidOpenInterestPayload)
        }
        _ => Err(FetchError::SymbolMissing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mark_price_payload_parses_symbol_list() {
        let payload = json!([
            {"symbol": "BTCUSDT", "markPrice": "50000.12", "lastFundingRate": "0.0001", "time": 1},
            {"symbol": "ETHUSDT", "markPrice": "3000.55", "lastFundingRate": "-0.0002", "time": 1}
        ]);
        let prices = parse_mark_price_payload(payload).unwrap();
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].symbol, "BTCUSDT");
        assert_eq!(prices[1].last_funding_rate, "-0.0002");
    }

    #[test]
    fn mark_price_error_object_is_rejected() {
        let payload = json!({"code": -1121, "msg": "Invalid symbol."});
        let err = parse_mark_price_payload(payload).unwrap_err();
        assert!(matches!(err, FetchError::InvalidMarkPricePayload));
        assert_eq!(err.to_string(), "Invalid symbol");
    }

    #[test]
    fn empty_mark_price_list_is_rejected() {
        let err = parse_mark_price_payload(json!([])).unwrap_err();
        assert!(matches!(err, FetchError::InvalidMarkPricePayload));
    }

    #[test]
    fn open_interest_array_parses_in_order() {
        let payload = json!([
            {"symbol": "BTCUSDT", "sumOpenInterest": "1.5", "sumOpenInterestValue": "1000", "timestamp": 1000},
            {"symbol": "BTCUSDT", "sumOpenInterest": "2.5", "sumOpenInterestValue": "1500", "timestamp": 2000}
        ]);
        let window = parse_open_interest_payload(payload).unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].sum_open_interest_value, "1000");
        assert_eq!(window[1].timestamp, 2000);
    }

    #[test]
    fn empty_open_interest_array_means_unknown_symbol() {
        let err = parse_open_interest_payload(json!([])).unwrap_err();
        assert!(matches!(err, FetchError::SymbolNotFound));
        assert_eq!(err.to_string(), "Not Found the symbol");
    }

    #[test]
    fn non_array_open_interest_means_missing_symbol_param() {
        let payload = json!({"code": -1102, "msg": "Mandatory parameter 'symbol' was not sent."});
        let err = parse_open_interest_payload(payload).unwrap_err();
        assert!(matches!(err, FetchError::SymbolMissing));
        assert_eq!(err.to_string(), "Symbol Is Necessary");
    }
}
