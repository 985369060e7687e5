use std::sync::Arc;

use chrono::{FixedOffset, TimeZone};
use futures::stream::StreamExt;

use crate::services::binance::{BinanceClient, FetchError};
use crate::types::models::{MarkPrice, OpenInterestSample, QualifyingToken};

const FANOUT_CONCURRENCY: usize = 32;

/// Alert timestamps are rendered for the exchange's CN audience; UTC+8 has no
/// DST so a fixed offset is enough.
const DISPLAY_UTC_OFFSET_SECS: i32 = 8 * 3600;

/// Runs the full scan: one mark-price fetch, then a concurrent per-symbol
/// open-interest fan-out, then the growth filter. A failed per-symbol fetch
/// drops only that symbol; order of the result is not meaningful.
pub async fn scan(
    client: Arc<BinanceClient>,
    threshold: f64,
) -> Result<Vec<QualifyingToken>, FetchError> {
    let mark_prices = client.fetch_mark_prices().await?;
    let total = mark_prices.len();

    let qualifying: Vec<QualifyingToken> = futures::stream::iter(mark_prices.into_iter().map(
        |mark| {
            let client = client.clone();
            async move {
                match client.fetch_open_interest(&mark.symbol).await {
                    Ok(window) => qualify(&mark, &window, threshold),
                    Err(e) => {
                        tracing::debug!("excluding {}: {}", mark.symbol, e);
                        None
                    }
                }
            }
        },
    ))
    .buffer_unordered(FANOUT_CONCURRENCY)
    .collect::<Vec<Option<QualifyingToken>>>()
    .await
    .into_iter()
    .flatten()
    .collect();

    tracing::info!(
        "scan finished: {} of {} symbols met the growth threshold",
        qualifying.len(),
        total
    );
    Ok(qualifying)
}

/// Growth of the open-interest notional over the window, computed from the
/// oldest and newest samples only. None for windows shorter than two samples
/// or unparsable values.
pub fn growth_ratio(window: &[OpenInterestSample]) -> Option<f64> {
    if window.len() < 2 {
        return None;
    }
    let oldest: f64 = window.first()?.sum_open_interest_value.parse().ok()?;
    let newest: f64 = window.last()?.sum_open_interest_value.parse().ok()?;
    if oldest == 0.0 {
        return None;
    }
    Some((newest - oldest) / oldest)
}

/// Applies the threshold (boundary inclusive) and formats the survivor.
pub fn qualify(
    mark: &MarkPrice,
    window: &[OpenInterestSample],
    threshold: f64,
) -> Option<QualifyingToken> {
    let growth = growth_ratio(window)?;
    if growth < threshold {
        return None;
    }

    let newest = window.last()?;
    let mark_price: f64 = mark.mark_price.parse().ok()?;
    let funding_rate: f64 = mark.last_funding_rate.parse().ok()?;
    let sum_open_interest: f64 = newest.sum_open_interest.parse().ok()?;
    let sum_open_interest_value: f64 = newest.sum_open_interest_value.parse().ok()?;

    Some(QualifyingToken {
        symbol: mark.symbol.clone(),
        mark_price: format!("{mark_price:.4}"),
        last_funding_rate: format!("{:.4}%", funding_rate * 100.0),
        contract_position_growth: format!("{:.2}%", growth * 100.0),
        sum_open_interest: format!("{sum_open_interest:.4}"),
        sum_open_interest_value: format!("{sum_open_interest_value:.2}"),
        timestamp: to_display_time(newest.timestamp),
    })
}

/// Epoch millis to a UTC+8 wall-clock string.
pub fn to_display_time(epoch_millis: i64) -> String {
    let offset = FixedOffset::east_opt(DISPLAY_UTC_OFFSET_SECS).expect("UTC+8 is a valid offset");
    match offset.timestamp_millis_opt(epoch_millis) {
        chrono::LocalResult::Single(dt) => dt.format("%Y/%m/%d %H:%M:%S").to_string(),
        _ => epoch_millis.to_string(),
    }
}
