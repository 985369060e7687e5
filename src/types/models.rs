use serde::{Deserialize, Serialize};

/// One entry of Binance's `/fapi/v1/premiumIndex` response. Prices arrive as
/// decimal strings and stay that way until the scanner formats them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkPrice {
    pub symbol: String,
    pub mark_price: String,
    pub last_funding_rate: String,
}

/// One point of the open-interest history, oldest first within a window.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenInterestSample {
    pub symbol: String,
    pub sum_open_interest: String,
    pub sum_open_interest_value: String,
    pub timestamp: i64,
}

/// A symbol whose open-interest growth cleared the threshold, with all fields
/// already formatted for persistence and the alert message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualifyingToken {
    pub symbol: String,
    pub mark_price: String,
    pub last_funding_rate: String,
    pub contract_position_growth: String,
    pub sum_open_interest: String,
    pub sum_open_interest_value: String,
    pub timestamp: String,
}
