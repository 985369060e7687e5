use clickhouse::Row;
use time::OffsetDateTime;

#[derive(Debug, Row, serde::Serialize, serde::Deserialize)]
pub struct QualifyingTokenRecord {
    pub symbol: String,
    pub mark_price: String,
    pub last_funding_rate: String,
    pub contract_position_growth: String,
    pub sum_open_interest: String,
    pub sum_open_interest_value: String,
    pub timestamp: String,
    #[serde(with = "clickhouse::serde::time::datetime")]
    pub created_at: OffsetDateTime,
}
