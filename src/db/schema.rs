pub const QUALIFYING_TOKENS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS qualifying_tokens (
    symbol String,
    mark_price String,
    last_funding_rate String,
    contract_position_growth String,
    sum_open_interest String,
    sum_open_interest_value String,
    timestamp String,
    created_at DateTime('UTC') DEFAULT now('UTC'),
    PRIMARY KEY (symbol)
) ENGINE = MergeTree()
"#;
