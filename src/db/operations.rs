use anyhow::Result;
use clickhouse::Client;

use crate::db::models::QualifyingTokenRecord;
use crate::types::models::QualifyingToken;

/// Full replace: the table only ever holds the latest run's qualifiers, so
/// every successful scan truncates before inserting.
pub async fn replace_qualifying_tokens(client: &Client, tokens: &[QualifyingToken]) -> Result<()> {
    client
        .query("TRUNCATE TABLE qualifying_tokens")
        .execute()
        .await?;

    for token in tokens {
        client
            .query(
                "INSERT INTO qualifying_tokens (
                    symbol,
                    mark_price,
                    last_funding_rate,
                    contract_position_growth,
                    sum_open_interest,
                    sum_open_interest_value,
                    timestamp
                ) VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(token.symbol.as_str())
            .bind(token.mark_price.as_str())
            .bind(token.last_funding_rate.as_str())
            .bind(token.contract_position_growth.as_str())
            .bind(token.sum_open_interest.as_str())
            .bind(token.sum_open_interest_value.as_str())
            .bind(token.timestamp.as_str())
            .execute()
            .await?;
    }

    tracing::info!("stored {} qualifying tokens", tokens.len());
    Ok(())
}

pub async fn get_qualifying_tokens(client: &Client) -> Result<Vec<QualifyingTokenRecord>> {
    let query = "
        SELECT
            symbol,
            mark_price,
            last_funding_rate,
            contract_position_growth,
            sum_open_interest,
            sum_open_interest_value,
            timestamp,
            created_at
        FROM qualifying_tokens
        ORDER BY symbol
    ";

    let mut cursor = client.query(query).fetch::<QualifyingTokenRecord>()?;
    let mut results = Vec::new();

    while let Some(row) = cursor.next().await? {
        results.push(row);
    }

    Ok(results)
}
