use anyhow::Result;
use clickhouse::Client;

use crate::db::schema::QUALIFYING_TOKENS_SQL;

pub async fn init_database(client: &Client) -> Result<()> {
    tracing::info!("Initializing database tables...");

    // Create tables if they don't exist (won't drop existing data)
    client.query(QUALIFYING_TOKENS_SQL).execute().await?;

    Ok(())
}
