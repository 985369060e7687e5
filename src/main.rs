use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clickhouse::Client;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::time::{sleep, Duration};

use contract_monitor::api::routes::create_router;
use contract_monitor::config::Config;
use contract_monitor::db::init::init_database;
use contract_monitor::services::binance::BinanceClient;
use contract_monitor::services::notify::LarkNotifier;

async fn connect_to_clickhouse(url: &str, max_retries: u32) -> Result<Client> {
    let client = Client::default().with_url(url).with_database("default");

    for attempt in 1..=max_retries {
        match client.query("SELECT 1").execute().await {
            Ok(_) => {
                tracing::info!("Connected to ClickHouse at {}", url);
                return Ok(client);
            }
            Err(e) => {
                if attempt == max_retries {
                    return Err(anyhow::anyhow!(
                        "Failed to connect to ClickHouse after {} attempts: {}",
                        max_retries,
                        e
                    ));
                }
                tracing::warn!(
                    "Failed to connect to ClickHouse (attempt {}/{}): {}",
                    attempt,
                    max_retries,
                    e
                );
                sleep(Duration::from_secs(2)).await;
            }
        }
    }
    unreachable!()
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    // Connect to ClickHouse with retries
    let db = connect_to_clickhouse(&config.clickhouse_url, 5).await?;

    // Initialize database tables
    init_database(&db).await?;

    let binance = Arc::new(BinanceClient::new(config.window_limit));
    let notifier = LarkNotifier::new(config.webhook_url.clone());

    let state = (binance, db, notifier, config);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8000));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
