use std::sync::Arc;

use clickhouse::Client;

use crate::config::Config;
use crate::services::binance::BinanceClient;
use crate::services::notify::LarkNotifier;

pub type AppState = (Arc<BinanceClient>, Client, LarkNotifier, Arc<Config>);
