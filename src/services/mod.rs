pub mod binance;
pub mod notify;
pub mod scanner;
