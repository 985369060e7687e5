pub mod init;
pub mod models;
pub mod operations;
pub mod schema;
