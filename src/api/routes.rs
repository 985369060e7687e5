use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_qualifying, run_contract_scan};
use super::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/contracts", post(run_contract_scan))
        .route("/contracts/current", get(get_qualifying))
        .with_state(state)
}
