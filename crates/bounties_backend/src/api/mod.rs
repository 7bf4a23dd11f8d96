pub mod bounty;
pub mod events;
pub mod ledger;

use axum::{routing::get, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(events::list))
        .route("/board", get(events::board))
        .route("/ledger/:identity", get(ledger::balance))
        .nest("/bounty", bounty::router())
}

async fn health() -> &'static str {
    "health!"
}
