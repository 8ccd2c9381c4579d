use axum::{routing::post, Router};

use crate::state::AppState;

pub mod handlers;
pub mod operations;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/graphql", post(handlers::execute))
        .route("/", post(handlers::execute))
}
