//! This module defines the REST API's routes and their handlers.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde_json::json;

use crate::{
    AppState,
    stores::{CategoryStore, TransactionStore},
};

pub mod endpoints;
mod import;
mod transaction;

use import::import_transactions;
use transaction::{create_transaction, delete_transaction, get_transactions};

/// Return a router with all the app's routes.
pub fn build_router<C, T>(state: AppState<C, T>) -> Router
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    T: TransactionStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions).post(create_transaction),
        )
        .route(endpoints::IMPORT, post(import_transactions))
        .route(endpoints::TRANSACTION, delete(delete_transaction))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The JSON response for requests to routes that do not exist.
async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "status": "error", "message": "route not found" })),
    )
        .into_response()
}
