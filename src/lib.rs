//! Cashbook is a small personal finance ledger served over a JSON REST API.
//!
//! It records income and outcome transactions grouped by category, computes
//! the running balance on demand, and supports bulk import of transactions
//! from CSV files. Transactions that would drive the running balance below
//! zero are rejected.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod csv;
mod db;
mod models;
mod routes;
mod stores;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use routes::{build_router, endpoints};
pub use stores::sqlite::{SqlAppState, create_app_state};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// Accepting the transaction (or batch of transactions) would drive the
    /// running balance below zero.
    #[error("cannot complete transaction, funds below zero")]
    InsufficientFunds,

    /// An empty string was used as a transaction title.
    #[error("transaction title cannot be empty")]
    EmptyTitle,

    /// An empty string was used as a category title.
    #[error("category title cannot be empty")]
    EmptyCategoryTitle,

    /// A negative value was used to create a transaction.
    ///
    /// Transaction values record an unsigned amount of money; the direction
    /// is carried by the transaction type.
    #[error("transaction value must not be negative, got {0}")]
    NegativeValue(f64),

    /// A value that is not a finite number (NaN or infinity) was used to
    /// create a transaction.
    #[error("transaction value must be a finite number, got {0}")]
    NonFiniteValue(f64),

    /// A string other than "income" or "outcome" was used as a transaction type.
    #[error("\"{0}\" is not a valid transaction type, expected \"income\" or \"outcome\"")]
    InvalidKind(String),

    /// The category ID used to create a transaction did not match a valid
    /// category.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory,

    /// The multipart form could not be parsed as an uploaded CSV file.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// The multipart form did not contain a `file` field holding a CSV file.
    #[error("the multipart form did not contain a CSV file field named \"file\"")]
    MissingCsvFile,

    /// The CSV had issues that prevented it from being parsed.
    #[error("could not parse the CSV file: {0}")]
    InvalidCsv(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InsufficientFunds => StatusCode::BAD_REQUEST,
            Error::EmptyTitle
            | Error::EmptyCategoryTitle
            | Error::NegativeValue(_)
            | Error::NonFiniteValue(_)
            | Error::InvalidKind(_)
            | Error::InvalidCategory => StatusCode::UNPROCESSABLE_ENTITY,
            Error::MultipartError(_) | Error::MissingCsvFile | Error::InvalidCsv(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // The SQL error detail is for the server logs, not the client.
        let message = match self {
            Error::SqlError(error) => {
                tracing::error!("an unexpected error occurred: {}", error);
                "internal server error".to_owned()
            }
            error => error.to_string(),
        };

        (status, Json(json!({ "status": "error", "message": message }))).into_response()
    }
}
