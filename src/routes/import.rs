//! This file defines the API route for importing transactions from an
//! uploaded CSV file.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Multipart, State, multipart::Field},
};

use crate::{
    AppState, Error,
    csv::parse_csv,
    models::{CategoryTitle, DatabaseID, NewTransaction, Transaction},
    stores::{CategoryStore, TransactionStore},
};

/// A route handler for importing transactions from a multipart form holding a
/// CSV file in the `file` field.
///
/// The whole batch is validated against the running balance before any row is
/// inserted; a batch whose net value would drive the total below zero is
/// rejected with no rows persisted. On success, the inserted transactions are
/// returned in input row order.
pub async fn import_transactions<C, T>(
    State(state): State<AppState<C, T>>,
    multipart: Multipart,
) -> Result<Json<Vec<Transaction>>, Error>
where
    C: CategoryStore + Send + Sync,
    T: TransactionStore + Send + Sync,
{
    let csv_data = read_csv_file(multipart).await?;
    let rows = parse_csv(&csv_data)?;

    // Resolve each distinct category title once and reuse the mapping for
    // every row that references it.
    let mut category_ids: HashMap<CategoryTitle, DatabaseID> = HashMap::new();

    for row in &rows {
        if !category_ids.contains_key(&row.category_title) {
            let category = state
                .category_store
                .get_or_create(row.category_title.clone())?;
            category_ids.insert(row.category_title.clone(), category.id);
        }
    }

    let new_transactions = rows
        .iter()
        .map(|row| {
            NewTransaction::new(
                &row.title,
                row.value,
                row.kind,
                category_ids[&row.category_title],
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut transaction_store = state.transaction_store;
    let transactions = transaction_store.import(new_transactions)?;

    tracing::info!("imported {} transactions from CSV", transactions.len());

    Ok(Json(transactions))
}

/// Read the text of the `file` field from the multipart form.
async fn read_csv_file(mut multipart: Multipart) -> Result<String, Error> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        if field.name() == Some("file") {
            return read_field_text(field).await;
        }
    }

    Err(Error::MissingCsvFile)
}

async fn read_field_text(field: Field<'_>) -> Result<String, Error> {
    let file_name = field.file_name().map(str::to_owned);

    let data = field
        .text()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?;

    tracing::debug!(
        "received file {} that is {} bytes",
        file_name.as_deref().unwrap_or("<unnamed>"),
        data.len()
    );

    Ok(data)
}
