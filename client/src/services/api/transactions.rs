//! # Transaction Endpoints

use super::client::ApiClient;
use super::request::ApiRequest;
use crate::core::error::ApiError;
use lib_utils::DateRange;
use shared::{SyncResponse, Transaction};

/// Transactions, optionally restricted to a date range.
#[tracing::instrument(skip(client))]
pub async fn list(client: &ApiClient, range: Option<&DateRange>) -> Result<Vec<Transaction>, ApiError> {
    let request = ApiRequest::get("/transactions")
        .query_opt("startDate", range.map(DateRange::start_param))
        .query_opt("endDate", range.map(DateRange::end_param));
    let transactions: Vec<Transaction> = client.fetch(request).await?;
    tracing::debug!(count = transactions.len(), "Transactions fetched");
    Ok(transactions)
}

/// Pull new transactions from the linked bank accounts.
#[tracing::instrument(skip(client))]
pub async fn sync(client: &ApiClient) -> Result<SyncResponse, ApiError> {
    let result: SyncResponse = client.fetch(ApiRequest::post("/transactions/sync")).await?;
    tracing::info!(
        added = result.added,
        modified = result.modified,
        removed = result.removed,
        "Bank sync complete"
    );
    Ok(result)
}
