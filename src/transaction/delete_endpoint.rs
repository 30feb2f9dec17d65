//! Defines the endpoint for deleting a transaction.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    endpoints::{self, with_filters},
    filter::FilterQuery,
    transaction::{
        TransactionId,
        create_endpoint::{TransactionState, with_store},
    },
};

/// A route handler for deleting a transaction, redirects to the dashboard so
/// the summary and charts are recalculated.
///
/// Deleting a transaction that does not exist does nothing.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Query(filters): Query<FilterQuery>,
) -> Response {
    match with_store(&state, |store, connection| {
        store.delete(transaction_id, connection)
    }) {
        Ok(true) => {}
        Ok(false) => tracing::warn!("ignoring delete for transaction {transaction_id}, it does not exist"),
        Err(error) => {
            tracing::error!("could not delete transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    }

    (
        HxRedirect(with_filters(endpoints::DASHBOARD_VIEW, &filters)),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
