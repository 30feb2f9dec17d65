//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, with_filters},
    filter::FilterQuery,
    transaction::{TransactionStore, form::TransactionForm},
};

/// The state needed to create, update or delete a transaction.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The transaction collection.
    pub transactions: Arc<Mutex<TransactionStore>>,
    /// The database connection the collection is saved to.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: state.transactions.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Run `operation` with the transaction store and the database connection.
///
/// The store is always locked before the connection.
pub(super) fn with_store<T>(
    state: &TransactionState,
    operation: impl FnOnce(&mut TransactionStore, &Connection) -> Result<T, Error>,
) -> Result<T, Error> {
    let mut store = state
        .transactions
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire transaction store lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    operation(&mut store, &connection)
}

/// A route handler for creating a new transaction, redirects to the dashboard on success.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Query(filters): Query<FilterQuery>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let result = form
        .into_new_transaction()
        .and_then(|new| with_store(&state, |store, connection| store.create(new, connection)));

    if let Err(error) = result {
        tracing::error!("could not create transaction: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(with_filters(endpoints::DASHBOARD_VIEW, &filters)),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
