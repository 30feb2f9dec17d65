//! Defines the endpoint for updating a transaction.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    endpoints::{self, with_filters},
    filter::FilterQuery,
    transaction::{
        TransactionId,
        create_endpoint::{TransactionState, with_store},
        form::TransactionForm,
    },
};

/// A route handler for updating a transaction, redirects to the dashboard on success.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Query(filters): Query<FilterQuery>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let result = form.into_new_transaction().and_then(|new| {
        with_store(&state, |store, connection| {
            store.update(transaction_id, new, connection)
        })
    });

    if let Err(error) = result {
        tracing::error!("could not update transaction {transaction_id}: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(with_filters(endpoints::DASHBOARD_VIEW, &filters)),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        category::{Category, TransactionType},
        db::initialize,
        filter::FilterQuery,
        test_utils::assert_hx_redirect,
        transaction::{
            Transaction, TransactionStore, UpdatePolicy, create_endpoint::TransactionState,
            edit_endpoint::edit_transaction_endpoint, form::TransactionForm,
        },
    };

    fn get_test_state(update_policy: UpdatePolicy) -> TransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let transaction = Transaction {
            id: 1,
            description: "test".to_owned(),
            amount: 1.23,
            date: date!(2025 - 10 - 27),
            type_: TransactionType::Expense,
            category: Category::Food,
        };

        TransactionState {
            transactions: Arc::new(Mutex::new(TransactionStore::new(
                vec![transaction],
                update_policy,
            ))),
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    fn salary_form() -> TransactionForm {
        TransactionForm {
            type_: TransactionType::Income,
            amount: Some(3.21),
            date: date!(2025 - 10 - 28),
            description: "foo".to_owned(),
            category: Category::Salary,
        }
    }

    #[tokio::test]
    async fn can_update_transaction() {
        let state = get_test_state(UpdatePolicy::Ignore);
        let want_transaction = Transaction {
            id: 1,
            description: "foo".to_owned(),
            amount: 3.21,
            date: date!(2025 - 10 - 28),
            type_: TransactionType::Income,
            category: Category::Salary,
        };
        let filters = FilterQuery {
            category: Some("all".to_owned()),
            date_from: None,
            date_to: None,
        };

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path(1),
            Query(filters),
            Form(salary_form()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/dashboard?category=all");
        let store = state.transactions.lock().unwrap();
        assert_eq!(store.get(1), Some(&want_transaction));
    }

    #[tokio::test]
    async fn invalid_update_leaves_transaction_unchanged() {
        let state = get_test_state(UpdatePolicy::Ignore);
        let before = state.transactions.lock().unwrap().get(1).cloned();

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path(1),
            Query(FilterQuery::default()),
            Form(TransactionForm {
                type_: TransactionType::Expense,
                ..salary_form()
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.transactions.lock().unwrap().get(1).cloned(), before);
    }

    #[tokio::test]
    async fn missing_transaction_is_ignored_by_default() {
        let state = get_test_state(UpdatePolicy::Ignore);

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path(99),
            Query(FilterQuery::default()),
            Form(salary_form()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(state.transactions.lock().unwrap().transactions().len(), 1);
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found_when_rejected() {
        let state = get_test_state(UpdatePolicy::Reject);

        let response = edit_transaction_endpoint(
            State(state),
            Path(99),
            Query(FilterQuery::default()),
            Form(salary_form()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
