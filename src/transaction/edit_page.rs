//! Defines the route handler for the page for editing a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint, with_filters},
    filter::FilterQuery,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, link, loading_spinner},
    navigation::NavBar,
    theme::{Theme, load_theme},
    transaction::{
        Transaction, TransactionId, TransactionStore,
        form::{TransactionFormDefaults, transaction_form_fields},
    },
};

fn edit_transaction_view(
    transaction: &Transaction,
    filters: &FilterQuery,
    theme: Option<Theme>,
) -> Markup {
    let update_route = with_filters(
        &format_endpoint(endpoints::TRANSACTION, transaction.id),
        filters,
    );
    let dashboard_url = with_filters(endpoints::DASHBOARD_VIEW, filters);
    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW).into_html();
    let spinner = loading_spinner();
    let fields = transaction_form_fields(&TransactionFormDefaults::from_transaction(transaction));

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_route)
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                hx-disabled-elt="#submit-button"
                class="w-full max-w-md space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Transaction" }

                (fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Update Transaction"
                }

                p class="text-sm text-center" { (link(&dashboard_url, "Cancel")) }
            }
        }
    };

    base("Edit Transaction", theme, &[], &content)
}

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The transaction collection.
    pub transactions: Arc<Mutex<TransactionStore>>,
    /// The database connection for reading the theme.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: state.transactions.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing a transaction.
///
/// # Errors
/// Returns [Error::NotFound] if there is no transaction with the given ID.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Path(transaction_id): Path<TransactionId>,
    Query(filters): Query<FilterQuery>,
) -> Result<Response, Error> {
    let transaction = state
        .transactions
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire transaction store lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?
        .get(transaction_id)
        .cloned()
        .ok_or(Error::NotFound)?;

    let theme = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        load_theme(&connection)?
    };

    Ok(edit_transaction_view(&transaction, &filters, theme).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::{Category, TransactionType},
        db::initialize,
        filter::FilterQuery,
        test_utils::{
            assert_form_input_with_value, assert_form_select_with_value, assert_hx_endpoint,
            assert_status_ok, assert_valid_html, must_get_form, parse_html_document,
        },
        transaction::{
            Transaction, TransactionStore, UpdatePolicy,
            edit_page::{EditTransactionPageState, get_edit_transaction_page},
        },
    };

    fn get_test_state() -> EditTransactionPageState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let transaction = Transaction {
            id: 7,
            description: "Internet bill".to_owned(),
            amount: 600_000.0,
            date: date!(2024 - 01 - 05),
            type_: TransactionType::Expense,
            category: Category::Utilities,
        };

        EditTransactionPageState {
            transactions: Arc::new(Mutex::new(TransactionStore::new(
                vec![transaction],
                UpdatePolicy::default(),
            ))),
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn edit_page_prefills_form() {
        let state = get_test_state();

        let response =
            get_edit_transaction_page(State(state), Path(7), Query(FilterQuery::default()))
                .await
                .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_hx_endpoint(&form, "/api/transactions/7", "hx-put");
        assert_form_input_with_value(&form, "amount", "number", "600000.00");
        assert_form_input_with_value(&form, "date", "date", "2024-01-05");
        assert_form_input_with_value(&form, "description", "text", "Internet bill");
        assert_form_select_with_value(&form, "category", "UTILITIES");
        assert_eq!(form.value().attr("hx-disabled-elt"), Some("#submit-button"));
    }

    #[tokio::test]
    async fn unknown_transaction_is_not_found() {
        let state = get_test_state();

        let result =
            get_edit_transaction_page(State(state), Path(8), Query(FilterQuery::default())).await;

        let Err(error) = result else {
            panic!("want an error for a missing transaction");
        };
        assert_eq!(error, Error::NotFound);
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }
}
