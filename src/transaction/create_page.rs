//! Defines the route handler for the page for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    endpoints::{self, with_filters},
    filter::FilterQuery,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, link, loading_spinner},
    navigation::NavBar,
    theme::{Theme, load_theme},
    timezone::local_today,
    transaction::form::{TransactionFormDefaults, transaction_form_fields},
};

fn create_transaction_view(today: Date, filters: &FilterQuery, theme: Option<Theme>) -> Markup {
    let create_transaction_route = with_filters(endpoints::TRANSACTIONS_API, filters);
    let dashboard_url = with_filters(endpoints::DASHBOARD_VIEW, filters);
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let spinner = loading_spinner();
    let fields = transaction_form_fields(&TransactionFormDefaults::new_expense(today));

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(create_transaction_route)
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                hx-disabled-elt="#submit-button"
                class="w-full max-w-md space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Transaction" }

                (fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Create Transaction"
                }

                p class="text-sm text-center" { (link(&dashboard_url, "Cancel")) }
            }
        }
    };

    base("Create Transaction", theme, &[], &content)
}

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct CreateTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for reading the theme.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for creating a transaction.
///
/// The dashboard filters in the query string are passed along so that the
/// dashboard shows the same selection after the transaction is created.
pub async fn get_create_transaction_page(
    State(state): State<CreateTransactionPageState>,
    Query(filters): Query<FilterQuery>,
) -> Result<Response, Error> {
    let theme = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        load_theme(&connection)?
    };

    let today = local_today(&state.local_timezone)
        .inspect_err(|_| tracing::error!("Invalid timezone {}", state.local_timezone))?;

    Ok(create_transaction_view(today, &filters, theme).into_response())
}
