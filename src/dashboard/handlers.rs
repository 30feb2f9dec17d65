//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - HTML view functions for the header controls and the filter form
//! - The state used by the handler

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, PreEscaped, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::Category,
    chart_data::ChartData,
    dashboard::{
        cards::summary_cards_view,
        charts::{DashboardChart, build_dashboard_charts, charts_script, charts_view},
        tables::transactions_table,
    },
    endpoints::{self, with_filters},
    filter::{ALL_CATEGORIES, CategoryFilter, FilterQuery, Filters, filter_transactions},
    html::{
        BUTTON_SECONDARY_STYLE, ECHARTS_URL, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        HeadElement, PAGE_CONTAINER_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
    report::REPORT_MODAL_ID,
    summary::{Summary, summarize},
    theme::{Theme, load_theme},
    timezone::local_today,
    transaction::{Transaction, TransactionStore},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The transaction collection.
    pub transactions: Arc<Mutex<TransactionStore>>,
    /// The database connection for reading the theme.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: state.transactions.clone(),
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    filters: Filters,
    transactions: Vec<Transaction>,
    summary: Summary,
    charts: [DashboardChart; 2],
}

impl DashboardData {
    /// Select and aggregate the transactions for `filters`.
    ///
    /// Everything is recalculated on every request.
    fn build(all_transactions: &[Transaction], filters: Filters) -> Self {
        let transactions = filter_transactions(all_transactions, &filters);
        let summary = summarize(&transactions);
        let charts = build_dashboard_charts(&ChartData::build(&transactions));

        Self {
            filters,
            transactions,
            summary,
            charts,
        }
    }
}

/// Display a page with the summary, transactions and charts for the selected filters.
///
/// # Errors
/// Returns a 400 page if the filters in the query string are invalid.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let filters = Filters::from_query(&query, today)
        .inspect_err(|error| tracing::warn!("rejecting dashboard filters {query:?}: {error}"))?;

    let data = {
        let store = state
            .transactions
            .lock()
            .inspect_err(|error| {
                tracing::error!("could not acquire transaction store lock: {error}")
            })
            .map_err(|_| Error::DatabaseLockError)?;

        DashboardData::build(store.transactions(), filters)
    };

    let theme = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        load_theme(&connection)?
    };

    Ok(dashboard_view(&data, theme).into_response())
}

/// The add, report and theme controls above the dashboard.
fn header_view(filter_query: &FilterQuery, theme: Option<Theme>) -> Markup {
    let new_transaction_url = with_filters(endpoints::NEW_TRANSACTION_VIEW, filter_query);
    let redirect_url = with_filters(endpoints::DASHBOARD_VIEW, filter_query);
    let spinner = loading_spinner();
    let theme_label = match theme {
        Some(Theme::Dark) => "Light mode",
        _ => "Dark mode",
    };

    html! {
        div class="flex flex-wrap justify-between items-center gap-4 mb-6"
        {
            h1 class="text-2xl font-bold" { "Dashboard" }

            div class="flex flex-wrap items-center gap-3"
            {
                a
                    href=(new_transaction_url)
                    id="add-transaction"
                    class="px-4 py-2 text-sm font-medium text-white bg-blue-600 rounded hover:bg-blue-700"
                {
                    "Add transaction"
                }

                button
                    type="button"
                    id="generate-report"
                    hx-post=(endpoints::REPORT_API)
                    hx-include="#filter-form"
                    hx-target={"#" (REPORT_MODAL_ID)}
                    hx-target-error="#alert-container"
                    hx-indicator="#indicator"
                    hx-disabled-elt="this"
                    class=(BUTTON_SECONDARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (spinner) }
                    " Generate report"
                }

                form method="post" action=(endpoints::THEME_API)
                {
                    input type="hidden" name="redirect_url" value=(redirect_url);
                    input
                        type="hidden"
                        name="displayed_theme"
                        id="displayed-theme"
                        value=[theme.map(Theme::as_str)];

                    button type="submit" id="toggle-theme" class=(BUTTON_SECONDARY_STYLE)
                    {
                        (theme_label)
                    }
                }

                // Without a saved theme the page follows the browser, see `base`.
                script
                {
                    (PreEscaped(r#"
                    (function() {
                        const isDark = document.documentElement.classList.contains('dark');
                        document.getElementById('displayed-theme').value = isDark ? 'dark' : 'light';
                        document.getElementById('toggle-theme').textContent = isDark ? 'Light mode' : 'Dark mode';
                    })();
                    "#))
                }
            }
        }
    }
}

/// The form that selects the category and date range, submitted as a plain GET.
fn filter_form_view(filters: &Filters) -> Markup {
    let is_selected = |category: Category| filters.category == CategoryFilter::Only(category);

    html! {
        form
            id="filter-form"
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="w-full grid grid-cols-1 sm:grid-cols-4 gap-4 items-end mb-6 p-4 rounded-lg
                bg-white dark:bg-gray-800 shadow"
        {
            div
            {
                label for="filter-category" class=(FORM_LABEL_STYLE) { "Category" }

                select
                    name="category"
                    id="filter-category"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option
                        value=(ALL_CATEGORIES)
                        selected[filters.category == CategoryFilter::All]
                    {
                        "All categories"
                    }

                    @for category in Category::ALL {
                        option value=(category.as_str()) selected[is_selected(category)]
                        {
                            (category.label())
                        }
                    }
                }
            }

            div
            {
                label for="filter-date-from" class=(FORM_LABEL_STYLE) { "From" }

                input
                    name="date_from"
                    id="filter-date-from"
                    type="date"
                    value=(filters.date_from)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="filter-date-to" class=(FORM_LABEL_STYLE) { "To" }

                input
                    name="date_to"
                    id="filter-date-to"
                    type="date"
                    value=(filters.date_to)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Apply filters" }
        }
    }
}

fn dashboard_view(data: &DashboardData, theme: Option<Theme>) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let filter_query = data.filters.to_query();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class=(PAGE_CONTAINER_STYLE)
        {
            (header_view(&filter_query, theme))
            (summary_cards_view(&data.summary))
            (filter_form_view(&data.filters))
            (transactions_table(&data.transactions, &filter_query))
            (charts_view(&data.charts))
        }

        div id=(REPORT_MODAL_ID) {}
    );

    let head_elements = [
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        charts_script(&data.charts),
    ];

    base("Dashboard", theme, &head_elements, &content)
}
