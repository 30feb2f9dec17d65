//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}', use [format_endpoint].

use crate::filter::FilterQuery;

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The page with the summary, filters, transaction table and charts.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route to create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to switch between the light and dark theme.
pub const THEME_API: &str = "/api/theme";
/// The route to generate a report on the filtered transactions.
pub const REPORT_API: &str = "/api/report";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/transactions/{transaction_id}/edit',
/// '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

/// Append the non-empty filter values in `query` to `endpoint_path`.
///
/// Used to keep the dashboard filters when moving between pages.
pub fn with_filters(endpoint_path: &str, query: &FilterQuery) -> String {
    let keep = |value: &Option<String>| value.clone().filter(|value| !value.trim().is_empty());
    let query = FilterQuery {
        category: keep(&query.category),
        date_from: keep(&query.date_from),
        date_to: keep(&query.date_to),
    };

    if query == FilterQuery::default() {
        return endpoint_path.to_owned();
    }

    match serde_urlencoded::to_string(&query) {
        Ok(query_string) => format!("{endpoint_path}?{query_string}"),
        Err(error) => {
            tracing::error!("could not encode filters as a query string: {error}");
            endpoint_path.to_owned()
        }
    }
}
