//! The route handler that generates a report for the current filters.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};

use crate::{
    AppState, Error,
    filter::{FilterQuery, Filters, filter_transactions},
    html::BUTTON_SECONDARY_STYLE,
    report::{ReportGenerator, ReportTracker, generate_report},
    timezone::local_today,
    transaction::TransactionStore,
};

/// The id of the element the report modal is swapped into.
pub const REPORT_MODAL_ID: &str = "report-modal";

/// The state needed to generate a report.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The transactions to report on.
    pub transactions: Arc<Mutex<TransactionStore>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The text generation service.
    pub report_generator: Arc<dyn ReportGenerator>,
    /// The state of the current report request.
    pub report_tracker: Arc<Mutex<ReportTracker>>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: state.transactions.clone(),
            local_timezone: state.local_timezone.clone(),
            report_generator: state.report_generator.clone(),
            report_tracker: state.report_tracker.clone(),
        }
    }
}

/// A route handler that generates a report on the transactions selected by
/// the filters in the form, responds with a modal containing the report.
pub async fn generate_report_endpoint(
    State(state): State<ReportState>,
    Form(query): Form<FilterQuery>,
) -> Response {
    let filters = match local_today(&state.local_timezone)
        .and_then(|today| Filters::from_query(&query, today))
    {
        Ok(filters) => filters,
        Err(error) => return error.into_alert_response(),
    };

    let selected = {
        let store = match state.transactions.lock() {
            Ok(store) => store,
            Err(error) => {
                tracing::error!("could not acquire transaction store lock: {error}");
                return Error::DatabaseLockError.into_alert_response();
            }
        };

        filter_transactions(store.transactions(), &filters)
    };

    match generate_report(
        state.report_generator.as_ref(),
        &state.report_tracker,
        &selected,
    )
    .await
    {
        Ok(report) => report_modal(&report).into_response(),
        Err(error) => {
            tracing::error!("could not generate report: {error}");
            error.into_alert_response()
        }
    }
}

const COPY_SCRIPT: &str = "const button = this;
    navigator.clipboard.writeText(document.getElementById('report-text').innerText)
        .then(() => { button.textContent = 'Copied!'; }, () => { button.textContent = 'Copy failed'; })
        .finally(() => setTimeout(() => { button.textContent = 'Copy'; }, 2000));";

fn report_modal(report: &str) -> Markup {
    let close_script = format!("document.getElementById('{REPORT_MODAL_ID}').replaceChildren()");

    html! {
        div
            class="fixed inset-0 z-50 flex items-center justify-center bg-black/50 p-4"
            role="dialog"
            aria-modal="true"
            aria-labelledby="report-title"
        {
            div class="w-full max-w-2xl rounded-lg bg-white p-6 shadow-xl dark:bg-gray-800 text-gray-900 dark:text-white"
            {
                h2 id="report-title" class="text-xl font-bold mb-4" { "Financial Report" }

                div
                    id="report-text"
                    class="max-h-[60vh] overflow-y-auto rounded-lg bg-gray-50 p-4 dark:bg-gray-700/50"
                    style="white-space: pre-wrap; line-height: 1.75;"
                {
                    (report)
                }

                div class="flex flex-col sm:flex-row justify-between items-center pt-4 gap-4"
                {
                    span class="text-sm text-blue-600 dark:text-blue-400"
                    {
                        "Generated by Gemini"
                    }

                    div class="flex gap-3"
                    {
                        button
                            type="button"
                            id="copy-report"
                            class=(BUTTON_SECONDARY_STYLE)
                            onclick=(COPY_SCRIPT)
                        {
                            "Copy"
                        }

                        button
                            type="button"
                            id="close-report"
                            class="px-4 py-2 text-sm font-medium text-white bg-blue-600 rounded hover:bg-blue-700"
                            onclick=(close_script)
                        {
                            "Close"
                        }
                    }
                }
            }
        }
    }
}
