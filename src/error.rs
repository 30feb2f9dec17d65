//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use time::Date;

use crate::{
    alert::Alert,
    category::{Category, TransactionType},
    html::error_view,
    internal_server_error::InternalServerError,
    not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The transaction description was empty or only whitespace.
    #[error("the description cannot be empty")]
    EmptyDescription,

    /// The transaction form did not include an amount.
    #[error("the amount is missing")]
    MissingAmount,

    /// The amount was zero, negative or not a finite number.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    InvalidAmount(f64),

    /// The category does not belong to the transaction type, e.g. an
    /// expense filed under salary.
    #[error("{category} is not a valid category for {type_:?} transactions")]
    CategoryTypeMismatch {
        /// The category that was chosen.
        category: Category,
        /// The type of the transaction.
        type_: TransactionType,
    },

    /// The string does not name a category.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// A filter date was not a valid `YYYY-MM-DD` date.
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    InvalidFilterDate(String),

    /// The start of the filter date range is after the end.
    #[error("the date range starting {from} and ending {to} is empty")]
    InvertedDateRange {
        /// The first day of the range.
        from: Date,
        /// The last day of the range.
        to: Date,
    },

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that does not exist")]
    UpdateMissingTransaction,

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A report was requested for a selection without any transactions.
    #[error("cannot generate a report without any transactions")]
    EmptyReport,

    /// A report was requested while another one is still being generated.
    #[error("a report is already being generated")]
    ReportInProgress,

    /// The text generation service could not produce a report.
    #[error("could not generate the report: {0}")]
    ReportFailed(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while serializing or deserializing JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The income and expense categories do not split the category list.
    #[error("the category lists are inconsistent: {0}")]
    CategoryPartition(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidCategory(_)
            | Error::InvalidFilterDate(_)
            | Error::InvertedDateRange { .. } => bad_request_page(&self.to_string()),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

fn bad_request_page(description: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        error_view(
            "Bad Request",
            "400",
            description,
            "Check the filters and try again.",
        ),
    )
        .into_response()
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::EmptyDescription => (
                StatusCode::BAD_REQUEST,
                Alert {
                    message: "Missing description".to_owned(),
                    details: "Enter a description for the transaction.".to_owned(),
                },
            ),
            Error::MissingAmount => (
                StatusCode::BAD_REQUEST,
                Alert {
                    message: "Missing amount".to_owned(),
                    details: "Enter the amount of the transaction.".to_owned(),
                },
            ),
            Error::InvalidAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert {
                    message: "Invalid amount".to_owned(),
                    details: format!("{amount} is not allowed. The amount must be greater than zero."),
                },
            ),
            Error::CategoryTypeMismatch { category, type_ } => (
                StatusCode::BAD_REQUEST,
                Alert {
                    message: "Invalid category".to_owned(),
                    details: format!(
                        "{category} cannot be used for {} transactions. Pick one of the {} categories.",
                        type_.as_form_value(),
                        type_.as_form_value()
                    ),
                },
            ),
            Error::InvalidCategory(_)
            | Error::InvalidFilterDate(_)
            | Error::InvertedDateRange { .. } => (
                StatusCode::BAD_REQUEST,
                Alert {
                    message: "Invalid filters".to_owned(),
                    details: self.to_string(),
                },
            ),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert {
                    message: "Could not update transaction".to_owned(),
                    details: "The transaction could not be found.".to_owned(),
                },
            ),
            Error::EmptyReport => (
                StatusCode::BAD_REQUEST,
                Alert {
                    message: "Nothing to report on".to_owned(),
                    details: "There are no transactions in the selected period. \
                        Change the filters and try again."
                        .to_owned(),
                },
            ),
            Error::ReportInProgress => (
                StatusCode::CONFLICT,
                Alert {
                    message: "Report in progress".to_owned(),
                    details: "A report is already being generated, please wait for it to finish."
                        .to_owned(),
                },
            ),
            Error::ReportFailed(reason) => (
                StatusCode::BAD_GATEWAY,
                Alert {
                    message: "Could not generate report".to_owned(),
                    details: format!("{reason}. Please try again."),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
