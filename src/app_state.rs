//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    category::validate_category_partition,
    db::initialize,
    report::{ReportGenerator, ReportTracker},
    timezone::local_today,
    transaction::{TransactionStore, UpdatePolicy},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The transaction collection, loaded from the database at startup.
    ///
    /// Lock this before `db_connection` when both are needed.
    pub transactions: Arc<Mutex<TransactionStore>>,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The service that writes financial reports.
    pub report_generator: Arc<dyn ReportGenerator>,

    /// The state of the most recent report request.
    pub report_tracker: Arc<Mutex<ReportTracker>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database and load the saved
    /// transactions, seeding them if there are none.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the category lists are inconsistent, the timezone
    /// is invalid, or the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        update_policy: UpdatePolicy,
        report_generator: Arc<dyn ReportGenerator>,
    ) -> Result<Self, Error> {
        validate_category_partition()?;
        initialize(&db_connection)?;

        let today = local_today(local_timezone)?;
        let transactions = TransactionStore::load(&db_connection, update_policy, today)?;

        tracing::info!(
            "loaded {} transactions",
            transactions.transactions().len()
        );

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            transactions: Arc::new(Mutex::new(transactions)),
            local_timezone: local_timezone.to_owned(),
            report_generator,
            report_tracker: Arc::new(Mutex::new(ReportTracker::default())),
        })
    }
}
