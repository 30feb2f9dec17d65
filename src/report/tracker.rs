//! Tracks the single in-flight report request.

use std::sync::{Mutex, PoisonError};

use crate::{
    Error,
    report::{ReportError, ReportGenerator, build_report_prompt},
    transaction::Transaction,
};

/// The state of the most recent report request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportStatus {
    /// The request has been sent and has not finished yet.
    Pending,
    /// The request finished with this report.
    Ready(String),
    /// The request failed for this reason.
    Failed(String),
}

/// Remembers the outcome of the last report request and refuses to start a
/// new one while a request is pending.
#[derive(Debug, Default)]
pub struct ReportTracker {
    status: Option<ReportStatus>,
}

impl ReportTracker {
    /// The state of the most recent request, or `None` if there has not been one.
    pub fn status(&self) -> Option<&ReportStatus> {
        self.status.as_ref()
    }

    /// Mark a new request as pending.
    ///
    /// # Errors
    /// Returns [Error::ReportInProgress] if a request is already pending.
    pub fn begin(&mut self) -> Result<(), Error> {
        if self.status == Some(ReportStatus::Pending) {
            return Err(Error::ReportInProgress);
        }

        self.status = Some(ReportStatus::Pending);
        Ok(())
    }

    /// Record the outcome of the pending request.
    ///
    /// # Errors
    /// Returns [Error::ReportFailed] if `outcome` is an error.
    pub fn finish(&mut self, outcome: Result<String, ReportError>) -> Result<String, Error> {
        match outcome {
            Ok(report) => {
                self.status = Some(ReportStatus::Ready(report.clone()));
                Ok(report)
            }
            Err(error) => {
                let reason = error.to_string();
                self.status = Some(ReportStatus::Failed(reason.clone()));
                Err(Error::ReportFailed(reason))
            }
        }
    }

    /// Record that the pending request was abandoned before it finished.
    fn cancel(&mut self) {
        if self.status == Some(ReportStatus::Pending) {
            self.status = Some(ReportStatus::Failed(CANCELLED_REASON.to_owned()));
        }
    }
}

const CANCELLED_REASON: &str = "the request was cancelled";

/// Clears the pending state if a report request is dropped before it
/// finishes, e.g. when the client disconnects.
struct PendingReport<'a> {
    tracker: Option<&'a Mutex<ReportTracker>>,
}

impl<'a> PendingReport<'a> {
    fn begin(tracker: &'a Mutex<ReportTracker>) -> Result<Self, Error> {
        lock_tracker(tracker).begin()?;

        Ok(Self {
            tracker: Some(tracker),
        })
    }

    fn finish(mut self, outcome: Result<String, ReportError>) -> Result<String, Error> {
        match self.tracker.take() {
            Some(tracker) => lock_tracker(tracker).finish(outcome),
            None => Err(Error::ReportFailed(CANCELLED_REASON.to_owned())),
        }
    }
}

impl Drop for PendingReport<'_> {
    fn drop(&mut self) {
        if let Some(tracker) = self.tracker.take() {
            tracing::warn!("report request was dropped before it finished");
            lock_tracker(tracker).cancel();
        }
    }
}

/// Ask `generator` for a report on `transactions`.
///
/// Only one report can be generated at a time. A failed or abandoned
/// request can be retried straight away. The transactions are only read.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyReport] if `transactions` is empty, in which case the
///   generator is not called,
/// - [Error::ReportInProgress] if another report is being generated,
/// - [Error::ReportFailed] if the generator fails,
/// - or [Error::JSONSerializationError] if the prompt cannot be built.
pub async fn generate_report(
    generator: &dyn ReportGenerator,
    tracker: &Mutex<ReportTracker>,
    transactions: &[Transaction],
) -> Result<String, Error> {
    if transactions.is_empty() {
        return Err(Error::EmptyReport);
    }

    let prompt = build_report_prompt(transactions)
        .inspect_err(|error| tracing::error!("could not build report prompt: {error}"))?;

    let pending = PendingReport::begin(tracker)?;

    let outcome = generator.generate(&prompt).await;

    if let Err(error) = &outcome {
        tracing::error!("report generation failed: {error}");
    }

    pending.finish(outcome)
}

fn lock_tracker(tracker: &Mutex<ReportTracker>) -> std::sync::MutexGuard<'_, ReportTracker> {
    // The tracker only holds plain values, so a poisoned lock is still usable.
    tracker.lock().unwrap_or_else(PoisonError::into_inner)
}
