//! Natural-language financial reports written by an external text generation service.
//!
//! The report covers the transactions selected by the dashboard filters:
//! - [build_report_prompt] turns them into instructions for the service,
//! - a [ReportGenerator] sends the instructions, see [GeminiClient],
//! - and [generate_report] makes sure only one request runs at a time.

mod endpoint;
mod generator;
mod prompt;
mod tracker;

pub use endpoint::{REPORT_MODAL_ID, generate_report_endpoint};
pub use generator::{
    DEFAULT_REPORT_MODEL, GeminiClient, ReportError, ReportGenerator, UnconfiguredGenerator,
};
pub use prompt::build_report_prompt;
pub use tracker::{ReportTracker, generate_report};
