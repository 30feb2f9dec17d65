//! Dashboard module
//!
//! Provides an overview page for the selected category and date range:
//! summary cards, the matching transactions and two charts.

mod cards;
mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
