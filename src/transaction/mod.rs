//! Transactions and the pages and endpoints for managing them.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `NewTransaction` for creating and updating transactions
//! - The `TransactionStore` that owns and persists the collection
//! - View handlers and HTMX endpoints for creating, editing and deleting transactions

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod store;

pub use core::{NewTransaction, Transaction, TransactionId};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use store::{TransactionStore, UpdatePolicy};
