//! Defines the core data models for transactions.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    category::{Category, TransactionType},
};

// ============================================================================
// MODELS
// ============================================================================

/// The integer type used to identify transactions.
pub type TransactionId = i64;

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// New transactions are created through
/// [TransactionStore::create](crate::transaction::TransactionStore::create),
/// which assigns the ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned, always greater than zero.
    ///
    /// Whether the money was spent or earned is given by `type_`.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// Whether this is income or an expense.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// What the transaction was for.
    pub category: Category,
}

impl Transaction {
    /// Start building a transaction with every field except the ID.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(
        description: &str,
        amount: f64,
        date: Date,
        category: Category,
    ) -> NewTransaction {
        NewTransaction {
            description: description.to_owned(),
            amount,
            date,
            type_: category.transaction_type(),
            category,
        }
    }

    /// Replace every field except the ID.
    pub(crate) fn overwrite(&mut self, fields: NewTransaction) {
        self.description = fields.description;
        self.amount = fields.amount;
        self.date = fields.date;
        self.type_ = fields.type_;
        self.category = fields.category;
    }
}

/// The fields of a [Transaction] without its ID.
///
/// Used for both creating and updating transactions. Call
/// [NewTransaction::validate] before handing it to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A text description of what the transaction was for.
    ///
    /// Must not be empty or only whitespace.
    pub description: String,
    /// The amount of money, must be greater than zero.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// Whether this is income or an expense.
    pub type_: TransactionType,
    /// What the transaction was for.
    ///
    /// Must belong to `type_`, e.g. [Category::Salary] is only valid for
    /// income.
    pub category: Category,
}

impl NewTransaction {
    /// Override the transaction type.
    ///
    /// [Transaction::build] derives the type from the category, so this is
    /// only needed to construct deliberately invalid input.
    pub fn type_(mut self, type_: TransactionType) -> Self {
        self.type_ = type_;
        self
    }

    /// Check the fields and trim the description.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyDescription] if the description is empty or whitespace,
    /// - [Error::InvalidAmount] if the amount is not a finite number greater than zero,
    /// - or [Error::CategoryTypeMismatch] if the category belongs to the other transaction type.
    pub fn validate(mut self) -> Result<Self, Error> {
        let trimmed = self.description.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyDescription);
        }
        self.description = trimmed.to_owned();

        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidAmount(self.amount));
        }

        if self.category.transaction_type() != self.type_ {
            return Err(Error::CategoryTypeMismatch {
                category: self.category,
                type_: self.type_,
            });
        }

        Ok(self)
    }
}

// ============================================================================
// TESTS
// ============================================================================
