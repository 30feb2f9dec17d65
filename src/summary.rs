//! Totals of income, expenses and the resulting balance.

use crate::{category::TransactionType, transaction::Transaction};

/// The total income and expenses of a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    /// The sum of the amounts of income transactions.
    pub income: f64,
    /// The sum of the amounts of expense transactions.
    pub expenses: f64,
    /// `income - expenses`, negative when more was spent than earned.
    pub balance: f64,
}

/// Add up the income and expenses in `transactions`.
///
/// An empty slice gives all zeros. Amounts are summed as-is with no
/// rounding.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let (income, expenses) =
        transactions
            .iter()
            .fold((0.0, 0.0), |(income, expenses), transaction| {
                match transaction.type_ {
                    TransactionType::Income => (income + transaction.amount, expenses),
                    TransactionType::Expense => (income, expenses + transaction.amount),
                }
            });

    Summary {
        income,
        expenses,
        balance: income - expenses,
    }
}
