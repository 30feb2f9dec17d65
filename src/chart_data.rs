//! Aggregates that feed the dashboard charts.
//!
//! Both aggregates are computed from an already filtered list of
//! transactions, see [crate::filter::filter_transactions].

use std::collections::BTreeMap;

use time::Date;

use crate::{
    category::{Category, TransactionType},
    transaction::Transaction,
};

/// The total spent in one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

/// The income and expenses of a single calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotals {
    /// The month as `YYYY-MM`, used for ordering.
    pub period_key: String,
    /// The month for display, e.g. "Jan 24".
    pub period_label: String,
    pub income: f64,
    pub expense: f64,
}

/// Both chart aggregates for one set of transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    /// Expense totals per category in category declaration order.
    pub expenses_by_category: Vec<CategoryTotal>,
    /// Income and expense totals per month, oldest first.
    pub income_vs_expense_by_month: Vec<MonthlyTotals>,
}

impl ChartData {
    /// Compute both chart aggregates for `transactions`.
    pub fn build(transactions: &[Transaction]) -> Self {
        Self {
            expenses_by_category: expenses_by_category(transactions),
            income_vs_expense_by_month: income_vs_expense_by_month(transactions),
        }
    }
}

/// Sum expense amounts per category.
///
/// Income is ignored, and categories without any expenses are left out.
pub fn expenses_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut categories = CategoryAccumulator::default();
    transactions
        .iter()
        .for_each(|transaction| categories.add(transaction));
    categories.finish()
}

/// Sum income and expenses per calendar month, oldest month first.
///
/// Only months with at least one transaction are included.
pub fn income_vs_expense_by_month(transactions: &[Transaction]) -> Vec<MonthlyTotals> {
    let mut months = MonthAccumulator::default();
    transactions
        .iter()
        .for_each(|transaction| months.add(transaction));
    months.finish()
}

#[derive(Default)]
struct CategoryAccumulator {
    // `Category` orders by declaration.
    totals: BTreeMap<Category, f64>,
}

impl CategoryAccumulator {
    fn add(&mut self, transaction: &Transaction) {
        if transaction.type_ == TransactionType::Expense {
            *self.totals.entry(transaction.category).or_default() += transaction.amount;
        }
    }

    fn finish(self) -> Vec<CategoryTotal> {
        self.totals
            .into_iter()
            .map(|(category, total)| CategoryTotal { category, total })
            .collect()
    }
}

#[derive(Default)]
struct MonthAccumulator {
    totals: BTreeMap<(i32, u8), MonthlyTotals>,
}

impl MonthAccumulator {
    fn add(&mut self, transaction: &Transaction) {
        let date = transaction.date;
        let entry = self
            .totals
            .entry((date.year(), u8::from(date.month())))
            .or_insert_with(|| MonthlyTotals {
                period_key: period_key(date),
                period_label: period_label(date),
                income: 0.0,
                expense: 0.0,
            });

        match transaction.type_ {
            TransactionType::Income => entry.income += transaction.amount,
            TransactionType::Expense => entry.expense += transaction.amount,
        }
    }

    fn finish(self) -> Vec<MonthlyTotals> {
        self.totals.into_values().collect()
    }
}

fn period_key(date: Date) -> String {
    format!("{:04}-{:02}", date.year(), u8::from(date.month()))
}

fn period_label(date: Date) -> String {
    let month = date.month().to_string();
    let short_month = month.get(..3).unwrap_or(&month);

    format!("{short_month} {:02}", date.year().rem_euclid(100))
}
