//! Transaction categories and the transaction types that own them.
//!
//! Every category belongs to exactly one [TransactionType]. The mapping is a
//! static `match` in [Category::transaction_type], and the category lists
//! derived from it are checked once at startup by
//! [validate_category_partition].

use std::{collections::HashSet, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money earned.
    #[serde(alias = "income")]
    Income,
    /// Money spent.
    #[serde(alias = "expense")]
    Expense,
}

impl TransactionType {
    /// The value used in HTML forms, also accepted when deserializing.
    pub fn as_form_value(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

/// What a transaction was for.
///
/// The declaration order is the order categories are listed in forms and
/// charts: expense categories first, then income categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Groceries, eating out.
    Food,
    /// Public transport, fuel.
    Transport,
    /// Rent or mortgage.
    Rent,
    /// Power, water, internet.
    Utilities,
    /// Films, games, events.
    Entertainment,
    /// Doctors and medicine.
    Healthcare,
    /// General purchases.
    Shopping,
    /// Courses and books.
    Education,
    /// Holidays and trips.
    Travel,
    /// Any other expense.
    OtherExpense,
    /// Wages.
    Salary,
    /// Contract work.
    Freelance,
    /// Dividends and interest.
    Investments,
    /// Money received as a gift.
    Gifts,
    /// Any other income.
    OtherIncome,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 15] = [
        Category::Food,
        Category::Transport,
        Category::Rent,
        Category::Utilities,
        Category::Entertainment,
        Category::Healthcare,
        Category::Shopping,
        Category::Education,
        Category::Travel,
        Category::OtherExpense,
        Category::Salary,
        Category::Freelance,
        Category::Investments,
        Category::Gifts,
        Category::OtherIncome,
    ];

    /// The transaction type that this category belongs to.
    pub fn transaction_type(self) -> TransactionType {
        match self {
            Category::Food
            | Category::Transport
            | Category::Rent
            | Category::Utilities
            | Category::Entertainment
            | Category::Healthcare
            | Category::Shopping
            | Category::Education
            | Category::Travel
            | Category::OtherExpense => TransactionType::Expense,
            Category::Salary
            | Category::Freelance
            | Category::Investments
            | Category::Gifts
            | Category::OtherIncome => TransactionType::Income,
        }
    }

    /// The name used in query strings, forms and the persisted JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Food => "FOOD",
            Category::Transport => "TRANSPORT",
            Category::Rent => "RENT",
            Category::Utilities => "UTILITIES",
            Category::Entertainment => "ENTERTAINMENT",
            Category::Healthcare => "HEALTHCARE",
            Category::Shopping => "SHOPPING",
            Category::Education => "EDUCATION",
            Category::Travel => "TRAVEL",
            Category::OtherExpense => "OTHER_EXPENSE",
            Category::Salary => "SALARY",
            Category::Freelance => "FREELANCE",
            Category::Investments => "INVESTMENTS",
            Category::Gifts => "GIFTS",
            Category::OtherIncome => "OTHER_INCOME",
        }
    }

    /// The human readable name shown in the UI.
    pub fn label(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Rent => "Rent",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Shopping => "Shopping",
            Category::Education => "Education",
            Category::Travel => "Travel",
            Category::OtherExpense => "Other expenses",
            Category::Salary => "Salary",
            Category::Freelance => "Freelance",
            Category::Investments => "Investments",
            Category::Gifts => "Gifts",
            Category::OtherIncome => "Other income",
        }
    }

    /// The colour used for this category in charts.
    pub fn colour(self) -> &'static str {
        match self {
            Category::Food => "#f97316",
            Category::Transport => "#a855f7",
            Category::Rent => "#ef4444",
            Category::Utilities => "#3b82f6",
            Category::Entertainment => "#ec4899",
            Category::Healthcare => "#14b8a6",
            Category::Shopping => "#84cc16",
            Category::Education => "#d97706",
            Category::Travel => "#0ea5e9",
            Category::OtherExpense => "#71717a",
            Category::Salary => "#22c55e",
            Category::Freelance => "#10b981",
            Category::Investments => "#06b6d4",
            Category::Gifts => "#f59e0b",
            Category::OtherIncome => "#65a30d",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::InvalidCategory(s.to_owned()))
    }
}

/// The categories that may be used with expenses.
pub fn expense_categories() -> Vec<Category> {
    categories_of(TransactionType::Expense)
}

/// The categories that may be used with income.
pub fn income_categories() -> Vec<Category> {
    categories_of(TransactionType::Income)
}

fn categories_of(transaction_type: TransactionType) -> Vec<Category> {
    Category::ALL
        .into_iter()
        .filter(|category| category.transaction_type() == transaction_type)
        .collect()
}

/// Check that the expense and income categories are disjoint and together
/// contain every category exactly once.
///
/// # Errors
/// Returns [Error::CategoryPartition] describing the first violation found.
pub fn validate_category_partition() -> Result<(), Error> {
    let expenses = expense_categories();
    let incomes = income_categories();

    let mut seen = HashSet::new();
    for category in expenses.iter().chain(incomes.iter()) {
        if !seen.insert(*category) {
            return Err(Error::CategoryPartition(format!(
                "{} appears in more than one category list",
                category.as_str()
            )));
        }
    }

    if let Some(missing) = Category::ALL
        .into_iter()
        .find(|category| !seen.contains(category))
    {
        return Err(Error::CategoryPartition(format!(
            "{} is not in any category list",
            missing.as_str()
        )));
    }

    if seen.len() != Category::ALL.len() {
        return Err(Error::CategoryPartition(format!(
            "expected {} categories, got {}",
            Category::ALL.len(),
            seen.len()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::{
        Error,
        category::{
            Category, TransactionType, expense_categories, income_categories,
            validate_category_partition,
        },
    };

    #[test]
    fn partition_is_valid() {
        assert_eq!(validate_category_partition(), Ok(()));
    }

    #[test]
    fn category_lists_are_disjoint_and_complete() {
        let expenses: HashSet<_> = expense_categories().into_iter().collect();
        let incomes: HashSet<_> = income_categories().into_iter().collect();

        assert!(expenses.is_disjoint(&incomes));
        assert_eq!(expenses.len() + incomes.len(), Category::ALL.len());
        assert_eq!(expenses.len(), 10);
        assert_eq!(incomes.len(), 5);
    }

    #[test]
    fn each_category_is_listed_under_its_own_type() {
        for category in Category::ALL {
            let in_expenses = expense_categories().contains(&category);
            let in_incomes = income_categories().contains(&category);

            match category.transaction_type() {
                TransactionType::Expense => assert!(in_expenses && !in_incomes),
                TransactionType::Income => assert!(in_incomes && !in_expenses),
            }
        }
    }

    #[test]
    fn parses_wire_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(
            "GROCERIES".parse::<Category>(),
            Err(Error::InvalidCategory("GROCERIES".to_owned()))
        );
        assert_eq!(
            "food".parse::<Category>(),
            Err(Error::InvalidCategory("food".to_owned()))
        );
    }

    #[test]
    fn serde_name_matches_wire_name() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }
}
