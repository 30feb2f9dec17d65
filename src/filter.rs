//! Selecting which transactions to display.
//!
//! [Filters] is the parsed form of the category and date range the user
//! picked; [filter_transactions] applies it.

use serde::{Deserialize, Serialize};
use time::{Date, Duration, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, category::Category, transaction::Transaction};

/// How far back the default date range reaches.
const DEFAULT_RANGE_DAYS: i64 = 30;

/// The wire value for [CategoryFilter::All].
pub const ALL_CATEGORIES: &str = "all";

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Restricts transactions to a single category, or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every category.
    All,
    /// Only transactions in this category.
    Only(Category),
}

impl CategoryFilter {
    /// Whether a transaction in `category` passes this filter.
    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }

    /// The value used in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(category) => category.as_str(),
        }
    }
}

/// The filter values as they arrive in a query string or form.
///
/// Empty strings are treated the same as missing values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterQuery {
    pub category: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// A category and inclusive date range used to select transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filters {
    pub category: CategoryFilter,
    /// The earliest date to include.
    pub date_from: Date,
    /// The latest date to include.
    pub date_to: Date,
}

impl Filters {
    /// The filters shown when the user has not picked any: every category over
    /// the thirty days up to and including `today`.
    pub fn default_for(today: Date) -> Self {
        Self {
            category: CategoryFilter::All,
            date_from: today - Duration::days(DEFAULT_RANGE_DAYS),
            date_to: today,
        }
    }

    /// Parse the raw filter values, filling missing values from
    /// [Filters::default_for].
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidCategory] if the category is neither "all" nor a category name,
    /// - [Error::InvalidFilterDate] if a date is not a valid `YYYY-MM-DD` date,
    /// - or [Error::InvertedDateRange] if the start date is after the end date.
    pub fn from_query(query: &FilterQuery, today: Date) -> Result<Self, Error> {
        let defaults = Self::default_for(today);

        let category = match non_empty(&query.category) {
            None | Some(ALL_CATEGORIES) => CategoryFilter::All,
            Some(name) => CategoryFilter::Only(name.parse()?),
        };

        let date_from = match non_empty(&query.date_from) {
            Some(text) => parse_date(text)?,
            None => defaults.date_from,
        };

        let date_to = match non_empty(&query.date_to) {
            Some(text) => parse_date(text)?,
            None => defaults.date_to,
        };

        if date_from > date_to {
            return Err(Error::InvertedDateRange {
                from: date_from,
                to: date_to,
            });
        }

        Ok(Self {
            category,
            date_from,
            date_to,
        })
    }

    /// Whether `transaction` is selected by these filters.
    pub fn includes(&self, transaction: &Transaction) -> bool {
        self.date_from <= transaction.date
            && transaction.date <= self.date_to
            && self.category.matches(transaction.category)
    }

    /// The raw form of these filters, e.g. for building links.
    pub fn to_query(&self) -> FilterQuery {
        FilterQuery {
            category: Some(self.category.as_str().to_owned()),
            date_from: Some(self.date_from.to_string()),
            date_to: Some(self.date_to.to_string()),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text, DATE_FORMAT).map_err(|_| Error::InvalidFilterDate(text.to_owned()))
}

/// Select the transactions that match `filters`, most recent first.
///
/// Transactions on the same date keep their relative order from
/// `transactions`. An inverted date range selects nothing.
pub fn filter_transactions(transactions: &[Transaction], filters: &Filters) -> Vec<Transaction> {
    let mut selected: Vec<Transaction> = transactions
        .iter()
        .filter(|transaction| filters.includes(transaction))
        .cloned()
        .collect();

    // `sort_by` is stable.
    selected.sort_by(|a, b| b.date.cmp(&a.date));

    selected
}

#[cfg(test)]
mod tests {
    use time::{Date, macros::date};

    use super::{CategoryFilter, FilterQuery, Filters, filter_transactions};
    use crate::{
        Error,
        category::{Category, TransactionType},
        transaction::Transaction,
    };

    fn transaction(id: i64, amount: f64, date: Date, category: Category) -> Transaction {
        Transaction {
            id,
            description: format!("transaction {id}"),
            amount,
            date,
            type_: category.transaction_type(),
            category,
        }
    }

    fn sample_transactions() -> Vec<Transaction> {
        vec![
            transaction(1, 50_000_000.0, date!(2024 - 01 - 01), Category::Salary),
            transaction(2, 1_500_000.0, date!(2024 - 01 - 02), Category::Food),
            transaction(3, 700_000.0, date!(2024 - 02 - 01), Category::Transport),
        ]
    }

    fn filters(category: CategoryFilter, date_from: Date, date_to: Date) -> Filters {
        Filters {
            category,
            date_from,
            date_to,
        }
    }

    #[test]
    fn selects_january_most_recent_first() {
        let transactions = sample_transactions();

        let got = filter_transactions(
            &transactions,
            &filters(
                CategoryFilter::All,
                date!(2024 - 01 - 01),
                date!(2024 - 01 - 31),
            ),
        );

        let ids: Vec<_> = got.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn bounds_are_inclusive() {
        let transactions = sample_transactions();

        let got = filter_transactions(
            &transactions,
            &filters(
                CategoryFilter::All,
                date!(2024 - 01 - 02),
                date!(2024 - 02 - 01),
            ),
        );

        let ids: Vec<_> = got.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn single_day_range_includes_that_day() {
        let transactions = sample_transactions();
        let day = date!(2024 - 01 - 02);

        let got = filter_transactions(&transactions, &filters(CategoryFilter::All, day, day));

        assert_eq!(got, vec![transactions[1].clone()]);
    }

    #[test]
    fn filters_by_category() {
        let transactions = sample_transactions();

        let got = filter_transactions(
            &transactions,
            &filters(
                CategoryFilter::Only(Category::Food),
                date!(2023 - 01 - 01),
                date!(2025 - 01 - 01),
            ),
        );

        assert_eq!(got, vec![transactions[1].clone()]);
    }

    #[test]
    fn inclusion_matches_predicate_for_every_transaction() {
        let transactions = sample_transactions();
        let ranges = [
            (date!(2023 - 12 - 31), date!(2024 - 01 - 01)),
            (date!(2024 - 01 - 02), date!(2024 - 01 - 31)),
            (date!(2024 - 01 - 01), date!(2024 - 12 - 31)),
        ];
        let categories = [
            CategoryFilter::All,
            CategoryFilter::Only(Category::Salary),
            CategoryFilter::Only(Category::Transport),
            CategoryFilter::Only(Category::Rent),
        ];

        for (date_from, date_to) in ranges {
            for category in categories {
                let selection = filters(category, date_from, date_to);
                let got = filter_transactions(&transactions, &selection);

                for transaction in &transactions {
                    let want = date_from <= transaction.date
                        && transaction.date <= date_to
                        && (category == CategoryFilter::All
                            || category == CategoryFilter::Only(transaction.category));
                    assert_eq!(
                        got.contains(transaction),
                        want,
                        "transaction {} with filters {selection:?}",
                        transaction.id
                    );
                }
            }
        }
    }

    #[test]
    fn output_is_sorted_by_date_descending() {
        let transactions = vec![
            transaction(1, 1.0, date!(2024 - 03 - 01), Category::Food),
            transaction(2, 1.0, date!(2024 - 01 - 15), Category::Food),
            transaction(3, 1.0, date!(2024 - 05 - 09), Category::Salary),
            transaction(4, 1.0, date!(2024 - 02 - 29), Category::Rent),
        ];

        let got = filter_transactions(
            &transactions,
            &filters(
                CategoryFilter::All,
                date!(2024 - 01 - 01),
                date!(2024 - 12 - 31),
            ),
        );

        assert!(got.windows(2).all(|pair| pair[0].date >= pair[1].date));
        assert_eq!(got.len(), transactions.len());
    }

    #[test]
    fn equal_dates_keep_insertion_order() {
        let day = date!(2024 - 01 - 10);
        let transactions = vec![
            transaction(7, 1.0, day, Category::Food),
            transaction(3, 1.0, date!(2024 - 01 - 01), Category::Food),
            transaction(5, 1.0, day, Category::Rent),
            transaction(1, 1.0, day, Category::Salary),
        ];

        let got = filter_transactions(
            &transactions,
            &filters(
                CategoryFilter::All,
                date!(2024 - 01 - 01),
                date!(2024 - 01 - 31),
            ),
        );

        let ids: Vec<_> = got.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![7, 5, 1, 3]);
    }

    #[test]
    fn does_not_modify_input() {
        let transactions = sample_transactions();
        let before = transactions.clone();

        filter_transactions(
            &transactions,
            &filters(
                CategoryFilter::All,
                date!(2024 - 01 - 01),
                date!(2024 - 12 - 31),
            ),
        );

        assert_eq!(transactions, before);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let got = filter_transactions(
            &[],
            &filters(
                CategoryFilter::All,
                date!(2024 - 01 - 01),
                date!(2024 - 12 - 31),
            ),
        );

        assert!(got.is_empty());
    }

    #[test]
    fn inverted_range_selects_nothing() {
        let got = filter_transactions(
            &sample_transactions(),
            &filters(
                CategoryFilter::All,
                date!(2024 - 12 - 31),
                date!(2024 - 01 - 01),
            ),
        );

        assert!(got.is_empty());
    }

    #[test]
    fn parses_query() {
        let query = FilterQuery {
            category: Some("FOOD".to_owned()),
            date_from: Some("2024-01-01".to_owned()),
            date_to: Some("2024-01-31".to_owned()),
        };

        let got = Filters::from_query(&query, date!(2024 - 06 - 01));

        assert_eq!(
            got,
            Ok(filters(
                CategoryFilter::Only(Category::Food),
                date!(2024 - 01 - 01),
                date!(2024 - 01 - 31),
            ))
        );
    }

    #[test]
    fn missing_values_use_defaults() {
        let today = date!(2024 - 03 - 31);

        let got = Filters::from_query(&FilterQuery::default(), today);

        assert_eq!(
            got,
            Ok(filters(CategoryFilter::All, date!(2024 - 03 - 01), today))
        );
    }

    #[test]
    fn empty_strings_use_defaults() {
        let today = date!(2024 - 03 - 31);
        let query = FilterQuery {
            category: Some(String::new()),
            date_from: Some(" ".to_owned()),
            date_to: Some(String::new()),
        };

        let got = Filters::from_query(&query, today);

        assert_eq!(got, Ok(Filters::default_for(today)));
    }

    #[test]
    fn all_is_parsed_as_every_category() {
        let query = FilterQuery {
            category: Some("all".to_owned()),
            ..Default::default()
        };

        let got = Filters::from_query(&query, date!(2024 - 03 - 31)).unwrap();

        assert_eq!(got.category, CategoryFilter::All);
    }

    #[test]
    fn malformed_dates_are_rejected() {
        for text in ["2024-13-01", "01/02/2024", "yesterday", "2024-02-30"] {
            let query = FilterQuery {
                date_from: Some(text.to_owned()),
                ..Default::default()
            };

            let got = Filters::from_query(&query, date!(2024 - 03 - 31));

            assert_eq!(got, Err(Error::InvalidFilterDate(text.to_owned())));
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        let query = FilterQuery {
            category: Some("PETS".to_owned()),
            ..Default::default()
        };

        let got = Filters::from_query(&query, date!(2024 - 03 - 31));

        assert_eq!(got, Err(Error::InvalidCategory("PETS".to_owned())));
    }

    #[test]
    fn inverted_range_is_reported_when_parsing() {
        let query = FilterQuery {
            category: None,
            date_from: Some("2024-02-01".to_owned()),
            date_to: Some("2024-01-01".to_owned()),
        };

        let got = Filters::from_query(&query, date!(2024 - 03 - 31));

        assert_eq!(
            got,
            Err(Error::InvertedDateRange {
                from: date!(2024 - 02 - 01),
                to: date!(2024 - 01 - 01),
            })
        );
    }

    #[test]
    fn query_string_round_trips() {
        let selection = filters(
            CategoryFilter::Only(Category::OtherIncome),
            date!(2024 - 01 - 01),
            date!(2024 - 01 - 31),
        );

        let text = serde_urlencoded::to_string(selection.to_query()).unwrap();
        let query: FilterQuery = serde_urlencoded::from_str(&text).unwrap();

        assert_eq!(
            text,
            "category=OTHER_INCOME&date_from=2024-01-01&date_to=2024-01-31"
        );
        assert_eq!(Filters::from_query(&query, date!(2030 - 01 - 01)), Ok(selection));
    }

    #[test]
    fn income_and_expense_types_are_both_selected() {
        let got = filter_transactions(
            &sample_transactions(),
            &filters(
                CategoryFilter::All,
                date!(2024 - 01 - 01),
                date!(2024 - 12 - 31),
            ),
        );

        assert!(got.iter().any(|t| t.type_ == TransactionType::Income));
        assert!(got.iter().any(|t| t.type_ == TransactionType::Expense));
    }
}
