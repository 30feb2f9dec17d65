//! The table listing the filtered transactions.

use maud::{Markup, html};

use crate::{
    category::TransactionType,
    endpoints::{self, format_endpoint, with_filters},
    filter::FilterQuery,
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
    transaction::Transaction,
};

fn transaction_row(transaction: &Transaction, filters: &FilterQuery) -> Markup {
    let edit_url = with_filters(
        &format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id),
        filters,
    );
    let delete_url = with_filters(
        &format_endpoint(endpoints::TRANSACTION, transaction.id),
        filters,
    );
    let (sign, amount_style) = match transaction.type_ {
        TransactionType::Income => ("+", "text-green-600 dark:text-green-400"),
        TransactionType::Expense => ("-", "text-red-600 dark:text-red-400"),
    };
    let confirm_message = format!(
        "Are you sure you want to delete '{}'? This cannot be undone.",
        transaction.description
    );

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(TABLE_CELL_STYLE)
            {
                span class="inline-flex items-center gap-2"
                {
                    span
                        class="inline-block w-2.5 h-2.5 rounded-full"
                        style=(format!("background-color: {}", transaction.category.colour()))
                    {}
                    (transaction.category.label())
                }
            }
            td class={(TABLE_CELL_STYLE) " text-right whitespace-nowrap " (amount_style)}
            {
                (sign) (format_currency(transaction.amount))
            }
            td class={(TABLE_CELL_STYLE) " whitespace-nowrap"}
            {
                div class="flex gap-4"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        type="button"
                        hx-delete=(delete_url)
                        hx-confirm=(confirm_message)
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

/// Renders the filtered transactions, most recent first.
pub(super) fn transactions_table(transactions: &[Transaction], filters: &FilterQuery) -> Markup {
    let new_transaction_url = with_filters(endpoints::NEW_TRANSACTION_VIEW, filters);

    html! {
        section id="transactions" class="w-full mb-6"
        {
            h3 class="text-xl font-semibold mb-4" { "Transactions" }

            @if transactions.is_empty() {
                p class="text-gray-600 dark:text-gray-400" data-transactions-empty
                {
                    "No transactions match the selected filters. "
                    a href=(new_transaction_url) class=(LINK_STYLE) { "Add a transaction" }
                    "."
                }
            } @else {
                div class="overflow-x-auto rounded-lg shadow"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row(transaction, filters))
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use super::transactions_table;
    use crate::{category::Category, filter::FilterQuery, transaction::Transaction};

    fn transaction(id: i64, category: Category) -> Transaction {
        Transaction {
            id,
            description: format!("transaction {id}"),
            amount: 12.5,
            date: date!(2024 - 01 - 02),
            type_: category.transaction_type(),
            category,
        }
    }

    #[test]
    fn rows_link_to_edit_and_delete() {
        let filters = FilterQuery {
            category: Some("all".to_owned()),
            ..Default::default()
        };

        let markup = transactions_table(
            &[transaction(2, Category::Food), transaction(1, Category::Salary)],
            &filters,
        );
        let fragment = Html::parse_fragment(&markup.into_string());

        let rows = Selector::parse("tbody tr").unwrap();
        let ids: Vec<_> = fragment
            .select(&rows)
            .filter_map(|row| row.value().attr("data-transaction-id"))
            .collect();
        assert_eq!(ids, ["2", "1"]);

        let edit = Selector::parse("a[href='/transactions/2/edit?category=all']").unwrap();
        assert!(fragment.select(&edit).next().is_some());

        let delete = Selector::parse("button[hx-delete='/api/transactions/1?category=all']").unwrap();
        assert!(fragment.select(&delete).next().is_some());
    }

    #[test]
    fn empty_list_shows_message() {
        let markup = transactions_table(&[], &FilterQuery::default());
        let fragment = Html::parse_fragment(&markup.into_string());

        let selector = Selector::parse("[data-transactions-empty]").unwrap();
        assert!(fragment.select(&selector).next().is_some());
        let table = Selector::parse("table").unwrap();
        assert!(fragment.select(&table).next().is_none());
    }
}
