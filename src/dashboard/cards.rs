//! Card components for the income, expense and balance totals.

use maud::{Markup, html};

use crate::{html::format_currency, summary::Summary};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

fn summary_card(title: &str, amount: f64, amount_style: &str) -> Markup {
    html! {
        div class=(CARD_STYLE) aria-label=(format!("{title}: {}", format_currency(amount)))
        {
            h3 class="text-sm font-medium text-gray-600 dark:text-gray-400 mb-2" { (title) }

            div class={"text-2xl font-bold " (amount_style)} { (format_currency(amount)) }
        }
    }
}

/// Renders the summary cards for the filtered transactions.
pub(super) fn summary_cards_view(summary: &Summary) -> Markup {
    let balance_style = if summary.balance >= 0.0 {
        "text-blue-600 dark:text-blue-400"
    } else {
        "text-red-600 dark:text-red-400"
    };

    html! {
        section id="summary" class="w-full grid grid-cols-1 sm:grid-cols-3 gap-4 mb-6"
        {
            (summary_card("Income", summary.income, "text-green-600 dark:text-green-400"))
            (summary_card("Expenses", summary.expenses, "text-red-600 dark:text-red-400"))
            (summary_card("Balance", summary.balance, balance_style))
        }
    }
}
