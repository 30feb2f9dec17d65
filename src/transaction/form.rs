use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    category::{Category, TransactionType, expense_categories, income_categories},
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::{NewTransaction, Transaction},
};

/// The values a transaction form starts with.
pub struct TransactionFormDefaults<'a> {
    pub transaction_type: TransactionType,
    pub amount: Option<f64>,
    pub date: Date,
    pub description: Option<&'a str>,
    pub category: Option<Category>,
}

impl<'a> TransactionFormDefaults<'a> {
    /// An empty expense dated `today`.
    pub fn new_expense(today: Date) -> Self {
        Self {
            transaction_type: TransactionType::Expense,
            amount: None,
            date: today,
            description: None,
            category: None,
        }
    }

    /// The current values of `transaction`.
    pub fn from_transaction(transaction: &'a Transaction) -> Self {
        Self {
            transaction_type: transaction.type_,
            amount: Some(transaction.amount),
            date: transaction.date,
            description: Some(&transaction.description),
            category: Some(transaction.category),
        }
    }
}

/// The form data for creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// Whether the transaction is income or an expense.
    pub type_: TransactionType,
    /// The value of the transaction, `None` if the field was left empty.
    #[serde(default)]
    pub amount: Option<f64>,
    /// The date when the transaction occurred.
    pub date: Date,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
    /// What the transaction was for.
    pub category: Category,
}

impl TransactionForm {
    /// Convert the form into transaction fields ready for validation.
    ///
    /// # Errors
    /// Returns [Error::MissingAmount] if the amount was left empty.
    pub fn into_new_transaction(self) -> Result<NewTransaction, Error> {
        let amount = self.amount.ok_or(Error::MissingAmount)?;

        Ok(
            Transaction::build(&self.description, amount, self.date, self.category)
                .type_(self.type_),
        )
    }
}

fn type_radio(transaction_type: TransactionType, label: &str, checked: bool) -> Markup {
    let value = transaction_type.as_form_value();
    let id = format!("transaction-type-{value}");

    html! {
        div class="flex items-center gap-3"
        {
            input
                name="type_"
                id=(id)
                type="radio"
                value=(value)
                checked[checked]
                required
                tabindex="0"
                class=(FORM_RADIO_INPUT_STYLE);

            label
                for=(id)
                class=(FORM_RADIO_LABEL_STYLE)
            {
                (label)
            }
        }
    }
}

fn category_options(categories: &[Category], current: Option<Category>) -> Markup {
    html! {
        @for category in categories {
            option
                value=(category.as_str())
                selected[Some(*category) == current]
            {
                (category.label())
            }
        }
    }
}

pub fn transaction_form_fields(defaults: &TransactionFormDefaults<'_>) -> Markup {
    let is_expense = matches!(defaults.transaction_type, TransactionType::Expense);
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                (type_radio(TransactionType::Expense, "Expense", is_expense))
                (type_radio(TransactionType::Income, "Income", !is_expense))
            }
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            input
                name="amount"
                id="amount"
                type="number"
                step="0.01"
                placeholder="0.00"
                min="0.01"
                required
                value=[amount_str.as_deref()]
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                value=[defaults.description]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            select
                name="category"
                id="category"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                optgroup label="Expense"
                {
                    (category_options(&expense_categories(), defaults.category))
                }

                optgroup label="Income"
                {
                    (category_options(&income_categories(), defaults.category))
                }
            }
        }
    }
}
