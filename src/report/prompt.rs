//! The instructions sent to the text generation service.

use crate::{Error, transaction::Transaction};

const INSTRUCTIONS: &str = "\
You are an expert financial advisor. Based on the transaction data below, \
write a comprehensive analysis and financial report in English.
Your report should include:
1. **Financial overview:** the income, expenses and balance over the selected period.
2. **Expense analysis:** the largest expense categories and what they say about spending habits.
3. **Income analysis:** the main sources of income.
4. **Tips and recommendations:** practical advice for improving the financial situation, \
such as ways to save or to optimise the budget.

Format the answer as text with headings and lists.

Transaction data (JSON):
";

/// Build the prompt asking for a report on `transactions`.
///
/// The transactions are embedded as pretty-printed JSON in the order given.
///
/// # Errors
/// Returns [Error::JSONSerializationError] if the transactions cannot be
/// serialized.
pub fn build_report_prompt(transactions: &[Transaction]) -> Result<String, Error> {
    let json = serde_json::to_string_pretty(transactions)?;

    Ok(format!("{INSTRUCTIONS}{json}\n"))
}
