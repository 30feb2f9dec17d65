//! Error alerts shown in response to HTMX requests.
//!
//! Alerts are swapped into the `#alert-container` element that every page
//! created with [crate::html::base] has.

use maud::{Markup, html};

/// An error message with a short summary and a longer explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// A short summary, shown in bold.
    pub message: String,
    /// What went wrong and how the user can fix it.
    pub details: String,
}

impl Alert {
    pub fn into_html(self) -> Markup {
        html! {
            div
                role="alert"
                class="flex items-start gap-3 p-4 mb-4 text-sm rounded-lg shadow-lg \
                    text-red-800 bg-red-50 border border-red-300 \
                    dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
            {
                div class="flex-1"
                {
                    p class="font-semibold" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="mt-1" { (self.details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="font-bold leading-none hover:text-red-600 dark:hover:text-red-300"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }
}
