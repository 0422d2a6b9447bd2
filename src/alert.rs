//! Alert fragments for displaying error messages to users.
//!
//! Alerts are returned by `/api` routes and swapped into the
//! `#alert-container` element of the base page by HTMX. The same box is used
//! for flash messages rendered at the top of list pages.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// An error message with supporting details.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub message: String,
    pub details: String,
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let content = alert_box(false, &self.message, Some(&self.details));

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                (content)
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        Html(self.into_html().into_string()).into_response()
    }
}

/// A dismissable box with a message and optional details.
pub fn alert_box(is_success: bool, message: &str, details: Option<&str>) -> Markup {
    let container_style = if is_success {
        "flex items-start p-4 mb-4 rounded-lg border text-green-800 \
        border-green-300 bg-green-50 dark:bg-gray-800 dark:text-green-400 \
        dark:border-green-800"
    } else {
        "flex items-start p-4 mb-4 rounded-lg border text-red-800 \
        border-red-300 bg-red-50 dark:bg-gray-800 dark:text-red-400 \
        dark:border-red-800"
    };

    html! {
        div class=(container_style) role="alert" data-alert-kind=(if is_success { "success" } else { "error" })
        {
            div class="flex-1"
            {
                p class="font-medium" { (message) }

                @if let Some(details) = details.filter(|details| !details.is_empty()) {
                    p class="text-sm mt-1" { (details) }
                }
            }

            button
                type="button"
                class="ms-3 text-sm font-semibold"
                onclick="this.closest('[role=alert]').remove()"
                aria-label="Dismiss"
            {
                "×"
            }
        }
    }
}
