//! The public landing page.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};

use crate::{
    auth::get_token_from_cookies,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, LINK_STYLE, base},
};

fn landing_view() -> Markup {
    let content = html! {
        main class="flex flex-col items-center justify-center px-6 py-16 mx-auto lg:py-24"
        {
            section class="w-full max-w-xl space-y-6 text-center"
            {
                h1 class="text-3xl font-bold text-gray-900 dark:text-white"
                {
                    "Expense Tracker"
                }

                p class="text-gray-600 dark:text-gray-300"
                {
                    "Record what you spend, which account it came out of and what it was for."
                }

                div class="flex flex-col gap-4 items-center"
                {
                    a href=(endpoints::LOG_IN_VIEW) class=(BUTTON_PRIMARY_STYLE) { "Log in" }

                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "New here? "
                        a href=(endpoints::REGISTER_VIEW) class=(LINK_STYLE) { "Create an account" }
                    }
                }
            }
        }
    };

    base("Welcome", &content)
}

/// Route handler for '/'.
///
/// Users that are already logged in are sent to their expenses.
pub async fn get_landing_page(jar: PrivateCookieJar) -> Response {
    if get_token_from_cookies(&jar).is_ok() {
        return Redirect::to(endpoints::EXPENSES_VIEW).into_response();
    }

    landing_view().into_response()
}
