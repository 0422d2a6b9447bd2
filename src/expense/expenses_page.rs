//! Displays the expenses recorded by the current user, newest first.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    expense::core::{ExpenseTableRow, get_expense_table_rows},
    flash::{Flash, take_flash},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, empty_state, format_currency,
    },
    navigation::NavBar,
};

/// The state needed for the [get_expenses_page](crate::expense::get_expenses_page) route handler.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn expenses_view(expenses: &[ExpenseTableRow], flash: Option<Flash>) -> Markup {
    let create_expense_page_url = endpoints::NEW_EXPENSE_VIEW;
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();
    let total: f64 = expenses.iter().map(|expense| expense.amount).sum();

    let table_row = |expense: &ExpenseTableRow| {
        let action_links = edit_delete_action_links(
            &expense.edit_url,
            &expense.delete_url,
            &format!(
                "Are you sure you want to delete the expense '{}'? This cannot be undone.",
                expense.description
            ),
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (expense.date) }
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 dark:text-white"
                {
                    (expense.description)
                }
                td class=(TABLE_CELL_STYLE) { (expense.account) }
                td class=(TABLE_CELL_STYLE) { (expense.category) }
                td class="px-6 py-4 text-right" { (format_currency(expense.amount)) }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (action_links)
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        @if let Some(flash) = flash {
            (flash.into_html())
        }

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Expenses" }

                    a href=(create_expense_page_url) class=(LINK_STYLE)
                    {
                        "Add Expense"
                    }
                }

                @if expenses.is_empty() {
                    (empty_state("No expenses yet.", create_expense_page_url, "Record an expense"))
                } @else {
                    div class="w-full overflow-x-auto dark:bg-gray-800"
                    {
                        table class="w-full text-sm text-left rtl:text-right
                            text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Account" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                    th scope="col" class="px-6 py-4 text-right" { "Amount" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                                }
                            }

                            tbody
                            {
                                @for expense in expenses {
                                    (table_row(expense))
                                }
                            }

                            tfoot
                            {
                                tr class="font-semibold text-gray-900 dark:text-white"
                                {
                                    th scope="row" colspan="4" class=(TABLE_CELL_STYLE) { "Total" }
                                    td class="px-6 py-4 text-right" data-expense-total="true"
                                    {
                                        (format_currency(total))
                                    }
                                    td {}
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Expenses", &content)
}

/// Renders the expenses page showing the user's expenses and any pending flash message.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expenses = get_expense_table_rows(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get expenses for user {user_id}: {error}"))?;

    let (jar, flash) = take_flash(jar);

    Ok((jar, expenses_view(&expenses, flash)).into_response())
}
