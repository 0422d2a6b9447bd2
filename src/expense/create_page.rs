use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    expense::form::{ExpenseForm, ExpenseFormProps, expense_form, get_form_options},
    html::form_page,
    name_form::FormMethod,
    timezone::local_today,
    validation::ValidationErrors,
};

/// The state needed for the new expense page.
#[derive(Debug, Clone)]
pub struct CreateExpensePageState {
    /// The database connection for reading the user's accounts and categories.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The timezone used to work out today's date, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the page for recording a new expense, with the date set to today.
pub async fn get_create_expense_page(
    State(state): State<CreateExpensePageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .inspect_err(|error| tracing::error!("could not get today's date: {error}"))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let (accounts, categories) = get_form_options(user_id, &connection)?;

    let form = expense_form(&ExpenseFormProps {
        action: endpoints::EXPENSES_API,
        method: FormMethod::Post,
        values: &ExpenseForm::with_date(today),
        errors: &ValidationErrors::default(),
        accounts: &accounts,
        categories: &categories,
        submit_text: "Create Expense",
    });

    Ok(form_page("New Expense", endpoints::EXPENSES_VIEW, &form).into_response())
}

#[cfg(test)]
mod create_expense_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use time::OffsetDateTime;

    use crate::{
        account::insert_account,
        category::insert_category,
        endpoints,
        test_utils::{
            assert_form_input_with_value, assert_form_select, assert_form_submit_button_with_text,
            assert_hx_endpoint, assert_no_field_errors, assert_valid_html, get_test_connection,
            insert_test_user, must_get_form, parse_html_document,
        },
        validation::EntityName,
    };

    use super::{CreateExpensePageState, get_create_expense_page};

    #[tokio::test]
    async fn renders_form_with_users_options_and_todays_date() {
        let connection = get_test_connection();
        let alice = insert_test_user("alice@example.com", &connection);
        let bob = insert_test_user("bob@example.com", &connection);
        let account =
            insert_account(alice, &EntityName::new_unchecked("Wallet"), &connection).unwrap();
        let category =
            insert_category(alice, &EntityName::new_unchecked("Food"), &connection).unwrap();
        insert_account(bob, &EntityName::new_unchecked("Bob's"), &connection).unwrap();
        let state = CreateExpensePageState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };
        let today = OffsetDateTime::now_utc().date();

        let response = get_create_expense_page(State(state), Extension(alice))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_no_field_errors(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::EXPENSES_API, "hx-post");
        assert_form_select(
            &form,
            "account_id",
            &[(account.id.to_string().as_str(), "Wallet")],
            None,
        );
        assert_form_select(
            &form,
            "category_id",
            &[(category.id.to_string().as_str(), "Food")],
            None,
        );
        // Allow for the test running across midnight.
        let date = form
            .select(&scraper::Selector::parse("input[name=date]").unwrap())
            .next()
            .and_then(|input| input.value().attr("value"))
            .unwrap();
        assert!(
            date == today.to_string() || date == today.next_day().unwrap().to_string(),
            "want today's date, got {date}"
        );
        assert_form_input_with_value(&form, "description", "text", "");
        assert_form_submit_button_with_text(&form, "Create Expense");
    }

    #[tokio::test]
    async fn invalid_timezone_is_an_error() {
        let connection = get_test_connection();
        let alice = insert_test_user("alice@example.com", &connection);
        let state = CreateExpensePageState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Not/AZone".to_owned(),
        };

        let result = get_create_expense_page(State(state), Extension(alice)).await;

        assert!(result.is_err());
    }
}
