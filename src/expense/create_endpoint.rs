//! Defines the endpoint for recording a new expense.
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    expense::{
        core::insert_expense,
        form::{
            ExpenseForm, ExpenseFormProps, expense_form, get_form_options, validate_expense_form,
        },
    },
    flash::Flash,
    name_form::FormMethod,
    resource::redirect_with_flash,
};

/// The state needed to record an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for recording a new expense owned by the current user.
///
/// The account and category must belong to the current user. Redirects to
/// the expenses view on success, otherwise responds with the form and its
/// field errors.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let fields = match validate_expense_form(&form, user_id, &connection) {
        Ok(fields) => fields,
        Err(Error::Validation(errors)) => {
            let (accounts, categories) = match get_form_options(user_id, &connection) {
                Ok(options) => options,
                Err(error) => return error.into_alert_response(),
            };

            return expense_form(&ExpenseFormProps {
                action: endpoints::EXPENSES_API,
                method: FormMethod::Post,
                values: &form,
                errors: &errors,
                accounts: &accounts,
                categories: &categories,
                submit_text: "Create Expense",
            })
            .into_response();
        }
        Err(error) => {
            tracing::error!("could not validate expense: {error}");
            return error.into_alert_response();
        }
    };

    match insert_expense(user_id, &fields, &connection) {
        Ok(expense) => {
            tracing::debug!("user {user_id} created expense {}", expense.id);
            redirect_with_flash(
                jar,
                endpoints::EXPENSES_VIEW,
                Flash::success("Expense created successfully."),
            )
        }
        Err(error) => {
            tracing::error!("could not create expense: {error}");
            error.into_alert_response()
        }
    }
}
