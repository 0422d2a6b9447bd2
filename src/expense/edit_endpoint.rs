//! Defines the endpoint for updating an expense.
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    db::DatabaseId,
    endpoints::{self, format_endpoint},
    expense::{
        core::{Expense, update_expense},
        form::{
            ExpenseForm, ExpenseFormProps, expense_form, get_form_options, validate_expense_form,
        },
    },
    flash::Flash,
    name_form::FormMethod,
    resource::{read_for_edit, redirect_with_flash},
};

/// The state needed to edit an expense.
#[derive(Debug, Clone)]
pub struct EditExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating an expense.
///
/// The expense must belong to the current user before the form is looked at,
/// and so must the account and category it is moved to.
pub async fn edit_expense_endpoint(
    State(state): State<EditExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<DatabaseId>,
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

    if let Err(error) = read_for_edit::<Expense>(user_id, expense_id, &connection) {
        return error.into_alert_response();
    }

    let fields = match validate_expense_form(&form, user_id, &connection) {
        Ok(fields) => fields,
        Err(Error::Validation(errors)) => {
            let (accounts, categories) = match get_form_options(user_id, &connection) {
                Ok(options) => options,
                Err(error) => return error.into_alert_response(),
            };

            return expense_form(&ExpenseFormProps {
                action: &format_endpoint(endpoints::EXPENSE, expense_id),
                method: FormMethod::Put,
                values: &form,
                errors: &errors,
                accounts: &accounts,
                categories: &categories,
                submit_text: "Save Expense",
            })
            .into_response();
        }
        Err(error) => {
            tracing::error!("could not validate expense {expense_id}: {error}");
            return error.into_alert_response();
        }
    };

    match update_expense(expense_id, user_id, &fields, &connection) {
        Ok(()) => redirect_with_flash(
            jar,
            endpoints::EXPENSES_VIEW,
            Flash::success("Expense updated successfully."),
        ),
        Err(error) => {
            tracing::error!("could not update expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}
