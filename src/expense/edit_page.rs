use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    db::DatabaseId,
    endpoints::{self, format_endpoint},
    expense::{
        core::Expense,
        form::{ExpenseForm, ExpenseFormProps, expense_form, get_form_options},
    },
    html::form_page,
    name_form::FormMethod,
    resource::read_for_edit,
    validation::ValidationErrors,
};

/// The state needed for the edit expense page.
#[derive(Debug, Clone)]
pub struct EditExpensePageState {
    /// The database connection for reading the expense.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing an expense.
///
/// Responds with the 404 page if the expense does not exist and the 403 page
/// if it belongs to another user.
pub async fn get_edit_expense_page(
    State(state): State<EditExpensePageState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<DatabaseId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = read_for_edit::<Expense>(user_id, expense_id, &connection)?;
    let (accounts, categories) = get_form_options(user_id, &connection)?;

    let form = expense_form(&ExpenseFormProps {
        action: &format_endpoint(endpoints::EXPENSE, expense.id),
        method: FormMethod::Put,
        values: &ExpenseForm::from(&expense),
        errors: &ValidationErrors::default(),
        accounts: &accounts,
        categories: &categories,
        submit_text: "Save Expense",
    });

    Ok(form_page("Edit Expense", endpoints::EXPENSES_VIEW, &form).into_response())
}
