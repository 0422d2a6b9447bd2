//! Defines the endpoint for deleting an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::Response,
};
use axum_extra::extract::PrivateCookieJar;
use rusqlite::Connection;

use crate::{
    AppState,
    auth::UserID,
    db::DatabaseId,
    expense::core::Expense,
    resource::{DeleteOutcome, delete, delete_response},
};

/// The state needed to delete an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an expense, which then redirects to the
/// expenses page with a flash message.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<DatabaseId>,
    jar: PrivateCookieJar,
) -> Response {
    let outcome = match state.db_connection.lock() {
        Ok(connection) => delete::<Expense>(user_id, expense_id, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            DeleteOutcome::Failed
        }
    };

    delete_response::<Expense>(jar, outcome)
}
