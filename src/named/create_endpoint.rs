//! Defines the endpoint for creating a new account or category.

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    Error,
    auth::UserID,
    flash::Flash,
    name_form::{FormMethod, name_form},
    named::{NamedResource, NamedResourceState, insert_named},
    resource::redirect_with_flash,
    validation::{NameForm, validate_name_form},
};

/// A route handler for creating a new row owned by the current user.
///
/// Redirects to the list view on success, otherwise responds with the
/// form and its field errors.
pub async fn create_named_endpoint<R: NamedResource>(
    State(state): State<NamedResourceState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Form(form): Form<NameForm>,
) -> Response {
    let name = match validate_name_form(&form) {
        Ok(name) => name,
        Err(Error::Validation(errors)) => {
            return name_form(
                R::COLLECTION_API,
                FormMethod::Post,
                form.name.as_deref().unwrap_or_default(),
                &errors,
                &format!("Create {}", R::TITLE),
            )
            .into_response();
        }
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match insert_named::<R>(user_id, &name, &connection) {
        Ok(row) => {
            tracing::debug!("user {user_id} created {} {}", R::LABEL, row.id());
            redirect_with_flash(
                jar,
                R::LIST_VIEW,
                Flash::success(format!("{} created successfully.", R::TITLE)),
            )
        }
        Err(error) => {
            tracing::error!(
                "could not create {} \"{name}\" for user {user_id}: {error}",
                R::LABEL
            );
            error.into_alert_response()
        }
    }
}
