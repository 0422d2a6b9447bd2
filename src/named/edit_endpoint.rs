//! Defines the endpoint for renaming an account or category.

use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    Error,
    auth::UserID,
    db::DatabaseId,
    endpoints::format_endpoint,
    flash::Flash,
    name_form::{FormMethod, name_form},
    named::{NamedResource, NamedResourceState, update_named},
    resource::{read_for_edit, redirect_with_flash},
    validation::{NameForm, validate_name_form},
};

/// A route handler for renaming an account or category.
///
/// The row must belong to the current user before the form is looked at.
/// Invalid forms are returned with their field errors and nothing is written.
pub async fn edit_named_endpoint<R: NamedResource>(
    State(state): State<NamedResourceState>,
    Extension(user_id): Extension<UserID>,
    Path(id): Path<DatabaseId>,
    jar: PrivateCookieJar,
    Form(form): Form<NameForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = read_for_edit::<R>(user_id, id, &connection) {
        return error.into_alert_response();
    }

    let name = match validate_name_form(&form) {
        Ok(name) => name,
        Err(Error::Validation(errors)) => {
            return name_form(
                &format_endpoint(R::ITEM_API, id),
                FormMethod::Put,
                form.name.as_deref().unwrap_or_default(),
                &errors,
                &format!("Save {}", R::TITLE),
            )
            .into_response();
        }
        Err(error) => return error.into_alert_response(),
    };

    match update_named::<R>(id, user_id, &name, &connection) {
        Ok(()) => redirect_with_flash(
            jar,
            R::LIST_VIEW,
            Flash::success(format!("{} updated successfully.", R::TITLE)),
        ),
        Err(error) => {
            tracing::error!("could not update {} {id}: {error}", R::LABEL);
            error.into_alert_response()
        }
    }
}
