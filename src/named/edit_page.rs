use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    auth::UserID,
    db::DatabaseId,
    endpoints::format_endpoint,
    html::form_page,
    name_form::{FormMethod, name_form},
    named::{NamedResource, NamedResourceState},
    resource::read_for_edit,
    validation::ValidationErrors,
};

/// Renders the page for renaming an account or category.
///
/// Responds with the 404 page if the row does not exist and the 403 page
/// if it belongs to another user.
pub async fn get_edit_named_page<R: NamedResource>(
    State(state): State<NamedResourceState>,
    Extension(user_id): Extension<UserID>,
    Path(id): Path<DatabaseId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let row = read_for_edit::<R>(user_id, id, &connection)?;

    let form = name_form(
        &format_endpoint(R::ITEM_API, row.id()),
        FormMethod::Put,
        row.name().as_ref(),
        &ValidationErrors::default(),
        &format!("Save {}", R::TITLE),
    );

    Ok(form_page(&format!("Edit {}", R::TITLE), R::LIST_VIEW, &form).into_response())
}
