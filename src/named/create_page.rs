use axum::response::{IntoResponse, Response};

use crate::{
    html::form_page,
    name_form::{FormMethod, name_form},
    named::NamedResource,
    validation::ValidationErrors,
};

/// Renders the page for creating an account or category.
pub async fn get_create_named_page<R: NamedResource>() -> Response {
    let form = name_form(
        R::COLLECTION_API,
        FormMethod::Post,
        "",
        &ValidationErrors::default(),
        &format!("Create {}", R::TITLE),
    );

    form_page(&format!("New {}", R::TITLE), R::LIST_VIEW, &form).into_response()
}
