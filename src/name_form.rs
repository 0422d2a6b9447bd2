//! The create and edit form shared by accounts and categories, which only have a name.

use maud::{Markup, html};

use crate::{
    html::{labelled_input, submit_button},
    validation::ValidationErrors,
};

/// How the form submits its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    /// Create a new row.
    Post,
    /// Replace the name of an existing row.
    Put,
}

/// The form for entering the name of an account or category.
///
/// `name` is the value to prefill, which is the submitted value when the
/// form is shown again with errors.
pub fn name_form(
    action: &str,
    method: FormMethod,
    name: &str,
    errors: &ValidationErrors,
    submit_text: &str,
) -> Markup {
    let (hx_post, hx_put) = match method {
        FormMethod::Post => (Some(action), None),
        FormMethod::Put => (None, Some(action)),
    };

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="w-full space-y-4 md:space-y-6"
        {
            (labelled_input("Name", "name", "text", name, errors))

            (submit_button(submit_text))
        }
    }
}
