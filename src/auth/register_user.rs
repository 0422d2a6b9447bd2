//! The registration page and the handler that creates a user and logs them in.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRedirect;
use email_address::EmailAddress;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{PasswordHash, ValidatedPassword, create_user, set_auth_cookie},
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base, field_errors,
        labelled_input, log_in_register, submit_button,
    },
    validation::ValidationErrors,
};

pub const DUPLICATE_EMAIL_ERROR_MSG: &str = "An account with this email already exists.";
pub const INVALID_EMAIL_ERROR_MSG: &str = "The email field must be a valid email address.";
pub const PASSWORD_MISMATCH_ERROR_MSG: &str = "Passwords do not match.";

fn password_field(name: &str, label: &str, errors: &ValidationErrors) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                type="password"
                name=(name)
                id=(name)
                placeholder="••••••••"
                required
                class=(FORM_TEXT_INPUT_STYLE);

            (field_errors(errors, name))
        }
    }
}

fn registration_form(email: &str, errors: &ValidationErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            (labelled_input("Email", "email", "email", email, errors))
            (password_field("password", "Password", errors))
            (password_field("confirm_password", "Confirm Password", errors))

            (submit_button("Register"))

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                    "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let form = registration_form("", &ValidationErrors::default());
    let content = log_in_register("Create an account", &form);

    base("Register", &content).into_response()
}

/// The state needed to register a user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
    /// The bcrypt cost for hashing new passwords.
    pub password_cost: u32,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
            password_cost: PasswordHash::DEFAULT_COST,
        }
    }
}

/// The raw data entered by the user in the registration form.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Check the registration form, collecting an error for each bad field.
fn validate_registration(
    form: &RegisterForm,
) -> Result<(EmailAddress, ValidatedPassword), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let email = match EmailAddress::from_str(form.email.trim()) {
        Ok(email) => Some(email),
        Err(error) => {
            tracing::debug!("rejected email \"{}\": {error}", form.email);
            errors.add("email", INVALID_EMAIL_ERROR_MSG);
            None
        }
    };

    let password = match ValidatedPassword::from_confirmed(
        &form.password,
        &form.confirm_password,
        &[form.email.trim()],
    ) {
        Ok(password) => Some(password),
        Err(Error::PasswordMismatch) => {
            errors.add("confirm_password", PASSWORD_MISMATCH_ERROR_MSG);
            None
        }
        Err(Error::TooWeak(feedback)) => {
            errors.add("password", format!("Password is too weak. {feedback}"));
            None
        }
        Err(error) => {
            tracing::error!("unexpected error while checking password: {error}");
            errors.add("password", "Could not check the password. Please try again.");
            None
        }
    };

    match (email, password) {
        (Some(email), Some(password)) => Ok((email, password)),
        _ => Err(errors),
    }
}

/// A route handler for registering a new user.
///
/// On success the user is logged in and redirected to the expenses page.
/// Otherwise the form is returned with the errors next to the fields.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let (email, password) = match validate_registration(&form) {
        Ok(valid) => valid,
        Err(errors) => return registration_form(&form.email, &errors).into_response(),
    };

    let password_hash = match PasswordHash::new(password, state.password_cost) {
        Ok(password_hash) => password_hash,
        Err(error) => {
            tracing::error!("Could not hash password: {error}");
            return error.into_alert_response();
        }
    };

    let user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_alert_response();
            }
        };

        create_user(email, password_hash, &connection)
    };

    let user = match user {
        Ok(user) => user,
        Err(Error::DuplicateEmail) => {
            let mut errors = ValidationErrors::default();
            errors.add("email", DUPLICATE_EMAIL_ERROR_MSG);

            return registration_form(&form.email, &errors).into_response();
        }
        Err(error) => {
            tracing::error!("Could not create user: {error}");
            return error.into_alert_response();
        }
    };

    tracing::info!("registered user {}", user.id);

    match set_auth_cookie(jar, user.id, state.cookie_duration) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            (
                HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
    }
}
