//! One-shot messages carried across a redirect.
//!
//! A handler that redirects after a change stores a [Flash] in a private
//! cookie. The next list page reads it, removes the cookie and shows the
//! message above its content, so each message is shown exactly once.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{Error, alert::alert_box};

pub(crate) const COOKIE_FLASH: &str = "flash";

/// Whether a flash message reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Error,
}

/// A message to show the user on the next page they load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// Render the message as a dismissable banner.
    pub fn into_html(self) -> Markup {
        html! {
            div id="flash" class="w-full max-w-screen-xl mx-auto px-4"
            {
                (alert_box(self.kind == FlashKind::Success, &self.message, None))
            }
        }
    }
}

/// Store `flash` in `jar`, replacing any message that has not been shown yet.
///
/// # Errors
/// Returns [Error::JSONSerializationError] if the message cannot be encoded.
pub fn set_flash(jar: PrivateCookieJar, flash: &Flash) -> Result<PrivateCookieJar, Error> {
    let value = serde_json::to_string(flash)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_FLASH, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Remove the pending message from `jar` and return it.
///
/// A cookie that cannot be decoded is removed and ignored.
pub fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(COOKIE_FLASH) else {
        return (jar, None);
    };

    let flash = match serde_json::from_str(cookie.value_trimmed()) {
        Ok(flash) => Some(flash),
        Err(error) => {
            tracing::warn!("discarding malformed flash cookie: {error}");
            None
        }
    };

    (jar.remove(Cookie::build(COOKIE_FLASH).path("/")), flash)
}
