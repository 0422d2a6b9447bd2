//! The page shown when a user asks for a row that belongs to someone else.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// A 403 Forbidden page.
pub struct Forbidden;

impl IntoResponse for Forbidden {
    fn into_response(self) -> Response {
        (
            StatusCode::FORBIDDEN,
            Html(
                error_view(
                    "Forbidden",
                    "403",
                    "Unauthorized action.",
                    "You do not have permission to view or change this item.",
                )
                .into_string(),
            ),
        )
            .into_response()
    }
}
