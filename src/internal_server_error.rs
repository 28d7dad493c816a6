//! The page shown when the server cannot complete a request.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use axum_htmx::HxRedirect;

use crate::{endpoints, html::error_view};

/// Renders a 500 page with a description of the problem and how to fix it.
pub struct InternalServerError<'a> {
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_view("Internal Server Error", "500", self.description, self.fix),
        )
            .into_response()
    }
}

/// Route handler for the generic error page.
pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}

/// Send HTMX clients to the generic error page.
pub(crate) fn get_internal_server_error_redirect() -> Response {
    (
        HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
        .into_response()
}
