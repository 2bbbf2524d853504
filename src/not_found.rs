//! Defines the route handler for the 404 not found page.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

pub fn get_404_not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(
            error_view(
                "Not Found",
                "404",
                "Sorry, we could not find that page.",
                "Check the URL or head back to the transactions page.",
            )
            .into_string(),
        ),
    )
        .into_response()
}
