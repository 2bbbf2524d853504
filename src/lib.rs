//! Spendlog is a web app for recording and reviewing your day-to-day spending.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use time::Date;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod database_id;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod log_in;
mod log_out;
mod logging;
mod navigation;
mod not_found;
mod pagination;
mod password;
mod register_user;
mod routing;
mod timezone;
mod transaction;
mod user;

pub use app_state::{AppState, create_cookie_key};
pub use auth::DEFAULT_COOKIE_DURATION;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use transaction::{Transaction, TransactionType, create_transaction};
pub use user::{User, UserID, create_user, get_user_by_email};

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid email and password combination.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Either the user ID or expiry cookie is missing from the cookie jar in
    /// the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// There was an error parsing or formatting the expiry date time in the
    /// auth cookie.
    #[error("could not parse or format the auth cookie expiry date-time")]
    DateError,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The specified email address is already taken by another user.
    #[error("a user with this email already exists in the database")]
    DuplicateEmail,

    /// A date in the future was used to create or update a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// A zero or negative amount was used to create or update a transaction.
    ///
    /// The sign of a transaction is determined by its type, so amounts must be
    /// positive.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    InvalidAmount(f64),

    /// An empty category was used to create or update a transaction.
    ///
    /// Every transaction belongs to a category, so blank or whitespace-only
    /// categories are not allowed.
    #[error("the category must not be empty")]
    EmptyCategory,

    /// A string other than "income" or "expense" was parsed as a transaction type.
    #[error("\"{0}\" is not a valid transaction type")]
    InvalidTransactionType(String),

    /// The user ID used to create a transaction did not match a valid user.
    #[error("the user ID {0} does not refer to a valid user")]
    InvalidUser(UserID),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => alert::render_alert(
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::error(
                    "Invalid Timezone Settings",
                    &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings \
                        and ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                ),
            ),
            Error::FutureDate(date) => alert::render_alert(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid transaction date",
                    &format!(
                        "{date} is a date in the future, which is not allowed. \
                        Change the date to today or earlier."
                    ),
                ),
            ),
            Error::InvalidAmount(amount) => alert::render_alert(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid amount",
                    &format!("{amount} is not a valid amount. Enter an amount greater than zero."),
                ),
            ),
            Error::EmptyCategory => alert::render_alert(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Missing category",
                    "The category must not be empty. Enter a category for the transaction.",
                ),
            ),
            Error::UpdateMissingTransaction => alert::render_alert(
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not update transaction",
                    "The transaction could not be found.",
                ),
            ),
            Error::DeleteMissingTransaction => alert::render_alert(
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not delete transaction",
                    "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted.",
                ),
            ),
            _ => alert::render_alert(
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                ),
            ),
        }
    }
}
