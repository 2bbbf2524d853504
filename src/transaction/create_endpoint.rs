//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error, endpoints,
    timezone::now_local,
    transaction::{Transaction, core::TransactionType, core::create_transaction},
    user::UserID,
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for creating or updating a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The value of the transaction in dollars. Must be positive.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    pub type_: TransactionType,
    /// The category the transaction belongs to.
    pub category: String,
    /// The date when the transaction occurred.
    pub date: Date,
    /// An optional reference, e.g. an invoice number.
    #[serde(default)]
    pub reference: Option<String>,
    /// An optional text description of the transaction.
    #[serde(default)]
    pub description: Option<String>,
}

/// A route handler for creating a new transaction, redirects to transactions view on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let now_local_time = match now_local(&state.local_timezone) {
        Ok(now) => now,
        Err(error) => return error.into_alert_response(),
    };

    if form.date > now_local_time.date() {
        tracing::error!("Tried to create a transaction with a future date");

        return Error::FutureDate(form.date).into_alert_response();
    }

    if form.amount <= 0.0 {
        tracing::error!("Tried to create a transaction with a non-positive amount");

        return Error::InvalidAmount(form.amount).into_alert_response();
    }

    if form.category.trim().is_empty() {
        tracing::error!("Tried to create a transaction with an empty category");

        return Error::EmptyCategory.into_alert_response();
    }

    let builder = Transaction::build(user_id, form.amount, form.type_, &form.category, form.date)
        .reference(form.reference.filter(|text| !text.is_empty()))
        .description(form.description.filter(|text| !text.is_empty()));

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_transaction(builder, &connection) {
        tracing::error!("could not create transaction: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
