//! Defines the endpoint for updating an existing transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    endpoints,
    timezone::now_local,
    transaction::{Transaction, core::update_transaction},
    user::UserID,
};

use super::create_endpoint::TransactionForm;

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for the edit transaction endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct EditQueryParams {
    /// Where to send the client after a successful update.
    pub redirect_url: Option<String>,
}

/// A route handler for updating a transaction, redirects back to the
/// transactions view the user came from on success.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Query(query_params): Query<EditQueryParams>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let now_local_time = match now_local(&state.local_timezone) {
        Ok(now) => now,
        Err(error) => return error.into_alert_response(),
    };

    if form.date > now_local_time.date() {
        tracing::error!("Tried to update transaction {transaction_id} with a future date");

        return Error::FutureDate(form.date).into_alert_response();
    }

    if form.amount <= 0.0 {
        tracing::error!("Tried to update transaction {transaction_id} with a non-positive amount");

        return Error::InvalidAmount(form.amount).into_alert_response();
    }

    if form.category.trim().is_empty() {
        tracing::error!("Tried to update transaction {transaction_id} with an empty category");

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

    match update_transaction(transaction_id, builder, &connection) {
        Ok(0) => {
            tracing::error!(
                "could not update transaction {transaction_id}: update affected zero rows"
            );
            return Error::UpdateMissingTransaction.into_alert_response();
        }
        Ok(_) => {}
        Err(error) => {
            tracing::error!("could not update transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    }

    let redirect_url = query_params
        .redirect_url
        .unwrap_or(endpoints::TRANSACTIONS_VIEW.to_owned());

    (HxRedirect(redirect_url), StatusCode::SEE_OTHER).into_response()
}
