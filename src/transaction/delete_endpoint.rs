//! Defines the endpoint for deleting a transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    transaction::core::delete_transaction,
    user::UserID,
};

use super::view::empty_transaction_row;

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction.
///
/// The success response replaces the transaction's table row with an empty,
/// hidden row.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_transaction(transaction_id, user_id, &connection) {
        Ok(0) => {
            tracing::error!(
                "could not delete transaction {transaction_id}: delete affected zero rows"
            );
            Error::DeleteMissingTransaction.into_alert_response()
        }
        // The status code has to be 200 OK or HTMX will not swap out the
        // table row.
        Ok(_) => empty_transaction_row().into_response(),
        Err(error) => {
            tracing::error!("could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
