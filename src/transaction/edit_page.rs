//! Defines the route handler for the page for editing an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, dollar_input_styles, loading_spinner,
    },
    navigation::NavBar,
    not_found::get_404_not_found_response,
    timezone::now_local,
    transaction::{Transaction, get_transaction},
    user::UserID,
};

use super::form::{TransactionFormDefaults, transaction_form_fields};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for looking up the transaction.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for the edit transaction page.
#[derive(Debug, Default, Deserialize)]
pub struct EditPageQuery {
    /// The transactions page URL to return to after saving, including the
    /// filter and pagination state the user navigated from.
    pub redirect_url: Option<String>,
}

fn edit_transaction_view(transaction: &Transaction, max_date: Date, redirect_url: &str) -> Markup {
    let mut edit_transaction_route = format_endpoint(endpoints::TRANSACTION, transaction.id.as_i64());

    if !redirect_url.is_empty() {
        let query = serde_urlencoded::to_string([("redirect_url", redirect_url)])
            .unwrap_or_default();
        edit_transaction_route = format!("{edit_transaction_route}?{query}");
    }

    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let spinner = loading_spinner();
    let fields = transaction_form_fields(&TransactionFormDefaults {
        transaction_type: transaction.transaction_type,
        amount: Some(transaction.amount),
        category: Some(&transaction.category),
        date: transaction.date,
        reference: transaction.reference.as_deref(),
        description: transaction.description.as_deref(),
        max_date,
        autofocus_amount: false,
    });

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(edit_transaction_route)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Transaction" }

                (fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Save Changes"
                }
            }
        }
    };

    base("Edit Transaction", &[dollar_input_styles()], &content)
}

/// Renders the page for editing a transaction.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<EditPageQuery>,
) -> Result<Response, Error> {
    let max_date = now_local(&state.local_timezone)?.date();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = match get_transaction(transaction_id, user_id, &connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Ok(get_404_not_found_response()),
        Err(error) => {
            tracing::error!("could not retrieve transaction {transaction_id}: {error}");
            return Err(error);
        }
    };

    let redirect_url = query.redirect_url.unwrap_or_default();

    Ok(edit_transaction_view(&transaction, max_date, &redirect_url).into_response())
}
