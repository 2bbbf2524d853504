//! Defines the route handler for the page for creating a new transaction.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, dollar_input_styles, loading_spinner,
    },
    navigation::NavBar,
    timezone::get_local_offset,
};

use super::{
    core::TransactionType,
    form::{TransactionFormDefaults, transaction_form_fields},
};

fn create_transaction_view(max_date: Date) -> Markup {
    let create_transaction_route = endpoints::TRANSACTIONS_API;
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let spinner = loading_spinner();
    let fields = transaction_form_fields(&TransactionFormDefaults {
        transaction_type: TransactionType::Expense,
        amount: None,
        category: None,
        date: max_date,
        reference: None,
        description: None,
        max_date,
        autofocus_amount: true,
    });

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(create_transaction_route)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Transaction" }

                (fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Create Transaction"
                }
            }
        }
    };

    base("Create Transaction", &[dollar_input_styles()], &content)
}

/// The state needed for the create new transaction page.
#[derive(Debug, Clone)]
pub struct CreateTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the page for creating a transaction.
pub async fn get_create_transaction_page(
    State(state): State<CreateTransactionPageState>,
) -> Result<Response, Error> {
    let local_timezone = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone)
    })?;

    let max_date = OffsetDateTime::now_utc().to_offset(local_timezone).date();

    Ok(create_transaction_view(max_date).into_response())
}
