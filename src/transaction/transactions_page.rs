//! Defines the route handler for the page that lists transactions.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error, endpoints,
    pagination::{PAGE_SIZE_OPTIONS, PaginationConfig, compute_page_count, create_pagination_indicators},
    timezone::now_local,
    user::UserID,
};

use super::{
    analytics::{AnalyticsSummary, analytics_view},
    filter::{
        FrequencyPreset, SortOrder, TypeFilter, matches_keyword, resolve_date_range,
        sort_transactions,
    },
    query::get_transactions_in_range,
    view::transactions_view,
};

/// Whether the transactions page shows the table or the analytics summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// The paginated transaction table.
    #[default]
    Table,
    /// Counts, totals and charts for the selected transactions.
    Analytics,
}

impl ViewMode {
    /// The value used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Table => "table",
            ViewMode::Analytics => "analytics",
        }
    }

    /// The human readable name shown on the view toggle.
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Table => "Table",
            ViewMode::Analytics => "Analytics",
        }
    }
}

/// The raw query parameters for the transactions page.
///
/// Every field is optional so that a bare `/transactions` URL works. Missing
/// fields are filled with defaults by [normalize_query], which redirects to
/// the canonical URL so the address bar always reflects the full state.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsPageQuery {
    /// The selected time window preset.
    pub frequency: Option<FrequencyPreset>,
    /// The start date for a custom time window.
    pub start: Option<Date>,
    /// The end date for a custom time window.
    pub end: Option<Date>,
    /// The selected transaction type filter.
    pub type_: Option<TypeFilter>,
    /// The keyword to search for.
    pub keyword: Option<String>,
    /// The selected sort column and direction.
    pub sort: Option<SortOrder>,
    /// Whether to show the table or the analytics summary.
    pub view: Option<ViewMode>,
    /// The page of the transaction table to show.
    pub page: Option<u64>,
    /// The number of transactions per page.
    pub per_page: Option<u64>,
}

/// Validated page options after defaults have been applied.
///
/// This is the source of truth for behavior: the frequency has been
/// downgraded if a custom range was missing a bound, and the page size is one
/// of the selectable options.
struct NormalizedQuery {
    frequency: FrequencyPreset,
    start: Option<Date>,
    end: Option<Date>,
    type_filter: TypeFilter,
    keyword: String,
    sort: SortOrder,
    view: ViewMode,
    page: u64,
    per_page: u64,
}

/// URL encoding helper for transactions query params.
///
/// This is used to build consistent links and redirect URLs from already
/// normalized values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct TransactionsQuery {
    pub frequency: FrequencyPreset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Date>,
    #[serde(rename = "type_")]
    pub type_filter: TypeFilter,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub keyword: String,
    pub sort: SortOrder,
    pub view: ViewMode,
    pub page: u64,
    pub per_page: u64,
}

impl TransactionsQuery {
    fn from_normalized(options: &NormalizedQuery) -> Self {
        Self {
            frequency: options.frequency,
            start: options.start,
            end: options.end,
            type_filter: options.type_filter,
            keyword: options.keyword.clone(),
            sort: options.sort,
            view: options.view,
            page: options.page,
            per_page: options.per_page,
        }
    }

    pub(crate) fn with_page(self, page: u64) -> Self {
        Self { page, ..self }
    }

    pub(crate) fn with_sort(self, sort: SortOrder) -> Self {
        Self { sort, ..self }
    }

    pub(crate) fn with_view(self, view: ViewMode) -> Self {
        Self { view, ..self }
    }

    pub(crate) fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(self)
            .inspect_err(|error| {
                tracing::error!("could not encode transactions page query: {error}");
            })
            .unwrap_or_default()
    }

    pub(crate) fn to_url(&self, route: &str) -> String {
        format!("{route}?{}", self.to_query_string())
    }
}

enum QueryDecision {
    Redirect(String),
    Normalized(NormalizedQuery),
}

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for reading transactions.
    db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    local_timezone: String,
    /// The defaults and limits for paging the transaction table.
    pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Render an overview of the user's transactions.
///
/// Requests with missing query params are redirected to the canonical URL
/// with defaults filled in, so links and reloads always carry the full page
/// state.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Extension(user_id): Extension<UserID>,
    Query(query_params): Query<TransactionsPageQuery>,
) -> Result<Response, Error> {
    let today = now_local(&state.local_timezone)?.date();
    let options = match normalize_query(query_params, &state.pagination_config) {
        QueryDecision::Normalized(options) => options,
        QueryDecision::Redirect(redirect_url) => {
            return Ok(Redirect::to(&redirect_url).into_response());
        }
    };

    let date_range = resolve_date_range(options.frequency, options.start, options.end, today);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;
    let mut transactions =
        get_transactions_in_range(user_id, date_range, options.type_filter, &connection)
            .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    drop(connection);

    transactions.retain(|transaction| matches_keyword(transaction, &options.keyword));
    sort_transactions(&mut transactions, options.sort);

    let query = TransactionsQuery::from_normalized(&options);

    match options.view {
        ViewMode::Analytics => {
            let summary = AnalyticsSummary::new(&transactions);
            Ok(analytics_view(&summary, &query, today).into_response())
        }
        ViewMode::Table => {
            let page_count = compute_page_count(transactions.len() as u64, options.per_page);
            // Pages past the end show the last page instead of an empty table.
            let page = options.page.min(page_count);
            let query = query.with_page(page);

            let indicators = create_pagination_indicators(
                page,
                page_count,
                state.pagination_config.max_pages,
            );

            let offset = ((page - 1) * options.per_page) as usize;
            let page_end = (offset + options.per_page as usize).min(transactions.len());
            let page_transactions = &transactions[offset..page_end];

            Ok(transactions_view(
                page_transactions,
                transactions.len(),
                &query,
                &indicators,
                today,
            )
            .into_response())
        }
    }
}

fn normalize_query(
    query: TransactionsPageQuery,
    pagination_config: &PaginationConfig,
) -> QueryDecision {
    let has_missing_params = query.frequency.is_none()
        || query.type_.is_none()
        || query.sort.is_none()
        || query.view.is_none()
        || query.page.is_none()
        || query.per_page.is_none();

    let requested_frequency = query.frequency.unwrap_or_default();
    let (frequency, start, end) = match (requested_frequency, query.start, query.end) {
        (FrequencyPreset::Custom, Some(start), Some(end)) => {
            (FrequencyPreset::Custom, Some(start), Some(end))
        }
        // A custom range missing a bound falls back to the default window.
        (FrequencyPreset::Custom, _, _) => (FrequencyPreset::default(), None, None),
        (frequency, _, _) => (frequency, None, None),
    };

    let requested_page = query.page.unwrap_or(pagination_config.default_page);
    let page = requested_page.max(1);
    let requested_per_page = query.per_page.unwrap_or(pagination_config.default_page_size);
    let per_page = if PAGE_SIZE_OPTIONS.contains(&requested_per_page) {
        requested_per_page
    } else {
        pagination_config.default_page_size
    };

    let normalized = NormalizedQuery {
        frequency,
        start,
        end,
        type_filter: query.type_.unwrap_or_default(),
        keyword: query.keyword.unwrap_or_default(),
        sort: query.sort.unwrap_or_default(),
        view: query.view.unwrap_or_default(),
        page,
        per_page,
    };

    if has_missing_params
        || frequency != requested_frequency
        || page != requested_page
        || per_page != requested_per_page
    {
        let redirect_url =
            TransactionsQuery::from_normalized(&normalized).to_url(endpoints::TRANSACTIONS_VIEW);
        return QueryDecision::Redirect(redirect_url);
    }

    QueryDecision::Normalized(normalized)
}
