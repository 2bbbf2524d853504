//! HTML rendering for the transactions page table view.

use axum::http::Uri;
use maud::{Markup, html};
use time::Date;

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TYPE_BADGE_STYLE, base, format_currency,
    },
    navigation::NavBar,
    pagination::{PAGE_SIZE_OPTIONS, PaginationIndicator},
};

use super::{
    Transaction, TransactionType,
    filter::{FrequencyPreset, SortOrder, TypeFilter},
    transactions_page::{TransactionsQuery, ViewMode},
};

/// The max number of characters to display in the description column before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_CHARS: usize = 32;

pub(crate) fn transactions_view(
    transactions: &[Transaction],
    total_count: usize,
    query: &TransactionsQuery,
    indicators: &[PaginationIndicator],
    today: Date,
) -> Markup {
    let create_transaction_route = Uri::from_static(endpoints::NEW_TRANSACTION_VIEW);
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let redirect_param = build_redirect_param(&query.to_url(endpoints::TRANSACTIONS_VIEW));
    let redirect_param = redirect_param.as_deref();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-6xl lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(create_transaction_route) class=(LINK_STYLE)
                    {
                        "Add New"
                    }
                }

                (filter_bar(query, today))

                section class="rounded bg-gray-50 dark:bg-gray-800 overflow-x-auto"
                {
                    table class="w-full my-2 text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    (sort_header(query, "Date", SortOrder::DateAsc, SortOrder::DateDesc))
                                }
                                th scope="col" class="px-6 py-3 text-right"
                                {
                                    (sort_header(query, "Amount", SortOrder::AmountAsc, SortOrder::AmountDesc))
                                }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Reference" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row_view(transaction, redirect_param))
                            }

                            @if transactions.is_empty() {
                                tr
                                {
                                    td
                                        colspan="7"
                                        data-empty-state="true"
                                        class="px-6 py-4 text-center"
                                    {
                                        "No matching transactions."
                                    }
                                }
                            }
                        }
                    }
                }

                (pagination_view(indicators, total_count, query))
            }
        }
    };

    base("Transactions", &[], &content)
}

/// The filter controls shared by the table and analytics views.
///
/// Submitting the form resets the page number so a narrower filter never
/// lands past the last page.
pub(crate) fn filter_bar(query: &TransactionsQuery, today: Date) -> Markup {
    let transactions_route = Uri::from_static(endpoints::TRANSACTIONS_VIEW);

    html! {
        form
            method="get"
            action=(transactions_route)
            class="w-full rounded bg-gray-50 dark:bg-gray-800 p-4 flex flex-wrap items-end gap-4"
        {
            input type="hidden" name="sort" value=(query.sort.as_str());
            input type="hidden" name="page" value="1";

            div
            {
                label for="frequency" class=(FORM_LABEL_STYLE) { "Period" }
                select id="frequency" name="frequency" class=(FORM_SELECT_STYLE)
                {
                    @for preset in FrequencyPreset::all() {
                        option
                            value=(preset.as_str())
                            selected[preset == query.frequency]
                        {
                            (preset.label())
                        }
                    }
                }
            }

            div
            {
                label for="start" class=(FORM_LABEL_STYLE) { "From" }
                input
                    type="date"
                    id="start"
                    name="start"
                    class=(FORM_TEXT_INPUT_STYLE)
                    max=(today)
                    value=[query.start];
            }

            div
            {
                label for="end" class=(FORM_LABEL_STYLE) { "To" }
                input
                    type="date"
                    id="end"
                    name="end"
                    class=(FORM_TEXT_INPUT_STYLE)
                    max=(today)
                    value=[query.end];
            }

            div
            {
                label for="type_" class=(FORM_LABEL_STYLE) { "Type" }
                select id="type_" name="type_" class=(FORM_SELECT_STYLE)
                {
                    @for type_filter in TypeFilter::all() {
                        option
                            value=(type_filter.as_str())
                            selected[type_filter == query.type_filter]
                        {
                            (type_filter.label())
                        }
                    }
                }
            }

            div class="grow"
            {
                label for="keyword" class=(FORM_LABEL_STYLE) { "Search" }
                input
                    type="search"
                    id="keyword"
                    name="keyword"
                    class=(FORM_TEXT_INPUT_STYLE)
                    placeholder="Description, category, amount..."
                    value=(query.keyword);
            }

            div
            {
                label for="per_page" class=(FORM_LABEL_STYLE) { "Per page" }
                select id="per_page" name="per_page" class=(FORM_SELECT_STYLE)
                {
                    @for page_size in PAGE_SIZE_OPTIONS {
                        option
                            value=(page_size)
                            selected[page_size == query.per_page]
                        {
                            (page_size)
                        }
                    }
                }
            }

            div
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
            }

            (view_toggle(query))
        }
    }
}

fn view_toggle(query: &TransactionsQuery) -> Markup {
    let toggle_link = |view: ViewMode| {
        let is_active = view == query.view;
        let href = query.clone().with_view(view).with_page(1).to_url(endpoints::TRANSACTIONS_VIEW);

        html! {
            @if is_active {
                span
                    class="px-3 py-2 rounded bg-gray-200 dark:bg-gray-700 text-gray-900 dark:text-white text-sm"
                    data-active-view=(view.as_str())
                {
                    (view.label())
                }
            } @else {
                a
                    href=(href)
                    class="px-3 py-2 rounded text-blue-600 hover:underline text-sm"
                {
                    (view.label())
                }
            }
        }
    };

    html! {
        div class="flex items-center gap-1 ml-auto"
        {
            (toggle_link(ViewMode::Table))
            (toggle_link(ViewMode::Analytics))
        }
    }
}

fn sort_header(
    query: &TransactionsQuery,
    label: &str,
    ascending: SortOrder,
    descending: SortOrder,
) -> Markup {
    // Clicking the active column flips the direction, otherwise sort the
    // clicked column newest or largest first.
    let (target, indicator) = if query.sort == descending {
        (ascending, Some("▼"))
    } else if query.sort == ascending {
        (descending, Some("▲"))
    } else {
        (descending, None)
    };
    let href = query
        .clone()
        .with_sort(target)
        .with_page(1)
        .to_url(endpoints::TRANSACTIONS_VIEW);

    html! {
        a href=(href) class="inline-flex items-center gap-1 hover:underline"
        {
            (label)
            @if let Some(indicator) = indicator {
                span aria-hidden="true" { (indicator) }
            }
        }
    }
}

fn type_badge(transaction_type: TransactionType) -> Markup {
    let color_class = match transaction_type {
        TransactionType::Income => "bg-green-100 text-green-800 dark:bg-green-900 dark:text-green-300",
        TransactionType::Expense => "bg-red-100 text-red-800 dark:bg-red-900 dark:text-red-300",
    };
    let label = match transaction_type {
        TransactionType::Income => "Income",
        TransactionType::Expense => "Expense",
    };

    html! {
        span class={ (TYPE_BADGE_STYLE) " " (color_class) } { (label) }
    }
}

fn amount_class(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "text-green-700 dark:text-green-300",
        TransactionType::Expense => "text-red-700 dark:text-red-300",
    }
}

fn transaction_row_view(transaction: &Transaction, redirect_param: Option<&str>) -> Markup {
    let amount_str = format_currency(transaction.amount);
    let amount_class = amount_class(transaction.transaction_type);
    let (description, tooltip) =
        format_description(transaction.description.as_deref().unwrap_or_default());
    let edit_url = match redirect_param {
        Some(param) => format!(
            "{}?{param}",
            format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id.as_i64())
        ),
        None => format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id.as_i64()),
    };
    let delete_url = format_endpoint(endpoints::TRANSACTION, transaction.id.as_i64());
    let confirm_message = format!(
        "Are you sure you want to delete the {} transaction of {amount_str} on {}? \
        This cannot be undone.",
        transaction.transaction_type, transaction.date
    );

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(transaction.date) { (transaction.date) }
            }
            td class={ "px-6 py-4 text-right tabular-nums " (amount_class) } { (amount_str) }
            td class=(TABLE_CELL_STYLE) { (transaction.category) }
            td class=(TABLE_CELL_STYLE) { (type_badge(transaction.transaction_type)) }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(ref reference) = transaction.reference {
                    (reference)
                } @else {
                    span class="text-gray-400 dark:text-gray-500" { "-" }
                }
            }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        class=(BUTTON_DELETE_STYLE)
                        hx-delete=(delete_url)
                        hx-target="closest tr"
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                        hx-confirm=(confirm_message)
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

/// The markup swapped in for a table row when its transaction is deleted.
pub(crate) fn empty_transaction_row() -> Markup {
    html! {
        tr hidden {}
    }
}

fn pagination_view(
    indicators: &[PaginationIndicator],
    total_count: usize,
    query: &TransactionsQuery,
) -> Markup {
    let page_url =
        |page: u64| query.clone().with_page(page).to_url(endpoints::TRANSACTIONS_VIEW);
    let first_item = if total_count == 0 {
        0
    } else {
        (query.page - 1) * query.per_page + 1
    };
    let last_item = (query.page * query.per_page).min(total_count as u64);
    let page_link_class = "flex items-center justify-center px-3 h-8 leading-tight \
        text-gray-500 bg-white border border-gray-300 hover:bg-gray-100 \
        hover:text-gray-700 dark:bg-gray-800 dark:border-gray-700 \
        dark:text-gray-400 dark:hover:bg-gray-700 dark:hover:text-white";

    html! {
        nav
            class="flex flex-wrap items-center justify-between gap-2 w-full"
            aria-label="Transaction table pages"
        {
            span class="text-sm text-gray-500 dark:text-gray-400"
            {
                "Showing " (first_item) "-" (last_item) " of " (total_count)
            }

            ul class="inline-flex -space-x-px text-sm h-8"
            {
                @for indicator in indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::BackButton(page) => {
                                a href=(page_url(*page)) class=(page_link_class) { "Prev" }
                            }
                            PaginationIndicator::Page(page) => {
                                a href=(page_url(*page)) class=(page_link_class) { (page) }
                            }
                            PaginationIndicator::CurrPage(page) => {
                                span
                                    aria-current="page"
                                    class="flex items-center justify-center px-3 h-8 text-blue-600
                                        border border-gray-300 bg-blue-50 hover:bg-blue-100
                                        hover:text-blue-700 dark:border-gray-700 dark:bg-gray-700
                                        dark:text-white"
                                {
                                    (page)
                                }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class=(page_link_class) { "..." }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a href=(page_url(*page)) class=(page_link_class) { "Next" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.chars().count();

    if description_length <= MAX_DESCRIPTION_CHARS {
        (description.to_owned(), None)
    } else {
        let truncated: String = description.chars().take(MAX_DESCRIPTION_CHARS - 3).collect();
        let truncated = truncated + "...";
        (truncated, Some(description))
    }
}

fn build_redirect_param(redirect_url: &str) -> Option<String> {
    serde_urlencoded::to_string([("redirect_url", &redirect_url)])
        .inspect_err(|error| {
            tracing::error!(
                "Could not set redirect URL {redirect_url} due to encoding error: {error}"
            );
        })
        .ok()
}
