//! The analytics view of the transactions page.
//!
//! Summarizes the transactions selected by the current filters: counts and
//! turnover split by type, per-category breakdowns, and ECharts
//! visualizations rendered from JSON configuration generated server-side.

use std::collections::BTreeMap;

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    datatype::DataPointItem,
    element::{AxisType, ItemStyle, Tooltip, Trigger},
    series::{Bar, Pie},
};
use maud::{Markup, PreEscaped, html};
use time::Date;

use crate::{
    endpoints,
    html::{
        HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency,
    },
    navigation::NavBar,
};

use super::{Transaction, TransactionType, transactions_page::TransactionsQuery};

const ECHARTS_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// The total amount and number of transactions in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category name.
    pub category: String,
    /// The sum of the amounts in this category.
    pub total: f64,
    /// The number of transactions in this category.
    pub count: usize,
}

/// Aggregate statistics for a set of transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsSummary {
    /// The number of income transactions.
    pub income_count: usize,
    /// The number of expense transactions.
    pub expense_count: usize,
    /// The sum of all income amounts.
    pub income_total: f64,
    /// The sum of all expense amounts.
    pub expense_total: f64,
    /// Income totals per category, largest first.
    pub income_categories: Vec<CategoryTotal>,
    /// Expense totals per category, largest first.
    pub expense_categories: Vec<CategoryTotal>,
}

impl AnalyticsSummary {
    /// Summarize `transactions`, which should already have the page filters
    /// applied.
    pub fn new(transactions: &[Transaction]) -> Self {
        let mut income_count = 0;
        let mut expense_count = 0;
        let mut income_total = 0.0;
        let mut expense_total = 0.0;
        let mut income_by_category: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        let mut expense_by_category: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

        for transaction in transactions {
            match transaction.transaction_type {
                TransactionType::Income => {
                    income_count += 1;
                    income_total += transaction.amount;
                    let entry = income_by_category
                        .entry(transaction.category.as_str())
                        .or_default();
                    entry.0 += transaction.amount;
                    entry.1 += 1;
                }
                TransactionType::Expense => {
                    expense_count += 1;
                    expense_total += transaction.amount;
                    let entry = expense_by_category
                        .entry(transaction.category.as_str())
                        .or_default();
                    entry.0 += transaction.amount;
                    entry.1 += 1;
                }
            }
        }

        Self {
            income_count,
            expense_count,
            income_total,
            expense_total,
            income_categories: sort_categories(income_by_category),
            expense_categories: sort_categories(expense_by_category),
        }
    }

    /// The number of transactions in the summary.
    pub fn transaction_count(&self) -> usize {
        self.income_count + self.expense_count
    }

    /// The combined value of all income and expenses.
    pub fn turnover(&self) -> f64 {
        self.income_total + self.expense_total
    }

    /// The share of transactions that are income, as a percentage.
    pub fn income_count_percent(&self) -> f64 {
        percent(self.income_count as f64, self.transaction_count() as f64)
    }

    /// The share of transactions that are expenses, as a percentage.
    pub fn expense_count_percent(&self) -> f64 {
        percent(self.expense_count as f64, self.transaction_count() as f64)
    }

    /// The share of turnover that is income, as a percentage.
    pub fn income_total_percent(&self) -> f64 {
        percent(self.income_total, self.turnover())
    }

    /// The share of turnover that is expenses, as a percentage.
    pub fn expense_total_percent(&self) -> f64 {
        percent(self.expense_total, self.turnover())
    }
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole == 0.0 { 0.0 } else { part / whole * 100.0 }
}

fn sort_categories(by_category: BTreeMap<&str, (f64, usize)>) -> Vec<CategoryTotal> {
    let mut categories: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category: category.to_owned(),
            total,
            count,
        })
        .collect();

    categories.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            // Tie-break equal totals by name so the order is deterministic.
            .then_with(|| a.category.cmp(&b.category))
    });

    categories
}

/// An analytics chart with its HTML container ID and ECharts configuration.
struct AnalyticsChart {
    /// The HTML element ID to use for the chart (kebab-case)
    id: &'static str,
    /// The ECharts configuration as a JSON string
    options: String,
}

fn expense_categories_chart(summary: &AnalyticsSummary) -> Chart {
    let data: Vec<DataPointItem> = summary
        .expense_categories
        .iter()
        .map(|category| DataPointItem::new(category.total).name(category.category.clone()))
        .collect();

    Chart::new()
        .title(Title::new().text("Expenses by category"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().bottom("0%"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius("55%")
                .data(data),
        )
}

fn income_expense_chart(summary: &AnalyticsSummary) -> Chart {
    Chart::new()
        .title(Title::new().text("Income vs expenses"))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(vec!["Income", "Expenses"]),
        )
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(
            Bar::new()
                .name("Total")
                .item_style(ItemStyle::new().color("#3b82f6"))
                .data(vec![summary.income_total, summary.expense_total]),
        )
}

/// Generates JavaScript initialization code for the analytics charts.
fn charts_script(charts: &[AnalyticsChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

fn stat_card(label: &str, value: String, detail: String) -> Markup {
    html! {
        div class="rounded bg-gray-50 dark:bg-gray-800 p-4 flex flex-col gap-1"
        {
            span class="text-sm text-gray-500 dark:text-gray-400" { (label) }
            span class="text-2xl font-bold" data-stat=(label) { (value) }
            span class="text-xs text-gray-500 dark:text-gray-400" { (detail) }
        }
    }
}

fn category_table(title: &str, categories: &[CategoryTotal], type_total: f64) -> Markup {
    html! {
        section class="rounded bg-gray-50 dark:bg-gray-800 overflow-x-auto"
        {
            h2 class="px-6 pt-4 font-semibold" { (title) }

            table class="w-full my-2 text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-3 text-right" { "Count" }
                        th scope="col" class="px-6 py-3 text-right" { "Total" }
                        th scope="col" class="px-6 py-3 text-right" { "Share" }
                    }
                }

                tbody
                {
                    @for category in categories {
                        tr class=(TABLE_ROW_STYLE) data-category-row="true"
                        {
                            td class=(TABLE_CELL_STYLE) { (category.category) }
                            td class="px-6 py-4 text-right" { (category.count) }
                            td class="px-6 py-4 text-right tabular-nums"
                            {
                                (format_currency(category.total))
                            }
                            td class="px-6 py-4 text-right"
                            {
                                (format!("{:.1}%", percent(category.total, type_total)))
                            }
                        }
                    }

                    @if categories.is_empty() {
                        tr
                        {
                            td colspan="4" data-empty-state="true" class="px-6 py-4 text-center"
                            {
                                "No matching transactions."
                            }
                        }
                    }
                }
            }
        }
    }
}

pub(crate) fn analytics_view(
    summary: &AnalyticsSummary,
    query: &TransactionsQuery,
    today: Date,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let charts = [
        AnalyticsChart {
            id: "expense-categories-chart",
            options: expense_categories_chart(summary).to_string(),
        },
        AnalyticsChart {
            id: "income-expense-chart",
            options: income_expense_chart(summary).to_string(),
        },
    ];
    let head_elements = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
        charts_script(&charts),
    ];

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-6xl lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }
                }

                (super::view::filter_bar(query, today))

                div class="grid grid-cols-1 sm:grid-cols-2 xl:grid-cols-4 gap-4"
                {
                    (stat_card(
                        "Income transactions",
                        summary.income_count.to_string(),
                        format!("{:.1}% of transactions", summary.income_count_percent()),
                    ))
                    (stat_card(
                        "Expense transactions",
                        summary.expense_count.to_string(),
                        format!("{:.1}% of transactions", summary.expense_count_percent()),
                    ))
                    (stat_card(
                        "Total income",
                        format_currency(summary.income_total),
                        format!("{:.1}% of turnover", summary.income_total_percent()),
                    ))
                    (stat_card(
                        "Total expenses",
                        format_currency(summary.expense_total),
                        format!("{:.1}% of turnover", summary.expense_total_percent()),
                    ))
                }

                div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                {
                    @for chart in &charts {
                        div
                            id=(chart.id)
                            class="min-h-[380px] rounded bg-gray-50 dark:bg-gray-800"
                        {}
                    }
                }

                div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                {
                    (category_table(
                        "Expenses by category",
                        &summary.expense_categories,
                        summary.expense_total,
                    ))
                    (category_table(
                        "Income by category",
                        &summary.income_categories,
                        summary.income_total,
                    ))
                }
            }
        }
    };

    base("Analytics", &head_elements, &content)
}
