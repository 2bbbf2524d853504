//! Filtering, searching and sorting for the transactions page.
//!
//! A request selects a time window (a preset number of days or a custom date
//! range) and a transaction type, which are applied in SQL. The keyword
//! search and sorting are applied to the fetched rows.

use std::{cmp::Ordering, ops::RangeInclusive};

use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::transaction::{Transaction, TransactionType};

/// The preset time windows the user can pick from.
///
/// The wire values are the number of days in the window, which keeps URLs
/// short, e.g. `?frequency=30`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrequencyPreset {
    /// The last 7 days including today.
    #[default]
    #[serde(rename = "7")]
    LastWeek,
    /// The last 30 days including today.
    #[serde(rename = "30")]
    LastMonth,
    /// The last 365 days including today.
    #[serde(rename = "365")]
    LastYear,
    /// An explicit start and end date.
    #[serde(rename = "custom")]
    Custom,
}

impl FrequencyPreset {
    /// The value used in query strings and form options.
    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyPreset::LastWeek => "7",
            FrequencyPreset::LastMonth => "30",
            FrequencyPreset::LastYear => "365",
            FrequencyPreset::Custom => "custom",
        }
    }

    /// The human readable name shown in the frequency select.
    pub fn label(&self) -> &'static str {
        match self {
            FrequencyPreset::LastWeek => "Last 1 Week",
            FrequencyPreset::LastMonth => "Last 30 Days",
            FrequencyPreset::LastYear => "Last 1 Year",
            FrequencyPreset::Custom => "Custom",
        }
    }

    /// All presets in the order they appear in the frequency select.
    pub fn all() -> [FrequencyPreset; 4] {
        [
            FrequencyPreset::LastWeek,
            FrequencyPreset::LastMonth,
            FrequencyPreset::LastYear,
            FrequencyPreset::Custom,
        ]
    }
}

/// Resolve a frequency preset into an inclusive date range ending today.
///
/// The custom preset uses `custom_start` and `custom_end` (swapped if they
/// are in the wrong order). If either bound is missing, the default one week
/// window is used instead.
pub fn resolve_date_range(
    preset: FrequencyPreset,
    custom_start: Option<Date>,
    custom_end: Option<Date>,
    today: Date,
) -> RangeInclusive<Date> {
    let last_days = |days: i64| (today - Duration::days(days - 1))..=today;

    match preset {
        FrequencyPreset::LastWeek => last_days(7),
        FrequencyPreset::LastMonth => last_days(30),
        FrequencyPreset::LastYear => last_days(365),
        FrequencyPreset::Custom => match (custom_start, custom_end) {
            (Some(start), Some(end)) if start <= end => start..=end,
            (Some(start), Some(end)) => end..=start,
            _ => last_days(7),
        },
    }
}

/// Restricts the transactions page to one transaction type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    /// Both income and expenses.
    #[default]
    All,
    /// Only income.
    Income,
    /// Only expenses.
    Expense,
}

impl TypeFilter {
    /// The value used in query strings and form options.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Income => "income",
            TypeFilter::Expense => "expense",
        }
    }

    /// The human readable name shown in the type select.
    pub fn label(&self) -> &'static str {
        match self {
            TypeFilter::All => "All",
            TypeFilter::Income => "Income",
            TypeFilter::Expense => "Expense",
        }
    }

    /// All filters in the order they appear in the type select.
    pub fn all() -> [TypeFilter; 3] {
        [TypeFilter::All, TypeFilter::Expense, TypeFilter::Income]
    }

    /// The transaction type this filter selects, if it is not [TypeFilter::All].
    pub fn transaction_type(&self) -> Option<TransactionType> {
        match self {
            TypeFilter::All => None,
            TypeFilter::Income => Some(TransactionType::Income),
            TypeFilter::Expense => Some(TransactionType::Expense),
        }
    }
}

/// The sort column and direction for the transactions table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Oldest first.
    DateAsc,
    /// Newest first.
    #[default]
    DateDesc,
    /// Smallest amount first.
    AmountAsc,
    /// Largest amount first.
    AmountDesc,
}

impl SortOrder {
    /// The value used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::DateAsc => "date-asc",
            SortOrder::DateDesc => "date-desc",
            SortOrder::AmountAsc => "amount-asc",
            SortOrder::AmountDesc => "amount-desc",
        }
    }
}

/// Check whether `transaction` matches the search `keyword`.
///
/// The keyword is trimmed, and an empty keyword matches every transaction.
/// A transaction matches when either:
/// - the keyword is a case-insensitive substring of the description,
///   category or reference, or
/// - the keyword parses as a number and equals the amount exactly, or
/// - the keyword does not parse as a number but is a substring of the
///   amount's decimal string.
pub fn matches_keyword(transaction: &Transaction, keyword: &str) -> bool {
    let keyword = keyword.trim();

    if keyword.is_empty() {
        return true;
    }

    let keyword_lowercase = keyword.to_lowercase();
    let contains_keyword = |text: Option<&str>| {
        text.is_some_and(|text| text.to_lowercase().contains(&keyword_lowercase))
    };

    let text_match = contains_keyword(transaction.description.as_deref())
        || contains_keyword(Some(&transaction.category))
        || contains_keyword(transaction.reference.as_deref());

    let amount_match = match keyword.parse::<f64>() {
        Ok(numeric_keyword) => transaction.amount == numeric_keyword,
        Err(_) => transaction.amount.to_string().contains(keyword),
    };

    text_match || amount_match
}

/// Sort `transactions` in place by the column and direction in `sort_order`.
pub fn sort_transactions(transactions: &mut [Transaction], sort_order: SortOrder) {
    transactions.sort_by(|a, b| {
        let ordering = match sort_order {
            SortOrder::DateAsc => a.date.cmp(&b.date),
            SortOrder::DateDesc => b.date.cmp(&a.date),
            SortOrder::AmountAsc => a.amount.partial_cmp(&b.amount).unwrap_or(Ordering::Equal),
            SortOrder::AmountDesc => b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal),
        };

        // Tie-break on ID to keep the transaction order stable.
        ordering.then(a.id.as_i64().cmp(&b.id.as_i64()))
    });
}
