//! Database query helpers for the transactions page.

use std::ops::RangeInclusive;

use rusqlite::Connection;
use time::Date;

use crate::{Error, user::UserID};

use super::{
    core::map_transaction_row,
    filter::TypeFilter,
    Transaction,
};

/// Get a user's transactions with dates inside an inclusive range, optionally
/// restricted to one transaction type.
///
/// The rows come back ordered by date and then ID. The caller applies the
/// keyword filter and the requested sort order afterwards.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Transaction row mapping fails
pub(crate) fn get_transactions_in_range(
    user_id: UserID,
    date_range: RangeInclusive<Date>,
    type_filter: TypeFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let type_clause = match type_filter.transaction_type() {
        Some(_) => "AND type = ?4",
        None => "",
    };

    // Sort by date, and then ID to keep transaction order stable after updates
    let query = format!(
        "SELECT id, user_id, amount, type, category, date, reference, description \
        FROM \"transaction\" \
        WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3 {type_clause} \
        ORDER BY date ASC, id ASC",
    );

    let mut statement = connection.prepare(&query)?;

    let rows = match type_filter.transaction_type() {
        Some(transaction_type) => statement.query_map(
            (
                user_id.as_i64(),
                date_range.start().to_string(),
                date_range.end().to_string(),
                transaction_type.as_str(),
            ),
            map_transaction_row,
        )?,
        None => statement.query_map(
            (
                user_id.as_i64(),
                date_range.start().to_string(),
                date_range.end().to_string(),
            ),
            map_transaction_row,
        )?,
    };

    rows.map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}
