//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::TransactionId,
    user::UserID,
};

/// The number of rows changed by an UPDATE or DELETE query.
pub type RowsAffected = usize;

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction represents money earned or money spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in, e.g. salary.
    Income,
    /// Money going out, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The string stored in the database and used in forms and query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the user that owns the transaction.
    pub user_id: UserID,
    /// The amount of money spent or earned in this transaction.
    ///
    /// Always positive, the direction is given by `transaction_type`.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    pub transaction_type: TransactionType,
    /// The category the transaction belongs to, e.g. "Groceries", "Salary".
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
    /// An optional reference, e.g. an invoice or receipt number.
    pub reference: Option<String>,
    /// An optional text description of what the transaction was for.
    pub description: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        user_id: UserID,
        amount: f64,
        transaction_type: TransactionType,
        category: &str,
        date: Date,
    ) -> TransactionBuilder {
        TransactionBuilder {
            user_id,
            amount,
            transaction_type,
            category: category.to_owned(),
            date,
            reference: None,
            description: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The required fields are set up front, the optional reference and
/// description can be added with the builder methods. Pass the builder to
/// [create_transaction] to insert the row and get back the stored
/// [Transaction].
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// The monetary amount of the transaction. Always positive.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    pub transaction_type: TransactionType,
    /// The category of the transaction, e.g. "Groceries", "Rent".
    pub category: String,
    /// The date when the transaction occurred. Must not be in the future.
    pub date: Date,
    /// An optional reference such as an invoice number.
    pub reference: Option<String>,
    /// An optional human-readable description.
    pub description: Option<String>,
}

impl TransactionBuilder {
    /// Set the reference for the transaction.
    pub fn reference(mut self, reference: Option<String>) -> Self {
        self.reference = reference;
        self
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidUser] if the builder's user ID does not refer to a
///   registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, amount, type, category, date, reference, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_id, amount, type, category, date, reference, description",
        )?
        .query_row(
            (
                builder.user_id.as_i64(),
                builder.amount,
                builder.transaction_type.as_str(),
                &builder.category,
                builder.date,
                &builder.reference,
                &builder.description,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidUser(builder.user_id),
            error => error.into(),
        })?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// The query is scoped to `user_id` so that users cannot read each other's
/// transactions.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by
///   `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, amount, type, category, date, reference, description
             FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
        )?
        .query_one(
            &[(":id", &id.as_i64()), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Overwrite the stored fields of the transaction `id` with the contents of
/// `builder`.
///
/// The update is scoped to the builder's user ID.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
/// A return value of `Ok(0)` means no transaction with `id` exists for this
/// user.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE \"transaction\"
             SET amount = ?1, type = ?2, category = ?3, date = ?4, reference = ?5, description = ?6
             WHERE id = ?7 AND user_id = ?8",
            (
                builder.amount,
                builder.transaction_type.as_str(),
                &builder.category,
                builder.date,
                &builder.reference,
                &builder.description,
                id.as_i64(),
                builder.user_id.as_i64(),
            ),
        )
        .map_err(|error| error.into())
}

/// Delete the transaction `id` owned by `user_id`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
/// A return value of `Ok(0)` means no transaction with `id` exists for this
/// user.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            (id.as_i64(), user_id.as_i64()),
        )
        .map_err(|error| error.into())
}

/// Get the total number of transactions `user_id` has in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(user_id: UserID, connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE user_id = ?1;",
            (user_id.as_i64(),),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                type TEXT NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                reference TEXT,
                description TEXT,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Composite index used by the transactions page query.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_id: i64 = row.get(0)?;
    let raw_user_id: i64 = row.get(1)?;
    let amount = row.get(2)?;
    let raw_type: String = row.get(3)?;
    let category = row.get(4)?;
    let date = row.get(5)?;
    let reference = row.get(6)?;
    let description = row.get(7)?;

    let transaction_type = raw_type.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("invalid transaction type {raw_type}").into(),
        )
    })?;

    Ok(Transaction {
        id: TransactionId::new(raw_id),
        user_id: UserID::new(raw_user_id),
        amount,
        transaction_type,
        category,
        date,
        reference,
        description,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod database_tests {
    use time::macros::date;

    use crate::{
        Error,
        database_id::TransactionId,
        transaction::{
            Transaction, TransactionType, count_transactions, create_transaction,
            delete_transaction, get_transaction, update_transaction,
        },
        user::UserID,
    };

    use super::test_utils::get_test_connection_and_user;

    #[test]
    fn create_succeeds() {
        let (conn, user_id) = get_test_connection_and_user();
        let amount = 12.3;

        let result = create_transaction(
            Transaction::build(
                user_id,
                amount,
                TransactionType::Expense,
                "Groceries",
                date!(2025 - 10 - 05),
            )
            .reference(Some("INV-001".to_owned()))
            .description(Some("Weekly shop".to_owned())),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.amount, amount);
                assert_eq!(transaction.user_id, user_id);
                assert_eq!(transaction.transaction_type, TransactionType::Expense);
                assert_eq!(transaction.category, "Groceries");
                assert_eq!(transaction.reference.as_deref(), Some("INV-001"));
                assert_eq!(transaction.description.as_deref(), Some("Weekly shop"));
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_fails_on_invalid_user_id() {
        let (conn, _) = get_test_connection_and_user();
        let unknown_user = UserID::new(42);

        let result = create_transaction(
            Transaction::build(
                unknown_user,
                123.45,
                TransactionType::Income,
                "Salary",
                date!(2025 - 10 - 04),
            ),
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidUser(unknown_user)));
    }

    #[test]
    fn get_is_scoped_to_owner() {
        let (conn, user_id) = get_test_connection_and_user();
        let transaction = create_transaction(
            Transaction::build(
                user_id,
                50.0,
                TransactionType::Expense,
                "Transport",
                date!(2025 - 10 - 04),
            ),
            &conn,
        )
        .unwrap();

        let got = get_transaction(transaction.id, user_id, &conn).unwrap();
        assert_eq!(got, transaction);

        let other_user = UserID::new(999);
        assert_eq!(
            get_transaction(transaction.id, other_user, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn update_changes_stored_fields() {
        let (conn, user_id) = get_test_connection_and_user();
        let transaction = create_transaction(
            Transaction::build(
                user_id,
                50.0,
                TransactionType::Expense,
                "Transport",
                date!(2025 - 10 - 04),
            ),
            &conn,
        )
        .unwrap();

        let rows_affected = update_transaction(
            transaction.id,
            Transaction::build(
                user_id,
                75.0,
                TransactionType::Income,
                "Refund",
                date!(2025 - 10 - 05),
            )
            .description(Some("Bus fare refund".to_owned())),
            &conn,
        )
        .unwrap();

        assert_eq!(rows_affected, 1);

        let got = get_transaction(transaction.id, user_id, &conn).unwrap();
        assert_eq!(got.amount, 75.0);
        assert_eq!(got.transaction_type, TransactionType::Income);
        assert_eq!(got.category, "Refund");
        assert_eq!(got.date, date!(2025 - 10 - 05));
        assert_eq!(got.description.as_deref(), Some("Bus fare refund"));
    }

    #[test]
    fn update_missing_transaction_affects_zero_rows() {
        let (conn, user_id) = get_test_connection_and_user();

        let rows_affected = update_transaction(
            TransactionId::new(42),
            Transaction::build(
                user_id,
                75.0,
                TransactionType::Income,
                "Refund",
                date!(2025 - 10 - 05),
            ),
            &conn,
        )
        .unwrap();

        assert_eq!(rows_affected, 0);
    }

    #[test]
    fn delete_removes_row() {
        let (conn, user_id) = get_test_connection_and_user();
        let transaction = create_transaction(
            Transaction::build(
                user_id,
                50.0,
                TransactionType::Expense,
                "Transport",
                date!(2025 - 10 - 04),
            ),
            &conn,
        )
        .unwrap();

        let rows_affected = delete_transaction(transaction.id, user_id, &conn).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(
            get_transaction(transaction.id, user_id, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_is_scoped_to_owner() {
        let (conn, user_id) = get_test_connection_and_user();
        let transaction = create_transaction(
            Transaction::build(
                user_id,
                50.0,
                TransactionType::Expense,
                "Transport",
                date!(2025 - 10 - 04),
            ),
            &conn,
        )
        .unwrap();

        let rows_affected = delete_transaction(transaction.id, UserID::new(999), &conn).unwrap();

        assert_eq!(rows_affected, 0);
        assert!(get_transaction(transaction.id, user_id, &conn).is_ok());
    }

    #[test]
    fn get_count() {
        let (conn, user_id) = get_test_connection_and_user();
        let today = date!(2025 - 10 - 05);
        let want_count = 20;
        for i in 1..=want_count {
            create_transaction(
                Transaction::build(user_id, i as f64, TransactionType::Expense, "Misc", today),
                &conn,
            )
            .expect("Could not create transaction");
        }

        let got_count = count_transactions(user_id, &conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }
}

#[cfg(test)]
mod transaction_type_tests {
    use super::TransactionType;

    #[test]
    fn round_trips_through_string() {
        assert_eq!(
            "income".parse::<TransactionType>().unwrap(),
            TransactionType::Income
        );
        assert_eq!(
            "expense".parse::<TransactionType>().unwrap(),
            TransactionType::Expense
        );
        assert_eq!(TransactionType::Income.to_string(), "income");
        assert_eq!(TransactionType::Expense.to_string(), "expense");
    }

    #[test]
    fn rejects_unknown_string() {
        assert!("transfer".parse::<TransactionType>().is_err());
    }
}
