//! Database initialization for the application.

use rusqlite::Connection;

use crate::{Error, transaction::create_transaction_table, user::create_user_table};

/// Create the application tables in the database if they do not exist.
///
/// Also enables foreign key enforcement, which SQLite leaves off by default.
///
/// # Errors
///
/// This function will return an error if any of the SQL queries fail.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    create_user_table(connection)?;
    create_transaction_table(connection)?;

    Ok(())
}
