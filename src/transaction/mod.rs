//! Transaction management for the transaction tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - Filtering, sorting and analytics over a user's transactions
//! - View handlers for transaction-related web pages

mod analytics;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod filter;
mod form;
mod query;
mod transactions_page;
mod view;

pub use core::{Transaction, TransactionType, create_transaction_table};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use transactions_page::get_transactions_page;

pub use core::{create_transaction, get_transaction};

#[cfg(test)]
pub use core::{count_transactions, delete_transaction, update_transaction};
