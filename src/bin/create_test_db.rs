use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use email_address::EmailAddress;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use spendlog::{
    PasswordHash, Transaction, TransactionType, ValidatedPassword, create_transaction,
    create_user, initialize_db,
};

/// A utility for creating a test database for the Spendlog server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;

    let user = create_user(
        "test@example.com".parse::<EmailAddress>()?,
        password_hash,
        &conn,
    )?;

    println!("Creating test transactions...");

    let today = OffsetDateTime::now_utc().date();
    let samples = [
        (3200.0, TransactionType::Income, "Salary", 28, Some("Monthly pay")),
        (87.60, TransactionType::Expense, "Groceries", 21, None),
        (45.00, TransactionType::Expense, "Transport", 14, Some("Bus card top-up")),
        (560.00, TransactionType::Expense, "Rent", 7, None),
        (120.00, TransactionType::Income, "Other", 3, Some("Sold old bike")),
        (18.90, TransactionType::Expense, "Entertainment", 1, None),
    ];

    for (amount, transaction_type, category, days_ago, description) in samples {
        let date = today - Duration::days(days_ago);
        let builder = Transaction::build(user.id, amount, transaction_type, category, date)
            .description(description.map(str::to_owned));

        create_transaction(builder, &conn)?;
    }

    println!("Success!");

    Ok(())
}
