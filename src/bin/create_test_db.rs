use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::Arc;

use clap::Parser;
use rusqlite::Connection;
use time::Duration;

use expense_tracker_rs::{
    AppState, CategoryName, Clock, NewExpense, PasswordHash, ReportConfig,
    SystemClock, ValidatedPassword, create_user,
};

/// A utility for creating a test database for the expense_tracker_rs server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The canonical timezone used to date the sample expenses.
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,
}

/// Title, amount, category and how many days ago each sample expense happened.
const SAMPLE_EXPENSES: [(&str, f64, &str, i64); 14] = [
    ("Groceries", 84.20, "Food", 1),
    ("Bus pass", 45.00, "Transport", 3),
    ("Cinema tickets", 32.00, "Entertainment", 6),
    ("Electricity bill", 121.35, "Utilities", 9),
    ("Rent", 950.00, "Rent", 12),
    ("Coffee beans", 18.50, "Food", 17),
    ("Concert", 110.00, "Entertainment", 26),
    ("Groceries", 96.75, "Food", 33),
    ("Rent", 950.00, "Rent", 42),
    ("Internet", 69.99, "Utilities", 45),
    ("Taxi", 27.40, "Transport", 51),
    ("Birthday present", 55.00, "Other", 58),
    ("Rent", 950.00, "Rent", 72),
    ("Dinner out", 64.30, "Food", 80),
];

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

    let clock = SystemClock::new(&args.timezone)?;
    let today = clock.today();

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    let state = AppState::new(
        conn,
        "create_test_db",
        Arc::new(clock),
        ReportConfig::default(),
    )?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|error| format!("could not lock the database: {error}"))?;
        create_user(&"test@example.com".parse()?, password_hash, &connection)?
    };

    println!("Adding {} sample expenses...", SAMPLE_EXPENSES.len());

    for (title, amount, category, days_ago) in SAMPLE_EXPENSES {
        let expense = NewExpense::new(
            title,
            Some(amount),
            CategoryName::new(category)?,
            today - Duration::days(days_ago),
            today,
        )?;
        state.expense_store.add(user.id, expense)?;
    }

    println!("Success! Log in with test@example.com and the password 'test'.");

    Ok(())
}
