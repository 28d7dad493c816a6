use std::{
    error::Error,
    io::{self},
    path::Path,
    process::exit,
};

use clap::Parser;
use email_address::EmailAddress;
use rusqlite::Connection;

use expense_tracker_rs::{
    PasswordHash, User, ValidatedPassword, get_user_by_email, update_password,
};

/// A utility for changing the password for a registered user.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The email address the user registered with.
    #[arg(long)]
    email: String,
}

/// Replace the password of a registered user.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);
    validate_db_path(db_path);

    let email: EmailAddress = match args.email.parse() {
        Ok(email) => email,
        Err(error) => {
            print_error(format!("Invalid email address: {error}"));
            exit(1);
        }
    };

    let conn = Connection::open(db_path)?;
    let user = get_user(&email, &conn);
    println!("Resetting password for {}", user.email);

    let password_hash = match get_new_password_hash(&user) {
        Some(password_hash) => password_hash,
        None => return Ok(()),
    };

    update_password(user.id, &password_hash, &conn)?;
    println!("Password updated successfully!");

    Ok(())
}

fn get_user(email: &EmailAddress, conn: &Connection) -> User {
    match get_user_by_email(email, conn) {
        Ok(user) => user,
        Err(error) => {
            print_error(format!("Could not find a user with the email {email}: {error}"));
            exit(1);
        }
    }
}

fn validate_db_path(db_path: &Path) {
    match db_path.extension() {
        None => {
            print_error("Database path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            print_error("Database path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if !db_path.is_file() {
        print_error(format!("File does not exist at {db_path:#?}!"));
        exit(1);
    }
}

fn prompt(message: &str) -> Option<String> {
    match rpassword::prompt_password(message) {
        Ok(string) => Some(string),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => {
            print_error(format!("Could not read password from stdin: {error}"));
            None
        }
    }
}

fn get_new_password_hash(user: &User) -> Option<PasswordHash> {
    loop {
        println!();

        let first_password = prompt("Enter a new password: ")?;

        let validated_password = match ValidatedPassword::new(&first_password, &[user.email.as_str()]) {
            Ok(password) => password,
            Err(error) => {
                print_error(error);
                continue;
            }
        };

        let second_password = prompt("Enter the same password again: ")?;

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => {
                print_error(format!("Could not hash password: {error}. Try again."));
                continue;
            }
        }
    }
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
