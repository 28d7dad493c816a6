//! Checks credentials when users register and sign in.

use email_address::EmailAddress;
use rusqlite::Connection;

use crate::{
    Error, PasswordHash, ValidatedPassword,
    user::{User, create_user, get_user_by_email},
};

fn parse_email(raw_email: &str) -> Result<EmailAddress, Error> {
    raw_email
        .trim()
        .parse()
        .map_err(|_| Error::InvalidEmail(raw_email.trim().to_owned()))
}

/// Register a new user with `email` and `password`.
///
/// `cost` is the bcrypt cost used to hash the password.
///
/// # Errors
///
/// - [Error::InvalidEmail] if `email` is not an email address.
/// - [Error::TooWeak] if `password` is easy to guess.
/// - [Error::DuplicateEmail] if somebody already registered with `email`.
pub fn sign_up(
    email: &str,
    password: &str,
    cost: u32,
    connection: &Connection,
) -> Result<User, Error> {
    let email = parse_email(email)?;
    let password = ValidatedPassword::new(password, &[email.as_str()])?;
    let password_hash = PasswordHash::new(password, cost)?;

    create_user(&email, password_hash, connection)
}

/// Find the user registered with `email` and check their password.
///
/// # Errors
///
/// - [Error::InvalidCredentials] if nobody registered with `email` or the password is wrong.
/// - [Error::HashingError] if the stored hash cannot be checked.
pub fn sign_in(email: &str, password: &str, connection: &Connection) -> Result<User, Error> {
    let email = parse_email(email).map_err(|_| Error::InvalidCredentials)?;

    let user = match get_user_by_email(&email, connection) {
        Ok(user) => user,
        Err(Error::NotFound) => return Err(Error::InvalidCredentials),
        Err(error) => return Err(error),
    };

    match user.password_hash.verify(password) {
        Ok(true) => Ok(user),
        Ok(false) => Err(Error::InvalidCredentials),
        Err(error) => Err(Error::HashingError(error.to_string())),
    }
}
