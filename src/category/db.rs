//! Database operations for custom categories.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    category::{CategoryId, CategoryName, CustomCategory},
    user::UserID,
};

/// Create a custom category for `user_id` and return it with its generated ID.
pub fn create_category(
    user_id: UserID,
    name: CategoryName,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<CustomCategory, Error> {
    connection.execute(
        "INSERT INTO category (user_id, name, created_at) VALUES (?1, ?2, ?3);",
        (user_id.as_i64(), name.as_ref(), now),
    )?;

    let id = connection.last_insert_rowid();

    Ok(CustomCategory {
        id,
        name,
        created_at: now,
    })
}

/// Retrieve every custom category owned by `user_id`, oldest first.
pub fn get_categories(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<CustomCategory>, Error> {
    connection
        .prepare(
            "SELECT id, name, created_at FROM category
            WHERE user_id = ?1
            ORDER BY created_at ASC, id ASC;",
        )?
        .query_map([user_id.as_i64()], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Delete a custom category. Expenses keep their category name.
///
/// # Errors
/// Returns [Error::DeleteMissingCategory] if the category does not exist or belongs to another user.
pub fn delete_category(
    user_id: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user ON category(user_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<CustomCategory, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(CustomCategory {
        id: row.get(0)?,
        name: CategoryName::new_unchecked(&raw_name),
        created_at: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error, PasswordHash,
        category::CategoryName,
        db::initialize,
        user::{UserID, create_user},
    };

    use super::{create_category, delete_category, get_categories};

    fn get_connection() -> (Connection, UserID) {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        let user = create_user(
            &"test@example.com".parse().expect("invalid email"),
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .expect("Could not create user");

        (connection, user.id)
    }

    #[test]
    fn create_then_list_oldest_first() {
        let (connection, user_id) = get_connection();
        let pets = create_category(
            user_id,
            CategoryName::new_unchecked("Pets"),
            datetime!(2024-01-02 00:00 UTC),
            &connection,
        )
        .expect("Could not create category");
        let travel = create_category(
            user_id,
            CategoryName::new_unchecked("Travel"),
            datetime!(2024-01-01 00:00 UTC),
            &connection,
        )
        .expect("Could not create category");

        let got = get_categories(user_id, &connection).expect("Could not get categories");

        assert_eq!(got, vec![travel, pets]);
    }

    #[test]
    fn delete_missing_category_fails() {
        let (connection, user_id) = get_connection();

        assert_eq!(
            delete_category(user_id, 7, &connection),
            Err(Error::DeleteMissingCategory)
        );
    }

    #[test]
    fn delete_removes_category() {
        let (connection, user_id) = get_connection();
        let pets = create_category(
            user_id,
            CategoryName::new_unchecked("Pets"),
            datetime!(2024-01-02 00:00 UTC),
            &connection,
        )
        .expect("Could not create category");

        delete_category(user_id, pets.id, &connection).expect("Could not delete category");

        assert_eq!(get_categories(user_id, &connection), Ok(vec![]));
    }
}
