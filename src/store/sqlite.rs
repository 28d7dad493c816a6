//! SQLite backed stores that share one database connection.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    Error,
    category::{
        CategoryId, CategoryName, CategorySet, CustomCategory, create_category, delete_category,
        get_categories,
    },
    clock::Clock,
    expense::{
        Expense, ExpenseId, ExpensePatch, NewExpense, delete_expense, get_expense, get_expenses,
        insert_expense, update_expense,
    },
    store::{CategoryStore, ExpenseStore, Subscription, subscription::Feeds},
    user::UserID,
};

fn lock(connection: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, Error> {
    connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

/// Expenses stored in the `expense` table.
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
    clock: Arc<dyn Clock>,
    feeds: Arc<Feeds<Vec<Expense>>>,
}

impl SQLiteExpenseStore {
    /// Create a store using `connection`, stamping records with the time from `clock`.
    ///
    /// The database must already be initialized.
    pub fn new(connection: Arc<Mutex<Connection>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            connection,
            clock,
            feeds: Arc::new(Feeds::new()),
        }
    }

    fn publish(&self, user_id: UserID, connection: &Connection) {
        if !self.feeds.has_subscribers(user_id) {
            return;
        }

        match get_expenses(user_id, connection) {
            Ok(snapshot) => self.feeds.publish(user_id, snapshot),
            Err(error) => {
                tracing::error!("Could not load expenses for the subscribers of user {user_id}: {error}")
            }
        }
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    fn add(&self, user_id: UserID, expense: NewExpense) -> Result<Expense, Error> {
        let connection = lock(&self.connection)?;
        let expense = insert_expense(user_id, &expense, self.clock.now(), &connection)?;
        self.publish(user_id, &connection);

        Ok(expense)
    }

    fn get(&self, user_id: UserID, expense_id: ExpenseId) -> Result<Expense, Error> {
        let connection = lock(&self.connection)?;
        get_expense(user_id, expense_id, &connection)
    }

    fn list(&self, user_id: UserID) -> Result<Vec<Expense>, Error> {
        let connection = lock(&self.connection)?;
        get_expenses(user_id, &connection)
    }

    fn update(
        &self,
        user_id: UserID,
        expense_id: ExpenseId,
        patch: ExpensePatch,
    ) -> Result<Expense, Error> {
        patch.validate(self.clock.today())?;

        let connection = lock(&self.connection)?;
        let expense = update_expense(user_id, expense_id, &patch, self.clock.now(), &connection)?;
        self.publish(user_id, &connection);

        Ok(expense)
    }

    fn delete(&self, user_id: UserID, expense_id: ExpenseId) -> Result<(), Error> {
        let connection = lock(&self.connection)?;
        delete_expense(user_id, expense_id, &connection)?;
        self.publish(user_id, &connection);

        Ok(())
    }

    fn subscribe(&self, user_id: UserID) -> Result<Subscription<Vec<Expense>>, Error> {
        let connection = lock(&self.connection)?;
        let snapshot = get_expenses(user_id, &connection)?;

        Ok(self.feeds.subscribe(user_id, snapshot))
    }
}

/// Custom categories stored in the `category` table.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
    clock: Arc<dyn Clock>,
    feeds: Arc<Feeds<CategorySet>>,
}

impl SQLiteCategoryStore {
    /// Create a store using `connection`, stamping records with the time from `clock`.
    ///
    /// The database must already be initialized.
    pub fn new(connection: Arc<Mutex<Connection>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            connection,
            clock,
            feeds: Arc::new(Feeds::new()),
        }
    }

    fn publish(&self, user_id: UserID, connection: &Connection) {
        if !self.feeds.has_subscribers(user_id) {
            return;
        }

        match get_categories(user_id, connection) {
            Ok(custom) => self.feeds.publish(user_id, CategorySet::merge(custom)),
            Err(error) => {
                tracing::error!("Could not load categories for the subscribers of user {user_id}: {error}")
            }
        }
    }
}

impl CategoryStore for SQLiteCategoryStore {
    fn add(&self, user_id: UserID, name: CategoryName) -> Result<CustomCategory, Error> {
        let connection = lock(&self.connection)?;
        let category = create_category(user_id, name, self.clock.now(), &connection)?;
        self.publish(user_id, &connection);

        Ok(category)
    }

    fn delete(&self, user_id: UserID, category_id: CategoryId) -> Result<(), Error> {
        let connection = lock(&self.connection)?;
        delete_category(user_id, category_id, &connection)?;
        self.publish(user_id, &connection);

        Ok(())
    }

    fn list(&self, user_id: UserID) -> Result<CategorySet, Error> {
        let connection = lock(&self.connection)?;
        get_categories(user_id, &connection).map(CategorySet::merge)
    }

    fn subscribe(&self, user_id: UserID) -> Result<Subscription<CategorySet>, Error> {
        let connection = lock(&self.connection)?;
        let snapshot = get_categories(user_id, &connection).map(CategorySet::merge)?;

        Ok(self.feeds.subscribe(user_id, snapshot))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::macros::{date, datetime};

    use crate::{
        Error, PasswordHash,
        category::{CategoryName, CategorySet},
        clock::FixedClock,
        db::initialize,
        expense::{Expense, ExpensePatch, NewExpense, ValidationError},
        store::{CategoryStore, ExpenseStore, SQLiteCategoryStore, SQLiteExpenseStore},
        user::{UserID, create_user},
    };

    fn get_stores() -> (SQLiteExpenseStore, SQLiteCategoryStore, UserID) {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        let user = create_user(
            &"test@example.com".parse().expect("invalid email"),
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .expect("Could not create user");
        let connection = Arc::new(Mutex::new(connection));
        let clock = Arc::new(FixedClock::new(datetime!(2024-01-15 09:30 UTC)));

        (
            SQLiteExpenseStore::new(connection.clone(), clock.clone()),
            SQLiteCategoryStore::new(connection, clock),
            user.id,
        )
    }

    fn new_expense(title: &str, amount: f64, category: &str) -> NewExpense {
        NewExpense::new(
            title,
            Some(amount),
            CategoryName::new_unchecked(category),
            date!(2024 - 01 - 10),
            date!(2024 - 01 - 15),
        )
        .expect("invalid expense")
    }

    fn ids(expenses: &[Expense]) -> Vec<i64> {
        let mut ids: Vec<_> = expenses.iter().map(|expense| expense.id).collect();
        ids.sort();
        ids
    }

    #[test]
    fn add_stamps_with_clock() {
        let (store, _, user_id) = get_stores();

        let expense = store
            .add(user_id, new_expense("Coffee", 4.5, "Food"))
            .expect("Could not add expense");

        assert_eq!(expense.created_at, datetime!(2024-01-15 09:30 UTC));
        assert_eq!(store.get(user_id, expense.id), Ok(expense));
    }

    #[test]
    fn update_validates_patch() {
        let (store, _, user_id) = get_stores();
        let expense = store
            .add(user_id, new_expense("Coffee", 4.5, "Food"))
            .expect("Could not add expense");

        let result = store.update(user_id, expense.id, ExpensePatch::default().amount(0.0));

        assert_eq!(
            result,
            Err(Error::InvalidExpense(ValidationError::InvalidAmount))
        );
    }

    #[tokio::test]
    async fn subscriber_sees_additions_and_deletions() {
        let (store, _, user_id) = get_stores();
        let first = store
            .add(user_id, new_expense("Coffee", 4.5, "Food"))
            .expect("Could not add expense");
        let mut subscription = store.subscribe(user_id).expect("Could not subscribe");

        let initial = subscription.next().await.expect("no initial snapshot");
        assert_eq!(ids(&initial), vec![first.id]);

        let second = store
            .add(user_id, new_expense("Bus", 2.0, "Transport"))
            .expect("Could not add expense");
        let after_add = subscription.next().await.expect("no snapshot after add");
        assert_eq!(ids(&after_add), vec![first.id, second.id]);

        store
            .delete(user_id, first.id)
            .expect("Could not delete expense");
        let after_delete = subscription.next().await.expect("no snapshot after delete");
        assert_eq!(ids(&after_delete), vec![second.id]);
    }

    #[tokio::test]
    async fn unsubscribed_listener_stops_receiving() {
        let (store, _, user_id) = get_stores();
        let mut subscription = store.subscribe(user_id).expect("Could not subscribe");
        subscription.next().await;

        subscription.unsubscribe();
        store
            .add(user_id, new_expense("Coffee", 4.5, "Food"))
            .expect("Could not add expense");

        assert_eq!(subscription.next().await, None);
    }

    #[test]
    fn missing_expenses_report_the_operation() {
        let (store, _, user_id) = get_stores();

        assert_eq!(
            store.update(user_id, 99, ExpensePatch::default().title("Tea")),
            Err(Error::UpdateMissingExpense)
        );
        assert_eq!(store.delete(user_id, 99), Err(Error::DeleteMissingExpense));
    }

    #[tokio::test]
    async fn category_subscriber_sees_merged_set() {
        let (_, store, user_id) = get_stores();
        let mut subscription = store.subscribe(user_id).expect("Could not subscribe");

        assert_eq!(subscription.next().await, Some(CategorySet::defaults()));

        let pets = store
            .add(user_id, CategoryName::new_unchecked("Pets"))
            .expect("Could not add category");
        let after_add = subscription.next().await.expect("no snapshot after add");

        assert_eq!(after_add, CategorySet::merge(vec![pets.clone()]));
        assert_eq!(store.list(user_id), Ok(after_add));

        store
            .delete(user_id, pets.id)
            .expect("Could not delete category");
        assert_eq!(subscription.next().await, Some(CategorySet::defaults()));
    }
}
