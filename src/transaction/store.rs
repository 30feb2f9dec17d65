//! The repository that owns the canonical transaction collection.
//!
//! [TransactionStore] keeps every transaction in memory and writes the whole
//! collection to the key-value store after each change.

use rusqlite::Connection;
use time::{Date, Duration};

use crate::{
    Error,
    category::Category,
    db::{get_value, set_value},
    transaction::core::{NewTransaction, Transaction, TransactionId},
};

const TRANSACTIONS_KEY: &str = "transactions";
const NEXT_ID_KEY: &str = "next_transaction_id";

/// What to do when asked to update a transaction that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePolicy {
    /// Do nothing and log a warning.
    #[default]
    Ignore,
    /// Return [Error::UpdateMissingTransaction].
    Reject,
}

/// The in-memory transaction collection and its persistence.
#[derive(Debug)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
    next_id: TransactionId,
    update_policy: UpdatePolicy,
}

impl TransactionStore {
    /// Load the persisted transactions.
    ///
    /// If nothing has been persisted yet, the collection is seeded with
    /// [seed_transactions] dated relative to `today` and saved. If the
    /// persisted value cannot be parsed, the seed collection is used in its
    /// place and the corrupt value is overwritten.
    ///
    /// IDs continue from the saved counter, so an ID freed by deleting the
    /// newest transaction is not handed out again after a restart.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the key-value store cannot be read or written.
    pub fn load(
        connection: &Connection,
        update_policy: UpdatePolicy,
        today: Date,
    ) -> Result<Self, Error> {
        let stored = get_value(TRANSACTIONS_KEY, connection)?;

        let (transactions, needs_save) = match stored {
            None => {
                tracing::info!("no saved transactions, using the sample transactions");
                (seed_transactions(today), true)
            }
            Some(json) => match serde_json::from_str::<Vec<Transaction>>(&json) {
                Ok(transactions) => (transactions, false),
                Err(error) => {
                    tracing::warn!(
                        "saved transactions are corrupt ({error}), using the sample transactions"
                    );
                    (seed_transactions(today), true)
                }
            },
        };

        let mut store = Self::new(transactions, update_policy);

        let saved_next_id = load_next_id(connection)?;
        if let Some(saved_next_id) = saved_next_id {
            store.next_id = store.next_id.max(saved_next_id);
        }

        if needs_save || saved_next_id.is_none() {
            store.save(connection)?;
        }

        Ok(store)
    }

    /// Create a store from an existing collection without touching the database.
    pub fn new(transactions: Vec<Transaction>, update_policy: UpdatePolicy) -> Self {
        let next_id = transactions
            .iter()
            .map(|transaction| transaction.id)
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            transactions,
            next_id,
            update_policy,
        }
    }

    /// Every transaction in insertion order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Get the transaction with the ID `id`.
    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|transaction| transaction.id == id)
    }

    /// Write the full collection and the ID counter to the key-value store.
    ///
    /// # Errors
    /// Returns [Error::JSONSerializationError] if the collection cannot be
    /// serialized, or [Error::SqlError] if it cannot be written.
    pub fn save(&self, connection: &Connection) -> Result<(), Error> {
        let json = serde_json::to_string(&self.transactions)?;

        let db_transaction = connection.unchecked_transaction()?;
        set_value(TRANSACTIONS_KEY, &json, &db_transaction)?;
        set_value(NEXT_ID_KEY, &self.next_id.to_string(), &db_transaction)?;
        db_transaction.commit()?;

        Ok(())
    }

    /// Validate `new`, give it a fresh ID and append it to the collection.
    ///
    /// # Errors
    /// Returns a validation error (see [NewTransaction::validate]) or an error
    /// from [TransactionStore::save]. The collection is unchanged on error.
    pub fn create(
        &mut self,
        new: NewTransaction,
        connection: &Connection,
    ) -> Result<Transaction, Error> {
        let new = new.validate()?;

        let id = self.next_id;
        let transaction = Transaction {
            id,
            description: new.description,
            amount: new.amount,
            date: new.date,
            type_: new.type_,
            category: new.category,
        };

        self.transactions.push(transaction.clone());
        self.next_id = id + 1;

        if let Err(error) = self.save(connection) {
            self.transactions.pop();
            self.next_id = id;
            return Err(error);
        }

        Ok(transaction)
    }

    /// Replace every field except the ID of the transaction `id`.
    ///
    /// If `id` does not exist, the outcome depends on the store's
    /// [UpdatePolicy]: either a logged no-op or
    /// [Error::UpdateMissingTransaction].
    ///
    /// # Errors
    /// Returns a validation error, [Error::UpdateMissingTransaction] (see
    /// above), or an error from [TransactionStore::save]. The collection is
    /// unchanged on error.
    pub fn update(
        &mut self,
        id: TransactionId,
        new: NewTransaction,
        connection: &Connection,
    ) -> Result<(), Error> {
        let new = new.validate()?;

        let Some(index) = self.position(id) else {
            return match self.update_policy {
                UpdatePolicy::Ignore => {
                    tracing::warn!("ignoring update for transaction {id}, it does not exist");
                    Ok(())
                }
                UpdatePolicy::Reject => Err(Error::UpdateMissingTransaction),
            };
        };

        let previous = self.transactions[index].clone();
        self.transactions[index].overwrite(new);

        if let Err(error) = self.save(connection) {
            self.transactions[index] = previous;
            return Err(error);
        }

        Ok(())
    }

    /// Remove the transaction `id`.
    ///
    /// Returns `false` without doing anything if `id` does not exist.
    ///
    /// # Errors
    /// Returns an error from [TransactionStore::save]. The collection is
    /// unchanged on error.
    pub fn delete(&mut self, id: TransactionId, connection: &Connection) -> Result<bool, Error> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let removed = self.transactions.remove(index);

        if let Err(error) = self.save(connection) {
            self.transactions.insert(index, removed);
            return Err(error);
        }

        Ok(true)
    }

    fn position(&self, id: TransactionId) -> Option<usize> {
        self.transactions
            .iter()
            .position(|transaction| transaction.id == id)
    }
}

fn load_next_id(connection: &Connection) -> Result<Option<TransactionId>, Error> {
    let Some(text) = get_value(NEXT_ID_KEY, connection)? else {
        return Ok(None);
    };

    match text.parse::<TransactionId>() {
        Ok(next_id) => Ok(Some(next_id)),
        Err(error) => {
            tracing::warn!("ignoring corrupt transaction ID counter {text:?}: {error}");
            Ok(None)
        }
    }
}

/// The sample transactions shown before the user has saved anything.
///
/// Dates are relative to `today` so that the default dashboard range (the
/// last thirty days) always has data to show.
pub fn seed_transactions(today: Date) -> Vec<Transaction> {
    let samples: [(&str, f64, i64, Category); 11] = [
        ("Monthly salary", 50_000_000.0, 15, Category::Salary),
        ("Supermarket shopping", 1_500_750.0, 14, Category::Food),
        ("Apartment rent", 12_000_000.0, 14, Category::Rent),
        ("Internet bill", 600_000.0, 12, Category::Utilities),
        ("Freelance project", 7_500_000.0, 10, Category::Freelance),
        ("Dinner with friends", 850_500.0, 9, Category::Food),
        ("Transit card top-up", 700_000.0, 8, Category::Transport),
        ("Cinema ticket", 300_000.0, 5, Category::Entertainment),
        ("New headphones", 2_500_000.0, 3, Category::Shopping),
        ("Dividends", 1_200_000.0, 2, Category::Investments),
        ("Coffee", 50_250.0, 1, Category::Food),
    ];

    samples
        .into_iter()
        .zip(1..)
        .map(|((description, amount, days_ago, category), id)| Transaction {
            id,
            description: description.to_owned(),
            amount,
            date: today - Duration::days(days_ago),
            type_: category.transaction_type(),
            category,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use super::{TransactionStore, UpdatePolicy, seed_transactions};
    use crate::{
        Error,
        category::{Category, TransactionType},
        db::{get_value, initialize, set_value},
        transaction::Transaction,
    };

    const TODAY: time::Date = date!(2024 - 03 - 20);

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn empty_store(conn: &Connection, policy: UpdatePolicy) -> TransactionStore {
        set_value("transactions", "[]", conn).unwrap();
        TransactionStore::load(conn, policy, TODAY).unwrap()
    }

    #[test]
    fn load_seeds_and_persists_when_nothing_saved() {
        let conn = get_test_connection();

        let store = TransactionStore::load(&conn, UpdatePolicy::Ignore, TODAY).unwrap();

        assert_eq!(store.transactions(), seed_transactions(TODAY).as_slice());
        assert!(get_value("transactions", &conn).unwrap().is_some());
    }

    #[test]
    fn load_falls_back_to_seed_when_corrupt() {
        let conn = get_test_connection();
        set_value("transactions", "{not json", &conn).unwrap();

        let store = TransactionStore::load(&conn, UpdatePolicy::Ignore, TODAY).unwrap();

        assert_eq!(store.transactions(), seed_transactions(TODAY).as_slice());
        let reloaded = TransactionStore::load(&conn, UpdatePolicy::Ignore, TODAY).unwrap();
        assert_eq!(reloaded.transactions(), store.transactions());
    }

    #[test]
    fn load_keeps_an_empty_saved_collection() {
        let conn = get_test_connection();

        let store = empty_store(&conn, UpdatePolicy::Ignore);

        assert!(store.transactions().is_empty());
    }

    #[test]
    fn seed_transactions_respect_category_partition() {
        for transaction in seed_transactions(TODAY) {
            assert_eq!(transaction.category.transaction_type(), transaction.type_);
            assert!(transaction.amount > 0.0);
        }
    }

    #[test]
    fn create_assigns_unique_increasing_ids() {
        let conn = get_test_connection();
        let mut store = empty_store(&conn, UpdatePolicy::Ignore);

        let first = store
            .create(Transaction::build("Pay", 10.0, TODAY, Category::Salary), &conn)
            .unwrap();
        let second = store
            .create(Transaction::build("Lunch", 5.0, TODAY, Category::Food), &conn)
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.transactions(), &[first, second]);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let conn = get_test_connection();
        let mut store = empty_store(&conn, UpdatePolicy::Ignore);
        let first = store
            .create(Transaction::build("Pay", 10.0, TODAY, Category::Salary), &conn)
            .unwrap();
        let second = store
            .create(Transaction::build("Lunch", 5.0, TODAY, Category::Food), &conn)
            .unwrap();

        store.delete(second.id, &conn).unwrap();
        let third = store
            .create(Transaction::build("Bus", 2.0, TODAY, Category::Transport), &conn)
            .unwrap();

        assert_ne!(third.id, first.id);
        assert_ne!(third.id, second.id);
    }

    #[test]
    fn create_rejects_invalid_transactions() {
        let conn = get_test_connection();
        let mut store = empty_store(&conn, UpdatePolicy::Ignore);

        let result = store.create(Transaction::build("", 10.0, TODAY, Category::Salary), &conn);

        assert_eq!(result, Err(Error::EmptyDescription));
        assert!(store.transactions().is_empty());
    }

    #[test]
    fn mutations_are_persisted() {
        let conn = get_test_connection();
        let mut store = empty_store(&conn, UpdatePolicy::Ignore);
        let created = store
            .create(Transaction::build("Pay", 10.0, TODAY, Category::Salary), &conn)
            .unwrap();

        let reloaded = TransactionStore::load(&conn, UpdatePolicy::Ignore, TODAY).unwrap();

        assert_eq!(reloaded.transactions(), &[created]);
    }

    #[test]
    fn update_replaces_all_fields_except_id() {
        let conn = get_test_connection();
        let mut store = empty_store(&conn, UpdatePolicy::Ignore);
        let created = store
            .create(Transaction::build("Pay", 10.0, TODAY, Category::Salary), &conn)
            .unwrap();

        store
            .update(
                created.id,
                Transaction::build("Groceries", 42.0, date!(2024 - 03 - 01), Category::Food),
                &conn,
            )
            .unwrap();

        let want = Transaction {
            id: created.id,
            description: "Groceries".to_owned(),
            amount: 42.0,
            date: date!(2024 - 03 - 01),
            type_: TransactionType::Expense,
            category: Category::Food,
        };
        assert_eq!(store.get(created.id), Some(&want));
        let reloaded = TransactionStore::load(&conn, UpdatePolicy::Ignore, TODAY).unwrap();
        assert_eq!(reloaded.transactions(), &[want]);
    }

    #[test]
    fn update_missing_is_ignored_by_default() {
        let conn = get_test_connection();
        let mut store = empty_store(&conn, UpdatePolicy::Ignore);

        let result = store.update(
            99,
            Transaction::build("Pay", 10.0, TODAY, Category::Salary),
            &conn,
        );

        assert_eq!(result, Ok(()));
        assert!(store.transactions().is_empty());
    }

    #[test]
    fn update_missing_is_rejected_with_reject_policy() {
        let conn = get_test_connection();
        let mut store = empty_store(&conn, UpdatePolicy::Reject);

        let result = store.update(
            99,
            Transaction::build("Pay", 10.0, TODAY, Category::Salary),
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn update_rejects_invalid_fields_and_keeps_original() {
        let conn = get_test_connection();
        let mut store = empty_store(&conn, UpdatePolicy::Ignore);
        let created = store
            .create(Transaction::build("Pay", 10.0, TODAY, Category::Salary), &conn)
            .unwrap();

        let result = store.update(
            created.id,
            Transaction::build("Pay", -1.0, TODAY, Category::Salary),
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidAmount(-1.0)));
        assert_eq!(store.get(created.id), Some(&created));
    }

    #[test]
    fn delete_removes_transaction() {
        let conn = get_test_connection();
        let mut store = empty_store(&conn, UpdatePolicy::Ignore);
        let created = store
            .create(Transaction::build("Pay", 10.0, TODAY, Category::Salary), &conn)
            .unwrap();

        assert_eq!(store.delete(created.id, &conn), Ok(true));
        assert_eq!(store.get(created.id), None);
        let reloaded = TransactionStore::load(&conn, UpdatePolicy::Ignore, TODAY).unwrap();
        assert!(reloaded.transactions().is_empty());
    }

    #[test]
    fn delete_missing_is_a_no_op() {
        let conn = get_test_connection();
        let mut store = empty_store(&conn, UpdatePolicy::Ignore);

        assert_eq!(store.delete(42, &conn), Ok(false));
    }

    #[test]
    fn ids_are_not_reused_after_delete_and_reload() {
        let conn = get_test_connection();
        let mut store = TransactionStore::load(&conn, UpdatePolicy::Ignore, TODAY).unwrap();
        let newest_id = store
            .transactions()
            .iter()
            .map(|transaction| transaction.id)
            .max()
            .unwrap();

        assert_eq!(store.delete(newest_id, &conn), Ok(true));
        let mut reloaded = TransactionStore::load(&conn, UpdatePolicy::Ignore, TODAY).unwrap();
        let created = reloaded
            .create(Transaction::build("Tea", 3.0, TODAY, Category::Food), &conn)
            .unwrap();

        assert_eq!(created.id, newest_id + 1);
        assert_eq!(
            get_value("next_transaction_id", &conn),
            Ok(Some((newest_id + 2).to_string()))
        );
    }

    #[test]
    fn corrupt_id_counter_falls_back_to_largest_id() {
        let conn = get_test_connection();
        let mut store = empty_store(&conn, UpdatePolicy::Ignore);
        store
            .create(Transaction::build("Pay", 10.0, TODAY, Category::Salary), &conn)
            .unwrap();
        set_value("next_transaction_id", "many", &conn).unwrap();

        let mut reloaded = TransactionStore::load(&conn, UpdatePolicy::Ignore, TODAY).unwrap();
        let created = reloaded
            .create(Transaction::build("Lunch", 5.0, TODAY, Category::Food), &conn)
            .unwrap();

        assert_eq!(created.id, 2);
    }

    #[test]
    fn new_continues_ids_after_largest_existing_id() {
        let conn = get_test_connection();
        let mut store = TransactionStore::new(seed_transactions(TODAY), UpdatePolicy::Ignore);

        let created = store
            .create(Transaction::build("Tea", 3.0, TODAY, Category::Food), &conn)
            .unwrap();

        assert_eq!(created.id, 12);
    }
}
