//! Transaction repository.

use tracing::error;

use crate::db::{CategoryTotal, DateRange, Live, Store, TransactionDraft, transactions};
use crate::entities::{Kind, transaction};
use crate::errors::Result;

/// Passthrough facade over the transaction accessors.
///
/// Totals are surfaced exactly as the store reports them: `None` means the user has
/// no transactions of that kind, and it is up to the caller to treat that as zero.
#[derive(Clone, Debug)]
pub struct TransactionRepository {
    store: Store,
    recent_limit: u64,
}

impl TransactionRepository {
    /// Default number of rows returned by [`Self::recent`].
    pub const DEFAULT_RECENT_LIMIT: u64 = 10;

    /// Creates a repository over `store`.
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self {
            store,
            recent_limit: Self::DEFAULT_RECENT_LIMIT,
        }
    }

    /// Overrides the row count used by [`Self::recent`].
    #[must_use]
    pub fn with_recent_limit(mut self, recent_limit: u64) -> Self {
        self.recent_limit = recent_limit;
        self
    }

    /// All of a user's transactions, newest first.
    #[must_use]
    pub fn all(&self, user_id: &str) -> Live<Vec<transaction::Model>> {
        transactions::watch_all(&self.store, user_id)
    }

    /// A user's transactions in one category.
    #[must_use]
    pub fn by_category(&self, user_id: &str, category_id: i64) -> Live<Vec<transaction::Model>> {
        transactions::watch_by_category(&self.store, user_id, category_id)
    }

    /// A user's transactions of one kind.
    #[must_use]
    pub fn by_kind(&self, user_id: &str, kind: Kind) -> Live<Vec<transaction::Model>> {
        transactions::watch_by_kind(&self.store, user_id, kind)
    }

    /// A user's transactions dated inside `range` (inclusive).
    #[must_use]
    pub fn in_range(&self, user_id: &str, range: DateRange) -> Live<Vec<transaction::Model>> {
        transactions::watch_in_range(&self.store, user_id, range)
    }

    /// The newest transactions, capped at the configured recent limit.
    #[must_use]
    pub fn recent(&self, user_id: &str) -> Live<Vec<transaction::Model>> {
        self.recent_with_limit(user_id, self.recent_limit)
    }

    /// The newest `limit` transactions.
    #[must_use]
    pub fn recent_with_limit(&self, user_id: &str, limit: u64) -> Live<Vec<transaction::Model>> {
        transactions::watch_recent(&self.store, user_id, limit)
    }

    /// One transaction by id.
    pub async fn get(&self, transaction_id: i64) -> Result<Option<transaction::Model>> {
        transactions::find_by_id(self.store.connection(), transaction_id).await
    }

    /// One transaction by id, live.
    #[must_use]
    pub fn watch(&self, transaction_id: i64) -> Live<Option<transaction::Model>> {
        transactions::watch_by_id(&self.store, transaction_id)
    }

    /// Sum of income amounts, `None` if there are none.
    #[must_use]
    pub fn total_income(&self, user_id: &str) -> Live<Option<f64>> {
        transactions::watch_total_by_kind(&self.store, user_id, Kind::Income)
    }

    /// Sum of expense amounts, `None` if there are none.
    #[must_use]
    pub fn total_expense(&self, user_id: &str) -> Live<Option<f64>> {
        transactions::watch_total_by_kind(&self.store, user_id, Kind::Expense)
    }

    /// Expense totals grouped by category, largest first.
    #[must_use]
    pub fn spending_by_category(&self, user_id: &str) -> Live<Vec<CategoryTotal>> {
        transactions::watch_spending_by_category(&self.store, user_id)
    }

    /// Stores a new transaction (or replaces one when `draft.id` is set).
    pub async fn insert(&self, draft: TransactionDraft) -> Result<transaction::Model> {
        transactions::insert(&self.store, draft)
            .await
            .inspect_err(|e| error!("Failed to save transaction: {}", e))
    }

    /// Overwrites an existing transaction.
    pub async fn update(&self, model: transaction::Model) -> Result<transaction::Model> {
        transactions::update(&self.store, model)
            .await
            .inspect_err(|e| error!("Failed to update transaction: {}", e))
    }

    /// Removes a transaction. Deleting an id that does not exist is not an error.
    pub async fn delete(&self, transaction_id: i64) -> Result<()> {
        transactions::delete_by_id(&self.store, transaction_id)
            .await
            .inspect_err(|e| error!("Failed to delete transaction {}: {}", transaction_id, e))?;
        Ok(())
    }
}
