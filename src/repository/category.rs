//! Category repository - passthrough reads and writes plus guarded deletion.

use tracing::{error, info, instrument, warn};

use crate::db::{CategoryDraft, Live, Store, categories, transactions};
use crate::entities::{Kind, category};
use crate::errors::{Error, Result};

/// Facade over the category accessors, plus guarded deletion.
#[derive(Clone, Debug)]
pub struct CategoryRepository {
    store: Store,
}

impl CategoryRepository {
    /// Creates a repository over `store`.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// All of a user's categories, alphabetically.
    #[must_use]
    pub fn all(&self, user_id: &str) -> Live<Vec<category::Model>> {
        categories::watch_all(&self.store, user_id)
    }

    /// A user's categories of one kind, alphabetically.
    #[must_use]
    pub fn by_kind(&self, user_id: &str, kind: Kind) -> Live<Vec<category::Model>> {
        categories::watch_by_kind(&self.store, user_id, kind)
    }

    /// One category by id.
    pub async fn get(&self, category_id: i64) -> Result<Option<category::Model>> {
        categories::find_by_id(self.store.connection(), category_id).await
    }

    /// One category by id, live.
    #[must_use]
    pub fn watch(&self, category_id: i64) -> Live<Option<category::Model>> {
        categories::watch_by_id(&self.store, category_id)
    }

    /// Stores a new category (or replaces one when `draft.id` is set).
    pub async fn insert(&self, draft: CategoryDraft) -> Result<category::Model> {
        categories::insert(&self.store, draft)
            .await
            .inspect_err(|e| error!("Failed to save category: {}", e))
    }

    /// Renames, recolors or re-kinds an existing category.
    pub async fn update(&self, model: category::Model) -> Result<category::Model> {
        categories::update(&self.store, model)
            .await
            .inspect_err(|e| error!("Failed to update category: {}", e))
    }

    /// Number of transactions filed under a category.
    pub async fn transaction_count(&self, category_id: i64) -> Result<u64> {
        categories::transaction_count(self.store.connection(), category_id).await
    }

    /// Deletes a category that no transaction references.
    ///
    /// # Errors
    /// [`Error::HasReferences`] with the blocking count if any transaction is still
    /// filed under the category; nothing is changed in that case.
    ///
    /// The count and the delete are separate statements. A transaction inserted in
    /// between is caught by the foreign key and surfaces as [`Error::Database`].
    #[instrument(skip(self))]
    pub async fn delete(&self, category_id: i64) -> Result<()> {
        let count = self.transaction_count(category_id).await?;
        if count > 0 {
            warn!(count, "Refusing to delete category still in use");
            return Err(Error::HasReferences { count });
        }

        categories::delete_by_id(&self.store, category_id)
            .await
            .inspect_err(|e| error!("Failed to delete category: {}", e))?;
        Ok(())
    }

    /// Moves every transaction from `category_id` to `replacement_id`, then deletes
    /// `category_id`.
    ///
    /// The replacement is not checked for existence or kind. The two steps are
    /// separate statements; if the delete fails the transactions stay moved and the
    /// call can simply be retried.
    #[instrument(skip(self))]
    pub async fn delete_and_reassign(&self, category_id: i64, replacement_id: i64) -> Result<()> {
        let moved = transactions::reassign_category(&self.store, category_id, replacement_id)
            .await
            .inspect_err(|e| error!("Failed to reassign transactions: {}", e))?;
        categories::delete_by_id(&self.store, category_id)
            .await
            .inspect_err(|e| error!("Failed to delete category after reassignment: {}", e))?;
        info!(moved, "Category deleted after reassignment");
        Ok(())
    }
}
