//! Live queries: reads that re-emit their full result after every relevant write.
//!
//! A [`Live`] subscribes to the store's change bus when it is created, so no write
//! that commits after creation can be missed. The first [`Live::next`] returns the
//! initial snapshot; each later call waits for a change to one of the watched
//! tables and re-runs the query. The store never computes deltas.

use std::future::Future;
use std::pin::Pin;

use sea_orm::DatabaseConnection;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tracing::debug;

use super::store::{Store, Table};
use crate::errors::Result;

type QueryFuture<T> = Pin<Box<dyn Future<Output = Result<T>> + Send>>;
type QueryFn<T> = Box<dyn Fn(DatabaseConnection) -> QueryFuture<T> + Send + Sync>;

/// A subscription to the result of one query.
///
/// Dropping the value cancels the subscription.
pub struct Live<T> {
    db: DatabaseConnection,
    tables: &'static [Table],
    changes: broadcast::Receiver<Table>,
    query: QueryFn<T>,
    primed: bool,
}

impl<T> std::fmt::Debug for Live<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Live")
            .field("tables", &self.tables)
            .field("primed", &self.primed)
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Live<T> {
    /// Builds a live query that re-runs `query` whenever one of `tables` changes.
    pub(crate) fn new<F, Fut>(store: &Store, tables: &'static [Table], query: F) -> Self
    where
        F: Fn(DatabaseConnection) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            db: store.connection().clone(),
            tables,
            changes: store.subscribe(),
            query: Box::new(move |db| -> QueryFuture<T> { Box::pin(query(db)) }),
            primed: false,
        }
    }

    /// Waits for the next snapshot.
    ///
    /// Returns `None` once the store has been dropped and no further change can
    /// arrive.
    pub async fn next(&mut self) -> Option<Result<T>> {
        if self.primed && !self.wait_for_change().await {
            return None;
        }
        self.primed = true;
        Some((self.query)(self.db.clone()).await)
    }

    /// Returns the current snapshot without waiting for a change, even if the
    /// initial one has already been taken.
    pub async fn current(&mut self) -> Result<T> {
        // Anything already queued is covered by this fresh read.
        while let Ok(_) | Err(TryRecvError::Lagged(_)) = self.changes.try_recv() {}
        self.primed = true;
        (self.query)(self.db.clone()).await
    }

    /// Transforms every snapshot with `f`.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Live<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Clone + Send + Sync + 'static,
    {
        let query = std::sync::Arc::new(self.query);
        Live {
            db: self.db,
            tables: self.tables,
            changes: self.changes,
            query: Box::new(move |db| -> QueryFuture<U> {
                let query = std::sync::Arc::clone(&query);
                let f = f.clone();
                Box::pin(async move { (query.as_ref())(db).await.map(f) })
            }),
            primed: self.primed,
        }
    }

    async fn wait_for_change(&mut self) -> bool {
        loop {
            match self.changes.recv().await {
                Ok(table) if self.tables.contains(&table) => return true,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Live query fell behind, re-querying once");
                    return true;
                }
                Err(RecvError::Closed) => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::db::{categories, transactions};
    use crate::entities::Kind;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_first_next_is_initial_snapshot() -> Result<()> {
        let store = setup_test_store().await?;
        create_test_category(&store, "user1", "Food", Kind::Expense).await?;

        let mut live = categories::watch_all(&store, "user1");
        let snapshot = live.next().await.unwrap()?;
        assert_eq!(snapshot.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_write_triggers_new_snapshot() -> Result<()> {
        let store = setup_test_store().await?;
        let mut live = categories::watch_all(&store, "user1");
        assert!(live.next().await.unwrap()?.is_empty());

        create_test_category(&store, "user1", "Food", Kind::Expense).await?;
        let snapshot = live.next().await.unwrap()?;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].name, "Food");
        Ok(())
    }

    #[tokio::test]
    async fn test_one_snapshot_per_write() -> Result<()> {
        let store = setup_test_store().await?;
        let mut live = categories::watch_all(&store, "user1");
        live.next().await.unwrap()?;

        create_test_category(&store, "user1", "A", Kind::Expense).await?;
        assert_eq!(live.next().await.unwrap()?.len(), 1);

        create_test_category(&store, "user1", "B", Kind::Expense).await?;
        create_test_category(&store, "user1", "C", Kind::Expense).await?;

        // Both queued writes are delivered; each re-query sees everything committed so far.
        assert_eq!(live.next().await.unwrap()?.len(), 3);
        assert_eq!(live.next().await.unwrap()?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_unrelated_table_does_not_wake() -> Result<()> {
        let store = setup_test_store().await?;
        let category = create_test_category(&store, "user1", "Food", Kind::Expense).await?;

        let mut live = categories::watch_all(&store, "user1");
        live.next().await.unwrap()?;

        // A transaction write, then a category write: only the latter should wake us.
        create_test_transaction(&store, "user1", category.id, Kind::Expense, 5.0).await?;
        create_test_category(&store, "user1", "Rent", Kind::Expense).await?;

        let snapshot = live.next().await.unwrap()?;
        assert_eq!(snapshot.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_lagged_subscriber_requeries_once() -> Result<()> {
        let store = setup_test_store_with_capacity(1).await?;
        let category = create_test_category(&store, "user1", "Food", Kind::Expense).await?;

        let mut live = transactions::watch_all(&store, "user1");
        live.next().await.unwrap()?;

        for amount in [1.0, 2.0, 3.0] {
            create_test_transaction(&store, "user1", category.id, Kind::Expense, amount).await?;
        }

        let snapshot = live.next().await.unwrap()?;
        assert_eq!(snapshot.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_closed_when_store_dropped() -> Result<()> {
        let store = setup_test_store().await?;
        let mut live = categories::watch_all(&store, "user1");
        live.next().await.unwrap()?;

        drop(store);
        assert!(live.next().await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_current_skips_queued_changes() -> Result<()> {
        let store = setup_test_store().await?;
        let mut live = categories::watch_all(&store, "user1");
        live.next().await.unwrap()?;

        create_test_category(&store, "user1", "A", Kind::Expense).await?;
        assert_eq!(live.current().await?.len(), 1);

        create_test_category(&store, "user1", "B", Kind::Expense).await?;
        // The queued notification for "A" was drained, so the next wake is for "B".
        assert_eq!(live.next().await.unwrap()?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_map_transforms_snapshots() -> Result<()> {
        let store = setup_test_store().await?;
        create_test_category(&store, "user1", "Food", Kind::Expense).await?;

        let mut names = categories::watch_all(&store, "user1")
            .map(|list| list.into_iter().map(|c| c.name).collect::<Vec<_>>());
        assert_eq!(names.next().await.unwrap()?, vec!["Food".to_string()]);
        Ok(())
    }
}
