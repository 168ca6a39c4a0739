//! Shared test helpers: an in-memory store and entities with sensible defaults.

use chrono::{DateTime, TimeZone, Utc};
use tracing_subscriber::EnvFilter;

use crate::db::{CategoryDraft, Store, TransactionDraft, categories, transactions};
use crate::entities::{Kind, category, transaction};
use crate::errors::Result;

/// Default filter for test output; keeps sqlx statement logging out of the way.
pub const TEST_LOG_FILTER: &str = "info,sqlx=warn";

/// Routes tracing output to the test harness. Safe to call more than once.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(TEST_LOG_FILTER)),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` store with all tables initialized.
pub async fn setup_test_store() -> Result<Store> {
    setup_test_store_with_capacity(64).await
}

/// Like [`setup_test_store`], with a custom change-channel capacity.
pub async fn setup_test_store_with_capacity(capacity: usize) -> Result<Store> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(Store::new(db, capacity))
}

/// Creates a category with color `#FF5733`.
pub async fn create_test_category(
    store: &Store,
    user_id: &str,
    name: &str,
    kind: Kind,
) -> Result<category::Model> {
    categories::insert(
        store,
        CategoryDraft {
            id: None,
            user_id: user_id.to_string(),
            name: name.to_string(),
            kind,
            color: "#FF5733".to_string(),
        },
    )
    .await
}

/// The date every [`test_draft`] starts with: 2024-03-01 12:00 UTC.
pub fn test_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A new-transaction draft with an empty note, dated [`test_date`].
pub fn test_draft(user_id: &str, category_id: i64, kind: Kind, amount: f64) -> TransactionDraft {
    TransactionDraft {
        id: None,
        user_id: user_id.to_string(),
        amount,
        kind,
        date: test_date(),
        category_id,
        note: String::new(),
    }
}

/// Stores [`test_draft`] and returns the saved row.
pub async fn create_test_transaction(
    store: &Store,
    user_id: &str,
    category_id: i64,
    kind: Kind,
    amount: f64,
) -> Result<transaction::Model> {
    transactions::insert(store, test_draft(user_id, category_id, kind, amount)).await
}

/// A fresh store holding one expense category, "Test Category", for `user1`.
pub async fn setup_with_category() -> Result<(Store, category::Model)> {
    let store = setup_test_store().await?;
    let category = create_test_category(&store, "user1", "Test Category", Kind::Expense).await?;
    Ok((store, category))
}

/// An unsaved transaction for `user1`, dated March `id`, 2024 at noon UTC.
///
/// For pure functions that take snapshots; `id` must be a valid day of March.
pub fn test_model(id: i64, category_id: i64, kind: Kind, amount: f64) -> transaction::Model {
    let date = u32::try_from(id)
        .ok()
        .and_then(|day| Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).single())
        .unwrap_or_else(test_date);
    transaction::Model {
        id,
        user_id: "user1".to_string(),
        amount,
        kind,
        date,
        category_id,
        note: String::new(),
        created_at: date,
    }
}

mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter_parses_and_quiets_sqlx() {
        assert!(EnvFilter::try_new(TEST_LOG_FILTER).is_ok());
        assert!(TEST_LOG_FILTER.contains("sqlx=warn"));
        assert!(!TEST_LOG_FILTER.contains("debug"));
    }
}
