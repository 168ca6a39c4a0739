//! Transaction accessors - typed reads and writes against the `transactions` table.
//!
//! Snapshot reads take a plain `&DatabaseConnection`; `watch_*` variants return a
//! [`Live`] that re-runs the same query after every transaction write. Writes take
//! the [`Store`] so they can announce the change once it has committed.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue::NotSet, FromQueryResult, Order, QueryOrder, QuerySelect, Set, prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{Live, Store, Table};
use crate::entities::{Kind, Transaction, transaction};
use crate::errors::{Error, Result};

const WATCHED: &[Table] = &[Table::Transactions];

/// Fields needed to insert a transaction.
///
/// With `id: None` the store assigns a fresh id. With `id: Some(_)` an existing row
/// with that id is replaced in place (its `created_at` is kept).
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionDraft {
    /// Existing id to replace, or `None` for a new row
    pub id: Option<i64>,
    /// Owning user
    pub user_id: String,
    /// Positive amount
    pub amount: f64,
    /// Income or expense
    pub kind: Kind,
    /// When the transaction happened
    pub date: DateTime<Utc>,
    /// Category the transaction is filed under
    pub category_id: i64,
    /// Free-text note
    pub note: String,
}

/// Total expense amount for one category, as produced by [`spending_by_category`].
#[derive(Clone, Debug, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Category the amounts were filed under
    pub category_id: i64,
    /// Sum of expense amounts
    pub total: f64,
}

/// Inclusive date range used by [`find_in_range`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    /// First instant included
    pub start: DateTime<Utc>,
    /// Last instant included
    pub end: DateTime<Utc>,
}

/// Rejects amounts that are zero, negative or not finite.
pub fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

fn for_user(user_id: &str) -> Select<Transaction> {
    Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::Id)
}

/// All transactions for a user, newest first.
pub async fn find_all(db: &DatabaseConnection, user_id: &str) -> Result<Vec<transaction::Model>> {
    for_user(user_id).all(db).await.map_err(Into::into)
}

/// Transactions for a user filed under one category, newest first.
pub async fn find_by_category(
    db: &DatabaseConnection,
    user_id: &str,
    category_id: i64,
) -> Result<Vec<transaction::Model>> {
    for_user(user_id)
        .filter(transaction::Column::CategoryId.eq(category_id))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Transactions for a user of one kind, newest first.
pub async fn find_by_kind(
    db: &DatabaseConnection,
    user_id: &str,
    kind: Kind,
) -> Result<Vec<transaction::Model>> {
    for_user(user_id)
        .filter(transaction::Column::Kind.eq(kind))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Transactions for a user whose date falls inside `range`, both ends included, newest first.
pub async fn find_in_range(
    db: &DatabaseConnection,
    user_id: &str,
    range: DateRange,
) -> Result<Vec<transaction::Model>> {
    for_user(user_id)
        .filter(transaction::Column::Date.between(range.start, range.end))
        .all(db)
        .await
        .map_err(Into::into)
}

/// The `limit` newest transactions for a user.
pub async fn find_recent(
    db: &DatabaseConnection,
    user_id: &str,
    limit: u64,
) -> Result<Vec<transaction::Model>> {
    for_user(user_id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Looks up one transaction by id.
pub async fn find_by_id(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<Option<transaction::Model>> {
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Sum of amounts for a user and kind; `None` when the user has no such transactions.
pub async fn total_by_kind(
    db: &DatabaseConnection,
    user_id: &str,
    kind: Kind,
) -> Result<Option<f64>> {
    let total = Transaction::find()
        .select_only()
        .column_as(transaction::Column::Amount.sum(), "total")
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::Kind.eq(kind))
        .into_tuple::<Option<f64>>()
        .one(db)
        .await?;
    Ok(total.flatten())
}

/// Expense totals per category for a user, largest first.
pub async fn spending_by_category(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<CategoryTotal>> {
    Transaction::find()
        .select_only()
        .column(transaction::Column::CategoryId)
        .column_as(transaction::Column::Amount.sum(), "total")
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::Kind.eq(Kind::Expense))
        .group_by(transaction::Column::CategoryId)
        .order_by(Expr::cust("total"), Order::Desc)
        .into_model::<CategoryTotal>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Live version of [`find_all`].
pub fn watch_all(store: &Store, user_id: impl Into<String>) -> Live<Vec<transaction::Model>> {
    let user_id = user_id.into();
    Live::new(store, WATCHED, move |db| {
        let user_id = user_id.clone();
        async move { find_all(&db, &user_id).await }
    })
}

/// Live version of [`find_by_category`].
pub fn watch_by_category(
    store: &Store,
    user_id: impl Into<String>,
    category_id: i64,
) -> Live<Vec<transaction::Model>> {
    let user_id = user_id.into();
    Live::new(store, WATCHED, move |db| {
        let user_id = user_id.clone();
        async move { find_by_category(&db, &user_id, category_id).await }
    })
}

/// Live version of [`find_by_kind`].
pub fn watch_by_kind(
    store: &Store,
    user_id: impl Into<String>,
    kind: Kind,
) -> Live<Vec<transaction::Model>> {
    let user_id = user_id.into();
    Live::new(store, WATCHED, move |db| {
        let user_id = user_id.clone();
        async move { find_by_kind(&db, &user_id, kind).await }
    })
}

/// Live version of [`find_in_range`].
pub fn watch_in_range(
    store: &Store,
    user_id: impl Into<String>,
    range: DateRange,
) -> Live<Vec<transaction::Model>> {
    let user_id = user_id.into();
    Live::new(store, WATCHED, move |db| {
        let user_id = user_id.clone();
        async move { find_in_range(&db, &user_id, range).await }
    })
}

/// Live version of [`find_recent`].
pub fn watch_recent(
    store: &Store,
    user_id: impl Into<String>,
    limit: u64,
) -> Live<Vec<transaction::Model>> {
    let user_id = user_id.into();
    Live::new(store, WATCHED, move |db| {
        let user_id = user_id.clone();
        async move { find_recent(&db, &user_id, limit).await }
    })
}

/// Live version of [`find_by_id`].
pub fn watch_by_id(store: &Store, transaction_id: i64) -> Live<Option<transaction::Model>> {
    Live::new(store, WATCHED, move |db| async move {
        find_by_id(&db, transaction_id).await
    })
}

/// Live version of [`total_by_kind`].
pub fn watch_total_by_kind(
    store: &Store,
    user_id: impl Into<String>,
    kind: Kind,
) -> Live<Option<f64>> {
    let user_id = user_id.into();
    Live::new(store, WATCHED, move |db| {
        let user_id = user_id.clone();
        async move { total_by_kind(&db, &user_id, kind).await }
    })
}

/// Live version of [`spending_by_category`].
pub fn watch_spending_by_category(
    store: &Store,
    user_id: impl Into<String>,
) -> Live<Vec<CategoryTotal>> {
    let user_id = user_id.into();
    Live::new(store, WATCHED, move |db| {
        let user_id = user_id.clone();
        async move { spending_by_category(&db, &user_id).await }
    })
}

/// Inserts a transaction, replacing any existing row with the same id.
///
/// The category must exist; the foreign key rejects anything else.
#[instrument(skip(store, draft), fields(user_id = %draft.user_id, category_id = draft.category_id))]
pub async fn insert(store: &Store, draft: TransactionDraft) -> Result<transaction::Model> {
    validate_amount(draft.amount)?;
    let db = store.connection();

    let active = transaction::ActiveModel {
        id: draft.id.map_or(NotSet, Set),
        user_id: Set(draft.user_id),
        amount: Set(draft.amount),
        kind: Set(draft.kind),
        date: Set(draft.date),
        category_id: Set(draft.category_id),
        note: Set(draft.note),
        created_at: Set(Utc::now()),
    };

    let model = match draft.id {
        None => active.insert(db).await?,
        Some(id) => {
            Transaction::insert(active)
                .on_conflict(
                    OnConflict::column(transaction::Column::Id)
                        .update_columns([
                            transaction::Column::UserId,
                            transaction::Column::Amount,
                            transaction::Column::Kind,
                            transaction::Column::Date,
                            transaction::Column::CategoryId,
                            transaction::Column::Note,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await?;
            find_by_id(db, id)
                .await?
                .ok_or(Error::TransactionNotFound { id })?
        }
    };

    debug!(transaction_id = model.id, "Transaction stored");
    store.notify(Table::Transactions);
    Ok(model)
}

/// Replaces every field of an existing transaction except `created_at`.
#[instrument(skip(store, model), fields(transaction_id = model.id))]
pub async fn update(store: &Store, model: transaction::Model) -> Result<transaction::Model> {
    validate_amount(model.amount)?;
    let id = model.id;

    let active = transaction::ActiveModel {
        id: Set(id),
        user_id: Set(model.user_id),
        amount: Set(model.amount),
        kind: Set(model.kind),
        date: Set(model.date),
        category_id: Set(model.category_id),
        note: Set(model.note),
        created_at: NotSet,
    };

    let updated = match active.update(store.connection()).await {
        Ok(updated) => updated,
        Err(DbErr::RecordNotUpdated) => return Err(Error::TransactionNotFound { id }),
        Err(e) => return Err(e.into()),
    };

    store.notify(Table::Transactions);
    Ok(updated)
}

/// Deletes a transaction by id, returning how many rows were removed (0 or 1).
#[instrument(skip(store))]
pub async fn delete_by_id(store: &Store, transaction_id: i64) -> Result<u64> {
    let result = Transaction::delete_by_id(transaction_id)
        .exec(store.connection())
        .await?;
    store.notify(Table::Transactions);
    Ok(result.rows_affected)
}

/// Points every transaction filed under `from_category` at `to_category`.
///
/// Returns the number of transactions moved.
#[instrument(skip(store))]
pub async fn reassign_category(store: &Store, from_category: i64, to_category: i64) -> Result<u64> {
    let result = Transaction::update_many()
        .col_expr(transaction::Column::CategoryId, Expr::value(to_category))
        .filter(transaction::Column::CategoryId.eq(from_category))
        .exec(store.connection())
        .await?;
    debug!(moved = result.rows_affected, "Transactions reassigned");
    store.notify(Table::Transactions);
    Ok(result.rows_affected)
}
