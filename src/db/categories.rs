//! Category accessors - typed reads and writes against the `categories` table.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::NotSet, PaginatorTrait, QueryOrder, Select, Set, prelude::*};
use tracing::{debug, instrument};

use super::{Live, Store, Table};
use crate::entities::{Category, Kind, Transaction, category, transaction};
use crate::errors::{Error, Result};

const WATCHED: &[Table] = &[Table::Categories];

/// Fields needed to insert a category.
///
/// With `id: Some(_)` an existing category with that id is replaced in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryDraft {
    /// Existing id to replace, or `None` for a new row
    pub id: Option<i64>,
    /// Owning user
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Which kind of transaction the category is for
    pub kind: Kind,
    /// Display color as `#RRGGBB`
    pub color: String,
}

fn for_user(user_id: &str) -> Select<Category> {
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .order_by_asc(category::Column::Name)
        .order_by_asc(category::Column::Id)
}

/// All categories for a user, alphabetically.
pub async fn find_all(db: &DatabaseConnection, user_id: &str) -> Result<Vec<category::Model>> {
    for_user(user_id).all(db).await.map_err(Into::into)
}

/// Categories for a user of one kind, alphabetically.
pub async fn find_by_kind(
    db: &DatabaseConnection,
    user_id: &str,
    kind: Kind,
) -> Result<Vec<category::Model>> {
    for_user(user_id)
        .filter(category::Column::Kind.eq(kind))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Looks up one category by id.
pub async fn find_by_id(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Number of transactions (of any user) filed under a category.
pub async fn transaction_count(db: &DatabaseConnection, category_id: i64) -> Result<u64> {
    Transaction::find()
        .filter(transaction::Column::CategoryId.eq(category_id))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Live version of [`find_all`].
pub fn watch_all(store: &Store, user_id: impl Into<String>) -> Live<Vec<category::Model>> {
    let user_id = user_id.into();
    Live::new(store, WATCHED, move |db| {
        let user_id = user_id.clone();
        async move { find_all(&db, &user_id).await }
    })
}

/// Live version of [`find_by_kind`].
pub fn watch_by_kind(
    store: &Store,
    user_id: impl Into<String>,
    kind: Kind,
) -> Live<Vec<category::Model>> {
    let user_id = user_id.into();
    Live::new(store, WATCHED, move |db| {
        let user_id = user_id.clone();
        async move { find_by_kind(&db, &user_id, kind).await }
    })
}

/// Live version of [`find_by_id`].
pub fn watch_by_id(store: &Store, category_id: i64) -> Live<Option<category::Model>> {
    Live::new(store, WATCHED, move |db| async move {
        find_by_id(&db, category_id).await
    })
}

/// Inserts a category, replacing any existing row with the same id.
#[instrument(skip(store, draft), fields(user_id = %draft.user_id, name = %draft.name))]
pub async fn insert(store: &Store, draft: CategoryDraft) -> Result<category::Model> {
    let db = store.connection();
    let active = category::ActiveModel {
        id: draft.id.map_or(NotSet, Set),
        user_id: Set(draft.user_id),
        name: Set(draft.name),
        kind: Set(draft.kind),
        color: Set(draft.color),
        created_at: Set(Utc::now()),
    };

    let model = match draft.id {
        None => active.insert(db).await?,
        Some(id) => {
            Category::insert(active)
                .on_conflict(
                    OnConflict::column(category::Column::Id)
                        .update_columns([
                            category::Column::UserId,
                            category::Column::Name,
                            category::Column::Kind,
                            category::Column::Color,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await?;
            find_by_id(db, id)
                .await?
                .ok_or(Error::CategoryNotFound { id })?
        }
    };

    debug!(category_id = model.id, "Category stored");
    store.notify(Table::Categories);
    Ok(model)
}

/// Replaces the name, kind, color and owner of an existing category.
#[instrument(skip(store, model), fields(category_id = model.id))]
pub async fn update(store: &Store, model: category::Model) -> Result<category::Model> {
    let id = model.id;
    let active = category::ActiveModel {
        id: Set(id),
        user_id: Set(model.user_id),
        name: Set(model.name),
        kind: Set(model.kind),
        color: Set(model.color),
        created_at: NotSet,
    };

    let updated = match active.update(store.connection()).await {
        Ok(updated) => updated,
        Err(DbErr::RecordNotUpdated) => return Err(Error::CategoryNotFound { id }),
        Err(e) => return Err(e.into()),
    };

    store.notify(Table::Categories);
    Ok(updated)
}

/// Deletes a category by id, returning how many rows were removed (0 or 1).
///
/// The store refuses while transactions still reference the category.
#[instrument(skip(store))]
pub async fn delete_by_id(store: &Store, category_id: i64) -> Result<u64> {
    let result = Category::delete_by_id(category_id)
        .exec(store.connection())
        .await?;
    store.notify(Table::Categories);
    Ok(result.rows_affected)
}
