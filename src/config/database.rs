//! Database configuration module for the finance tracker.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust structs,
//! including the restrict-on-delete foreign key from transactions to categories and
//! the secondary index on `transactions.category_id`.

use crate::entities::{Category, Transaction};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info, instrument};

/// Default location of the local database file.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/finance_tracker.sqlite?mode=rwc";

/// Schema version recorded in `PRAGMA user_version`. No migrations exist yet.
pub const SCHEMA_VERSION: i64 = 1;

/// Opens a connection to `database_url` and makes sure every table exists.
///
/// For file-backed databases the parent directory is created first.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(dir) = database_directory(database_url) {
        debug!("Ensuring database directory {} exists", dir);
        std::fs::create_dir_all(dir)?;
    }

    let db = Database::connect(database_url).await?;
    info!("Database connection opened. Ensuring tables are created...");
    create_tables(&db).await?;
    Ok(db)
}

/// Creates both tables, the category index and the schema version marker.
///
/// Every statement is `IF NOT EXISTS`, so calling this on an existing database is a no-op.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Categories first: transactions reference them.
    let mut category_table = schema.create_table_from_entity(Category);
    category_table.if_not_exists();
    let mut transaction_table = schema.create_table_from_entity(Transaction);
    transaction_table.if_not_exists();

    db.execute(builder.build(&category_table)).await?;
    db.execute(builder.build(&transaction_table)).await?;

    for mut index in schema.create_index_from_entity(Transaction) {
        index.if_not_exists();
        db.execute(builder.build(&index)).await?;
    }

    db.execute_unprepared(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
        .await?;
    debug!("Schema version {} ensured", SCHEMA_VERSION);

    Ok(())
}

/// Reads the schema version stored in the database.
pub async fn schema_version(db: &DatabaseConnection) -> Result<i64> {
    let row = db
        .query_one(sea_orm::Statement::from_string(
            db.get_database_backend(),
            "PRAGMA user_version",
        ))
        .await?;
    match row {
        Some(row) => Ok(row.try_get_by_index::<i64>(0)?),
        None => Ok(0),
    }
}

/// Extracts the directory part of a file-backed `sqlite://` URL.
fn database_directory(database_url: &str) -> Option<&str> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.contains(":memory:") {
        return None;
    }
    let (dir, _file) = path.rsplit_once('/')?;
    (!dir.is_empty()).then_some(dir)
}
