//! The store handle shared by every accessor.
//!
//! A [`Store`] pairs the `SeaORM` connection with a change bus. Every write goes
//! through an accessor that publishes the touched [`Table`] on the bus before it
//! returns, which is what drives [`Live`](super::Live) re-queries.

use crate::config::{AppConfig, database};
use crate::errors::Result;
use sea_orm::DatabaseConnection;
use tokio::sync::broadcast;
use tracing::{info, instrument, trace};

/// The tables a write can touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    /// `transactions`
    Transactions,
    /// `categories`
    Categories,
}

/// Explicit handle to the local store. Construct once at startup and clone it
/// into whatever needs it; clones share the connection pool and the change bus.
#[derive(Clone, Debug)]
pub struct Store {
    db: DatabaseConnection,
    changes: broadcast::Sender<Table>,
}

impl Store {
    /// Wraps an already-initialized connection.
    #[must_use]
    pub fn new(db: DatabaseConnection, change_channel_capacity: usize) -> Self {
        let (changes, _receiver) = broadcast::channel(change_channel_capacity.max(1));
        Self { db, changes }
    }

    /// Connects to the configured database and creates the schema if needed.
    #[instrument(skip(config), fields(database_url = %config.database_url))]
    pub async fn open(config: &AppConfig) -> Result<Self> {
        let db = database::create_connection(&config.database_url).await?;
        info!("Store ready");
        Ok(Self::new(db, config.change_channel_capacity))
    }

    /// The underlying connection, for snapshot reads.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Starts listening for table changes.
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<Table> {
        self.changes.subscribe()
    }

    /// Announces a committed write on `table`.
    pub(crate) fn notify(&self, table: Table) {
        // No receivers just means nobody is watching.
        let watchers = self.changes.send(table).unwrap_or(0);
        trace!(?table, watchers, "Published change");
    }
}
