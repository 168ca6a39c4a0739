//! Persistence accessor layer.
//!
//! Free functions over the two tables, scoped by `user_id` on every multi-row read.
//! Writes go through a [`Store`] so that [`Live`] queries hear about them.

pub mod categories;
mod live;
mod store;
pub mod transactions;

pub use categories::CategoryDraft;
pub use live::Live;
pub use store::{Store, Table};
pub use transactions::{CategoryTotal, DateRange, TransactionDraft};
