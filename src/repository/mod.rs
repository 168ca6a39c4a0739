//! Repository layer - the facades screens and flows talk to.
//!
//! Both repositories are cheap to clone and forward to the accessor layer. The only
//! business rule lives in [`CategoryRepository::delete`]: a category still in use
//! cannot be removed unless its transactions are reassigned first.

mod category;
mod transaction;

pub use category::CategoryRepository;
pub use transaction::TransactionRepository;
