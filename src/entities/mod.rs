//! Entity module - Contains the SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod kind;
pub mod transaction;

pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use kind::Kind;
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
