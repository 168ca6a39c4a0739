//! Transaction entity - a single income or expense record.
//!
//! Each transaction has a `user_id`, a positive `amount`, a `kind`, the `date` it
//! happened, the `category_id` it is filed under, a free-text `note` and an
//! immutable `created_at`. The category reference is a foreign key with
//! `ON DELETE RESTRICT`, so the store refuses to drop a category that is still in use.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::Kind;

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Identifier of the user who recorded the transaction
    pub user_id: String,
    /// Amount of money, always positive; direction comes from `kind`
    pub amount: f64,
    /// Income or expense
    pub kind: Kind,
    /// When the transaction happened
    pub date: DateTimeUtc,
    /// Category this transaction is filed under
    #[sea_orm(indexed)]
    pub category_id: i64,
    /// Free-text note, possibly empty
    pub note: String,
    /// When the record was first stored; never changed by updates
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Restrict"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
