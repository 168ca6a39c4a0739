//! Category entity - a user-defined bucket that transactions are filed under.
//!
//! Each category belongs to one user, carries a display name and hex color,
//! and is tagged with the [`Kind`](super::Kind) of transactions it is meant for.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::Kind;

/// Category database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Identifier of the user who owns this category
    pub user_id: String,
    /// Display name (e.g., "Food & Dining"); not required to be unique
    pub name: String,
    /// Which kind of transaction this category is offered for
    pub kind: Kind,
    /// Display color as `#RRGGBB`
    pub color: String,
    /// When the category was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
