//! The income/expense discriminator shared by transactions and categories.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether money comes in or goes out.
///
/// Stored as the text `INCOME` / `EXPENSE`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Kind {
    /// Money received (salary, refunds, gifts)
    #[sea_orm(string_value = "INCOME")]
    Income,
    /// Money spent
    #[default]
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
}

impl Kind {
    /// Display label used by list and form views.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}
