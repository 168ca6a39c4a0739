//! Spending summaries for the home screen.
//!
//! Balance, totals, recent transactions and the spending-by-category breakdown used
//! for the pie chart. Everything here is a fold over snapshots already loaded from
//! the store; absent totals are treated as zero here and nowhere earlier.

use std::collections::HashMap;
use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::db::{Live, Store, Table, categories, transactions};
use crate::entities::{Kind, category, transaction};
use crate::errors::Result;

/// Name shown for spending filed under a category that no longer exists.
pub const UNKNOWN_CATEGORY_NAME: &str = "Unknown";

/// Color shown for spending filed under a category that no longer exists.
pub const UNKNOWN_CATEGORY_COLOR: &str = "#808080";

/// How many transactions the home screen lists.
pub const RECENT_TRANSACTION_COUNT: usize = 5;

/// One slice of the spending pie chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategorySpending {
    /// Category the spending was filed under
    pub category_id: i64,
    /// Category name, or [`UNKNOWN_CATEGORY_NAME`]
    pub category_name: String,
    /// Total expense amount
    pub amount: f64,
    /// Category color, or [`UNKNOWN_CATEGORY_COLOR`]
    pub color: String,
}

/// Everything the home screen shows, as one snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Dashboard {
    /// Income minus expense
    pub balance: f64,
    /// Sum of income, zero when there is none
    pub total_income: f64,
    /// Sum of expenses, zero when there is none
    pub total_expense: f64,
    /// The newest [`RECENT_TRANSACTION_COUNT`] transactions
    pub recent_transactions: Vec<transaction::Model>,
    /// Expense totals per category, largest first
    pub category_spending: Vec<CategorySpending>,
    /// The user's categories, alphabetically
    pub categories: Vec<category::Model>,
}

impl Dashboard {
    /// Builds the dashboard from loaded snapshots.
    ///
    /// `transactions` must already be newest first, as the store returns them.
    #[must_use]
    pub fn build(
        transactions: &[transaction::Model],
        total_income: Option<f64>,
        total_expense: Option<f64>,
        categories: Vec<category::Model>,
    ) -> Self {
        Self {
            balance: balance(total_income, total_expense),
            total_income: total_income.unwrap_or(0.0),
            total_expense: total_expense.unwrap_or(0.0),
            recent_transactions: recent(transactions, RECENT_TRANSACTION_COUNT),
            category_spending: spending_by_category(transactions, &categories),
            categories,
        }
    }
}

/// Income minus expense, with absent totals counted as zero.
#[must_use]
pub fn balance(total_income: Option<f64>, total_expense: Option<f64>) -> f64 {
    total_income.unwrap_or(0.0) - total_expense.unwrap_or(0.0)
}

/// The first `count` entries of a newest-first list.
#[must_use]
pub fn recent(transactions: &[transaction::Model], count: usize) -> Vec<transaction::Model> {
    transactions.iter().take(count).cloned().collect()
}

/// Groups expense transactions by category and attaches each category's name and
/// color, largest total first. Ties come out in no particular order.
#[must_use]
pub fn spending_by_category(
    transactions: &[transaction::Model],
    categories: &[category::Model],
) -> Vec<CategorySpending> {
    let mut totals: HashMap<i64, f64> = HashMap::new();
    for transaction in transactions.iter().filter(|t| t.kind == Kind::Expense) {
        *totals.entry(transaction.category_id).or_insert(0.0) += transaction.amount;
    }

    let mut spending: Vec<CategorySpending> = totals
        .into_iter()
        .map(|(category_id, amount)| {
            let category = categories.iter().find(|c| c.id == category_id);
            CategorySpending {
                category_id,
                category_name: category
                    .map_or(UNKNOWN_CATEGORY_NAME, |c| c.name.as_str())
                    .to_string(),
                amount,
                color: category
                    .map_or(UNKNOWN_CATEGORY_COLOR, |c| c.color.as_str())
                    .to_string(),
            }
        })
        .collect();

    spending.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    spending
}

/// Loads a dashboard snapshot for one user.
pub async fn load_dashboard(db: &DatabaseConnection, user_id: &str) -> Result<Dashboard> {
    let all = transactions::find_all(db, user_id).await?;
    let income = transactions::total_by_kind(db, user_id, Kind::Income).await?;
    let expense = transactions::total_by_kind(db, user_id, Kind::Expense).await?;
    let categories = categories::find_all(db, user_id).await?;
    Ok(Dashboard::build(&all, income, expense, categories))
}

/// Live dashboard: re-emits after any transaction or category write.
#[must_use]
pub fn watch_dashboard(store: &Store, user_id: impl Into<String>) -> Live<Dashboard> {
    let user_id = user_id.into();
    Live::new(
        store,
        &[Table::Transactions, Table::Categories],
        move |db| {
            let user_id = user_id.clone();
            async move { load_dashboard(&db, &user_id).await }
        },
    )
}

/// Formats an amount as US dollars with thousands separators, e.g. `$1,234.56`.
///
/// Amounts that round to zero cents print as `$0.00`, never `-$0.00`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let cents = (amount * 100.0).round() / 100.0;
    let (prefix, cell) = if cents < 0.0 {
        ("-$", &NEGATIVE_FMT)
    } else if cents > 0.0 {
        ("$", &POSITIVE_FMT)
    } else {
        // numfmt renders zero as a bare "0"
        return "$0.00".to_owned();
    };

    let formatter = cell.get_or_init(|| {
        Formatter::currency(prefix)
            .ok()
            .map(|f| f.precision(Precision::Decimals(2)))
    });
    let formatted = formatter.as_ref().map_or_else(
        || format!("{prefix}{:.2}", cents.abs()),
        |f| f.fmt_string(cents.abs()),
    );

    // numfmt drops trailing zeros, so pad the cents back to two digits.
    match formatted.split_once('.') {
        Some((whole, fraction)) => format!("{whole}.{fraction:0<2.2}"),
        None => format!("{formatted}.00"),
    }
}
