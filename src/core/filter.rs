//! In-memory filtering and ordering for the transaction list screen.

use crate::entities::{Kind, transaction};

/// Filters the user can toggle on the transaction list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Only show this kind, if set
    pub kind: Option<Kind>,
    /// Only show this category, if set
    pub category_id: Option<i64>,
    /// Oldest first when true; newest first otherwise
    pub ascending: bool,
}

impl TransactionFilter {
    /// Whether a single transaction passes the kind and category filters.
    #[must_use]
    pub fn matches(&self, transaction: &transaction::Model) -> bool {
        self.kind.is_none_or(|kind| transaction.kind == kind)
            && self
                .category_id
                .is_none_or(|category_id| transaction.category_id == category_id)
    }

    /// Applies the filters and sort order to a snapshot.
    #[must_use]
    pub fn apply(&self, transactions: &[transaction::Model]) -> Vec<transaction::Model> {
        let mut filtered: Vec<_> = transactions
            .iter()
            .filter(|t| self.matches(t))
            .cloned()
            .collect();

        if self.ascending {
            filtered.sort_by(|a, b| a.date.cmp(&b.date));
        } else {
            filtered.sort_by(|a, b| b.date.cmp(&a.date));
        }
        filtered
    }
}

/// Transaction list state: the latest snapshot and what is currently shown.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactionList {
    all: Vec<transaction::Model>,
    filtered: Vec<transaction::Model>,
    filter: TransactionFilter,
}

impl TransactionList {
    /// Replaces the snapshot, e.g. when a live query re-emits.
    pub fn set_transactions(&mut self, transactions: Vec<transaction::Model>) {
        self.all = transactions;
        self.refresh();
    }

    /// Shows only one kind, or every kind with `None`.
    pub fn set_kind(&mut self, kind: Option<Kind>) {
        self.filter.kind = kind;
        self.refresh();
    }

    /// Shows only one category, or every category with `None`.
    pub fn set_category(&mut self, category_id: Option<i64>) {
        self.filter.category_id = category_id;
        self.refresh();
    }

    /// Switches between oldest-first and newest-first.
    pub fn set_ascending(&mut self, ascending: bool) {
        self.filter.ascending = ascending;
        self.refresh();
    }

    /// The transactions currently shown.
    #[must_use]
    pub fn visible(&self) -> &[transaction::Model] {
        &self.filtered
    }

    /// The active filter.
    #[must_use]
    pub const fn filter(&self) -> TransactionFilter {
        self.filter
    }

    fn refresh(&mut self) {
        self.filtered = self.filter.apply(&self.all);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_model;

    fn ids(list: &[transaction::Model]) -> Vec<i64> {
        list.iter().map(|t| t.id).collect()
    }

    fn sample() -> Vec<transaction::Model> {
        // test_model dates each transaction on day `id`.
        vec![
            test_model(3, 10, Kind::Expense, 5.0),
            test_model(2, 20, Kind::Income, 50.0),
            test_model(1, 10, Kind::Expense, 7.0),
        ]
    }

    #[test]
    fn test_default_filter_keeps_all_newest_first() {
        let result = TransactionFilter::default().apply(&sample());
        assert_eq!(ids(&result), vec![3, 2, 1]);
    }

    #[test]
    fn test_kind_filter() {
        let filter = TransactionFilter {
            kind: Some(Kind::Expense),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&sample())), vec![3, 1]);
    }

    #[test]
    fn test_category_filter_ascending() {
        let filter = TransactionFilter {
            category_id: Some(10),
            ascending: true,
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&sample())), vec![1, 3]);
    }

    #[test]
    fn test_list_state_reapplies_on_every_change() {
        let mut list = TransactionList::default();
        list.set_transactions(sample());
        assert_eq!(ids(list.visible()), vec![3, 2, 1]);

        list.set_kind(Some(Kind::Income));
        assert_eq!(ids(list.visible()), vec![2]);

        list.set_kind(None);
        list.set_ascending(true);
        assert_eq!(ids(list.visible()), vec![1, 2, 3]);

        list.set_transactions(vec![test_model(9, 10, Kind::Expense, 1.0)]);
        assert_eq!(ids(list.visible()), vec![9]);
        assert!(list.filter().ascending);
    }
}
