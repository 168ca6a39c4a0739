/// Account flows and starter categories
pub mod account;
/// Transaction list filtering and sorting
pub mod filter;
/// Form state and input validation
pub mod forms;
/// Day and month boundaries
pub mod period;
/// Balance, totals and spending breakdowns
pub mod summary;
