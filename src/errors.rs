//! Unified error type for the finance tracker.
//!
//! Every fallible operation in the crate returns [`Result`]. Store failures are
//! converted into [`Error::Database`] at the accessor boundary so callers only ever
//! see a human-readable message, never a raw driver error.

use thiserror::Error;

/// All failures the finance tracker can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The underlying store rejected or failed an operation
    #[error("Database error: {message}")]
    Database {
        /// Human-readable description from the store
        message: String,
    },

    /// A monetary amount was zero, negative, or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A form field failed validation before reaching the store
    #[error("{message}")]
    Validation {
        /// Name of the offending field (`"form"` for form-level errors)
        field: &'static str,
        /// Message suitable for display next to the field
        message: String,
    },

    /// A category cannot be deleted while transactions still reference it
    #[error("Category has {count} transactions. Please reassign them first.")]
    HasReferences {
        /// Number of referencing transactions
        count: u64,
    },

    /// No category exists with the given id
    #[error("Category not found: {id}")]
    CategoryNotFound {
        /// The missing id
        id: i64,
    },

    /// No transaction exists with the given id
    #[error("Transaction not found: {id}")]
    TransactionNotFound {
        /// The missing id
        id: i64,
    },

    /// The identity provider refused or failed the request
    #[error("Authentication failed: {message}")]
    Auth {
        /// Message reported by the provider
        message: String,
    },

    /// An operation needed a signed-in user and there was none
    #[error("No user is signed in")]
    NotSignedIn,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a field-level validation failure.
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<sea_orm::DbErr> for Error {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::Database {
            message: value.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
