//! Form state and validation for the add/edit, category and auth screens.
//!
//! Each form is a plain owned struct with named transitions. Validation runs before
//! anything touches the store; on failure the form records a display message and
//! keeps every field as the user left it.

use chrono::{DateTime, Utc};
use email_address::EmailAddress;

use crate::db::{CategoryDraft, TransactionDraft};
use crate::entities::{Kind, category, transaction};
use crate::errors::{Error, Result};

/// Colors offered when creating a category.
pub const CATEGORY_COLORS: [&str; 12] = [
    "#FF5733", "#33FF57", "#3357FF", "#FF33F5", "#F5FF33", "#33FFF5", "#FF8C33", "#8C33FF",
    "#33FF8C", "#FF3333", "#33FF33", "#3333FF",
];

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Parses a user-typed amount. Accepts a leading `$` and `,` separators.
#[must_use]
pub fn parse_amount(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|amount| amount.is_finite())
}

/// Whether `color` looks like `#RRGGBB`.
#[must_use]
pub fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Categories offered for a transaction of `kind`.
#[must_use]
pub fn categories_for_kind(categories: &[category::Model], kind: Kind) -> Vec<category::Model> {
    categories.iter().filter(|c| c.kind == kind).cloned().collect()
}

/// State of the add/edit transaction screen.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionForm {
    /// Id of the transaction being edited, `None` when adding
    pub editing: Option<i64>,
    /// Amount as typed
    pub amount: String,
    /// Income or expense
    pub kind: Kind,
    /// Chosen category
    pub category_id: Option<i64>,
    /// When the transaction happened
    pub date: DateTime<Utc>,
    /// Free-text note
    pub note: String,
    /// Last validation or save error, for display
    pub error: Option<String>,
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl TransactionForm {
    /// An empty expense form dated `date`.
    #[must_use]
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            editing: None,
            amount: String::new(),
            kind: Kind::Expense,
            category_id: None,
            date,
            note: String::new(),
            error: None,
        }
    }

    /// A form pre-filled from a stored transaction, for the edit flow.
    #[must_use]
    pub fn load(model: &transaction::Model) -> Self {
        Self {
            editing: Some(model.id),
            amount: model.amount.to_string(),
            kind: model.kind,
            category_id: Some(model.category_id),
            date: model.date,
            note: model.note.clone(),
            error: None,
        }
    }

    /// Updates the typed amount.
    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount = amount.into();
    }

    /// Switches kind. The chosen category belonged to the other kind, so it is cleared.
    pub fn set_kind(&mut self, kind: Kind) {
        if self.kind != kind {
            self.category_id = None;
        }
        self.kind = kind;
    }

    /// Chooses a category.
    pub fn set_category(&mut self, category_id: i64) {
        self.category_id = Some(category_id);
    }

    /// Sets the occurrence date.
    pub fn set_date(&mut self, date: DateTime<Utc>) {
        self.date = date;
    }

    /// Updates the note.
    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    /// Validates the form and produces a draft for `user_id`.
    ///
    /// On failure the error message is also stored in [`Self::error`].
    pub fn to_draft(&mut self, user_id: &str) -> Result<TransactionDraft> {
        let result = self.validate(user_id);
        self.error = result.as_ref().err().map(ToString::to_string);
        result
    }

    fn validate(&self, user_id: &str) -> Result<TransactionDraft> {
        let amount = parse_amount(&self.amount)
            .filter(|amount| *amount > 0.0)
            .ok_or_else(|| Error::validation("amount", "Please enter a valid amount"))?;
        let category_id = self
            .category_id
            .ok_or_else(|| Error::validation("category", "Please select a category"))?;

        Ok(TransactionDraft {
            id: self.editing,
            user_id: user_id.to_string(),
            amount,
            kind: self.kind,
            date: self.date,
            category_id,
            note: self.note.trim().to_string(),
        })
    }

    /// Records a failure reported by the store, leaving the fields untouched.
    pub fn fail(&mut self, error: &Error) {
        self.error = Some(error.to_string());
    }
}

/// State of the "add category" dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryForm {
    /// Name as typed
    pub name: String,
    /// Which kind of transaction the category is for
    pub kind: Kind,
    /// Chosen color
    pub color: String,
    /// Last validation error, for display
    pub error: Option<String>,
}

impl CategoryForm {
    /// An empty form for a category of `kind`, preset to the first palette color.
    #[must_use]
    pub fn new(kind: Kind) -> Self {
        Self {
            name: String::new(),
            kind,
            color: CATEGORY_COLORS[0].to_string(),
            error: None,
        }
    }

    /// Validates the form and produces a draft for `user_id`.
    pub fn to_draft(&mut self, user_id: &str) -> Result<CategoryDraft> {
        let result = self.validate(user_id);
        self.error = result.as_ref().err().map(ToString::to_string);
        result
    }

    fn validate(&self, user_id: &str) -> Result<CategoryDraft> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::validation("name", "Category name cannot be empty"));
        }
        if !is_hex_color(&self.color) {
            return Err(Error::validation("color", "Color must look like #RRGGBB"));
        }
        Ok(CategoryDraft {
            id: None,
            user_id: user_id.to_string(),
            name: name.to_string(),
            kind: self.kind,
            color: self.color.to_uppercase(),
        })
    }
}

/// Email and password as typed on the login screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

impl LoginForm {
    /// Checks both fields are present and the email is well-formed.
    pub fn validate(&self) -> Result<()> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(Error::validation("email", "Email is required"));
        }
        if !EmailAddress::is_valid(email) {
            return Err(Error::validation("email", "Invalid email format"));
        }
        if self.password.trim().is_empty() {
            return Err(Error::validation("password", "Password is required"));
        }
        Ok(())
    }
}

/// Fields of the sign-up screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignUpForm {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
    /// Password, typed again
    pub confirm_password: String,
}

impl SignUpForm {
    /// Checks the email, password length and confirmation.
    pub fn validate(&self) -> Result<()> {
        if !EmailAddress::is_valid(self.email.trim()) {
            return Err(Error::validation("email", "Please enter a valid email"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(Error::validation(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
            ));
        }
        if self.password != self.confirm_password {
            return Err(Error::validation(
                "confirm_password",
                "Passwords do not match",
            ));
        }
        Ok(())
    }
}
