//! Sign-up, login and sign-out flows, plus the starter categories every new account
//! gets.

use tracing::{info, instrument};

use crate::auth::{AuthProvider, User};
use crate::core::forms::{LoginForm, SignUpForm};
use crate::db::CategoryDraft;
use crate::entities::Kind;
use crate::errors::{Error, Result};
use crate::repository::CategoryRepository;

/// Name, color and kind of the categories created for a new account.
pub const STARTER_CATEGORIES: [(&str, &str, Kind); 6] = [
    ("Food & Dining", "#FF5733", Kind::Expense),
    ("Transport", "#33C3FF", Kind::Expense),
    ("Shopping", "#9D33FF", Kind::Expense),
    ("Bills", "#F5FF33", Kind::Expense),
    ("Salary", "#4CAF50", Kind::Income),
    ("Other", "#808080", Kind::Expense),
];

/// Creates the starter categories for `user_id`.
///
/// Not idempotent: calling it twice gives the user two of each.
pub async fn seed_starter_categories(repo: &CategoryRepository, user_id: &str) -> Result<()> {
    for (name, color, kind) in STARTER_CATEGORIES {
        repo.insert(CategoryDraft {
            id: None,
            user_id: user_id.to_string(),
            name: name.to_string(),
            kind,
            color: color.to_string(),
        })
        .await?;
    }
    Ok(())
}

/// Validates the form, creates the account and seeds its categories.
///
/// Seeding happens only after the provider accepts the account; a validation or
/// provider failure leaves the store untouched.
#[instrument(skip_all)]
pub async fn sign_up(
    auth: &dyn AuthProvider,
    categories: &CategoryRepository,
    form: &SignUpForm,
) -> Result<User> {
    form.validate()?;
    let user = auth.sign_up(form.email.trim(), &form.password).await?;
    seed_starter_categories(categories, &user.id).await?;
    info!(user_id = %user.id, "New account ready");
    Ok(user)
}

/// Validates the form and signs in.
pub async fn login(auth: &dyn AuthProvider, form: &LoginForm) -> Result<User> {
    form.validate()?;
    auth.login(form.email.trim(), &form.password).await
}

/// Id of the signed-in user.
///
/// # Errors
/// [`Error::NotSignedIn`] when nobody is signed in.
pub fn current_user(auth: &dyn AuthProvider) -> Result<String> {
    auth.current_user_id().ok_or(Error::NotSignedIn)
}

/// Signs out. Data stays in the store for the next login.
pub fn sign_out(auth: &dyn AuthProvider) {
    auth.sign_out();
}
