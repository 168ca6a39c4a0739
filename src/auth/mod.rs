//! Identity collaborator.
//!
//! The tracker never stores credentials itself. It asks an [`AuthProvider`] who is
//! signed in and scopes every read and write to that user's id.

use async_trait::async_trait;

use crate::errors::Result;

mod memory;

pub use memory::InMemoryAuthProvider;

/// A signed-in user as reported by the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    /// Opaque id that owns categories and transactions
    pub id: String,
    /// Email address, when the provider knows it
    pub email: Option<String>,
}

/// Remote identity service: email/password login, sign-up and sign-out.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Signs in with email and password.
    async fn login(&self, email: &str, password: &str) -> Result<User>;

    /// Creates an account and signs it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<User>;

    /// Signs the current user out. Does nothing when nobody is signed in.
    fn sign_out(&self);

    /// Id of the signed-in user, if any.
    fn current_user_id(&self) -> Option<String>;

    /// Email of the signed-in user, if any.
    fn current_user_email(&self) -> Option<String>;

    /// Whether anyone is signed in.
    fn is_user_logged_in(&self) -> bool {
        self.current_user_id().is_some()
    }
}
