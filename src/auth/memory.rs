//! In-process identity provider for the bootstrap binary and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::{debug, info};

use super::{AuthProvider, User};
use crate::errors::{Error, Result};

#[derive(Debug, Default)]
struct Accounts {
    by_email: HashMap<String, (String, String)>,
    signed_in: Option<User>,
}

/// An [`AuthProvider`] that keeps accounts in process memory.
///
/// Used by the bootstrap binary and the tests. Emails are matched case-insensitively;
/// ids are handed out as `user-1`, `user-2`, ...
#[derive(Debug, Default)]
pub struct InMemoryAuthProvider {
    accounts: Mutex<Accounts>,
    next_id: AtomicU64,
}

impl InMemoryAuthProvider {
    /// Creates a provider with no accounts and nobody signed in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn accounts(&self) -> MutexGuard<'_, Accounts> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn auth_error(message: &str) -> Error {
    Error::Auth {
        message: message.to_string(),
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn login(&self, email: &str, password: &str) -> Result<User> {
        let key = email.trim().to_lowercase();
        let mut accounts = self.accounts();
        let id = match accounts.by_email.get(&key) {
            Some((id, stored)) if stored == password => id.clone(),
            _ => return Err(auth_error("Invalid email or password")),
        };

        let user = User {
            id,
            email: Some(key),
        };
        accounts.signed_in = Some(user.clone());
        info!(user_id = %user.id, "User signed in");
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<User> {
        let key = email.trim().to_lowercase();
        let mut accounts = self.accounts();
        if accounts.by_email.contains_key(&key) {
            return Err(auth_error(
                "The email address is already in use by another account",
            ));
        }

        let id = format!("user-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        accounts
            .by_email
            .insert(key.clone(), (id.clone(), password.to_string()));
        let user = User {
            id,
            email: Some(key),
        };
        accounts.signed_in = Some(user.clone());
        info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    fn sign_out(&self) {
        if let Some(user) = self.accounts().signed_in.take() {
            debug!(user_id = %user.id, "User signed out");
        }
    }

    fn current_user_id(&self) -> Option<String> {
        self.accounts().signed_in.as_ref().map(|u| u.id.clone())
    }

    fn current_user_email(&self) -> Option<String> {
        self.accounts()
            .signed_in
            .as_ref()
            .and_then(|u| u.email.clone())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[tokio::test]
    async fn test_sign_up_signs_in() -> Result<()> {
        let auth = InMemoryAuthProvider::new();
        assert!(!auth.is_user_logged_in());

        let user = auth.sign_up("Me@Example.com", "secret").await?;
        assert_eq!(user.id, "user-1");
        assert!(auth.is_user_logged_in());
        assert_eq!(auth.current_user_id(), Some(user.id));
        assert_eq!(auth.current_user_email().as_deref(), Some("me@example.com"));
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_rejected() -> Result<()> {
        let auth = InMemoryAuthProvider::new();
        auth.sign_up("me@example.com", "secret").await?;
        assert!(matches!(
            auth.sign_up("ME@example.com", "other1").await,
            Err(Error::Auth { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_login_and_sign_out() -> Result<()> {
        let auth = InMemoryAuthProvider::new();
        let created = auth.sign_up("me@example.com", "secret").await?;
        auth.sign_out();
        assert!(!auth.is_user_logged_in());
        assert_eq!(auth.current_user_email(), None);

        assert!(matches!(
            auth.login("me@example.com", "wrong").await,
            Err(Error::Auth { .. })
        ));
        assert!(matches!(
            auth.login("nobody@example.com", "secret").await,
            Err(Error::Auth { .. })
        ));
        assert!(!auth.is_user_logged_in());

        let user = auth.login(" me@example.com", "secret").await?;
        assert_eq!(user.id, created.id);
        assert_eq!(auth.current_user_id(), Some(created.id));

        // Signing out twice is harmless.
        auth.sign_out();
        auth.sign_out();
        assert!(!auth.is_user_logged_in());
        Ok(())
    }

    #[tokio::test]
    async fn test_ids_are_distinct() -> Result<()> {
        let auth = InMemoryAuthProvider::new();
        let a = auth.sign_up("a@example.com", "secret").await?;
        let b = auth.sign_up("b@example.com", "secret").await?;
        assert_ne!(a.id, b.id);
        assert_eq!(auth.current_user_id(), Some(b.id));
        Ok(())
    }
}
