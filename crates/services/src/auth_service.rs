use std::sync::Arc;

use spell_core::model::{Email, Role};
use storage::repository::{AccountRepository, StorageError};

use crate::error::AuthError;

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Sign-up, sign-in and role lookup.
#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
}

impl AuthService {
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    /// Register a new account and record its role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail`, `AuthError::WeakPassword` or
    /// `AuthError::EmailInUse` for rejected input, `AuthError::Storage` otherwise.
    pub async fn sign_up(&self, email: &str, password: &str, role: Role) -> Result<Role, AuthError> {
        let email = Email::parse(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword {
                min: MIN_PASSWORD_LEN,
            });
        }

        match self.accounts.create_account(&email, password, role).await {
            Ok(()) => {}
            Err(StorageError::Conflict) => return Err(AuthError::EmailInUse),
            Err(err) => return Err(err.into()),
        }

        tracing::info!(email = %email, role = %role, "account created");
        Ok(role)
    }

    /// Check credentials and return the account's role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a wrong
    /// password, and `AuthError::RoleNotFound` if the account has no role.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Role, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;
        let stored = self
            .accounts
            .get_credentials(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if stored.password != password {
            tracing::debug!(email = %email, "sign-in rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let role = self
            .accounts
            .get_role(&email)
            .await?
            .ok_or(AuthError::RoleNotFound)?;
        tracing::info!(email = %email, role = %role, "signed in");
        Ok(role)
    }

    /// Role recorded for `email`, if any.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` for a malformed address and
    /// `AuthError::Storage` on backend failures.
    pub async fn get_role(&self, email: &str) -> Result<Option<Role>, AuthError> {
        let email = Email::parse(email)?;
        Ok(self.accounts.get_role(&email).await?)
    }
}
