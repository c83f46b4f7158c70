use std::sync::Arc;

use quiz_core::model::Credentials;
use storage::repository::UserRepository;

use crate::error::AuthError;

/// How a successful login resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Username and password matched an existing account.
    SignedIn,
    /// Unknown username; an account was created with the given password.
    AccountCreated,
}

/// Username and password checks against the user store.
///
/// A login with an unseen username registers it on the spot, so there is no
/// separate sign-up step.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
}

impl AuthService {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Sign a user in, creating the account when the username is new.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Credentials` for blank fields,
    /// `AuthError::IncorrectPassword` when the username exists with a
    /// different password, and storage errors from the user store.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let credentials = Credentials::new(username, password)?;

        match self.users.get_user(credentials.username()).await? {
            Some(existing) => {
                if existing.password_matches(credentials.password()) {
                    Ok(LoginOutcome::SignedIn)
                } else {
                    Err(AuthError::IncorrectPassword)
                }
            }
            None => {
                self.users.upsert_user(&credentials).await?;
                Ok(LoginOutcome::AccountCreated)
            }
        }
    }
}
