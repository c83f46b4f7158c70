use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CredentialsError {
    #[error("username cannot be empty")]
    EmptyUsername,

    #[error("password cannot be empty")]
    EmptyPassword,
}

/// Stored credential record for one user.
///
/// Passwords are kept as entered to match the persisted document shape;
/// hashing is out of scope for this offline tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates a credential record, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `CredentialsError` if either field is blank after trimming.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CredentialsError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(CredentialsError::EmptyUsername);
        }
        let password = password.into();
        if password.trim().is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }

        Ok(Self {
            username: username.trim().to_owned(),
            password: password.trim().to_owned(),
        })
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn password_matches(&self, attempt: &str) -> bool {
        self.password == attempt
    }
}
