use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::user::validate_email;

/// The authenticated identity plus its bearer token, as returned by
/// `POST /auth/login` and `POST /auth/register`. Persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub token: String,
}

impl Session {
    /// "First Last"
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Uppercase first letters of first and last name.
    #[must_use]
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .next()
            .into_iter()
            .chain(self.last_name.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(CoreError::ValidationError("Password is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.first_name.trim().is_empty() {
            return Err(CoreError::ValidationError("First name is required".into()));
        }
        if self.last_name.trim().is_empty() {
            return Err(CoreError::ValidationError("Last name is required".into()));
        }
        validate_email(&self.email)?;
        if self.password.chars().count() < 6 {
            return Err(CoreError::ValidationError(
                "Password must be at least 6 characters".into(),
            ));
        }
        Ok(())
    }
}
