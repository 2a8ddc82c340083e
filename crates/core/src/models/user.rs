use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Body of `PUT /users/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl UpdateProfile {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "First and last name are required".into(),
            ));
        }
        validate_email(&self.email)
    }
}

/// Body of `POST /users/change-password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    pub current_password: String,
    pub new_password: String,
}

/// The change-password form. The confirmation never leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ChangePasswordForm {
    pub fn validate(&self) -> Result<ChangePassword, CoreError> {
        if self.current_password.is_empty() {
            return Err(CoreError::ValidationError(
                "Current password is required".into(),
            ));
        }
        if self.new_password.chars().count() < 6 {
            return Err(CoreError::ValidationError(
                "New password must be at least 6 characters".into(),
            ));
        }
        if self.new_password != self.confirm_password {
            return Err(CoreError::ValidationError("Passwords do not match".into()));
        }
        Ok(ChangePassword {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
        })
    }
}

/// Shape check only: one `@`, non-empty local part, dotted domain.
pub(crate) fn validate_email(email: &str) -> Result<(), CoreError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CoreError::ValidationError(format!(
            "'{email}' is not a valid email address"
        )))
    }
}
