use serde::Deserialize;

use crate::auth::password;
use crate::auth::service::{is_valid_email, is_valid_username};
use crate::error::ApiError;

/// Partial profile update. A present password is re-hashed before it
/// reaches the repository.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn normalize(mut self) -> Self {
        self.username = self.username.map(|v| v.trim().to_string());
        self.name = self.name.map(|v| v.trim().to_string());
        self.email = self.email.map(|v| v.trim().to_lowercase());
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(username) = &self.username {
            if !is_valid_username(username) {
                return Err(ApiError::Validation(
                    "username must be 3-30 characters of letters, digits, '-' or '_'".into(),
                ));
            }
        }
        if let Some(name) = &self.name {
            if name.is_empty() {
                return Err(ApiError::Validation("name must not be empty".into()));
            }
        }
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                return Err(ApiError::Validation("invalid email".into()));
            }
        }
        if let Some(pw) = &self.password {
            if let Err(msg) = password::check_policy(pw) {
                return Err(ApiError::Validation(msg.into()));
            }
        }
        Ok(())
    }
}
