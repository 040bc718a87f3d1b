use serde::Deserialize;
use uuid::Uuid;

use crate::auth::service::is_valid_email;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    pub name: String,
    pub email: String,
    pub body: String,
}

impl CreateCommentRequest {
    pub fn normalize(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.body = self.body.trim().to_string();
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        check_name(&self.name)?;
        check_email(&self.email)?;
        check_comment_body(&self.body)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub body: Option<String>,
}

impl UpdateCommentRequest {
    pub fn normalize(mut self) -> Self {
        self.name = self.name.map(|v| v.trim().to_string());
        self.email = self.email.map(|v| v.trim().to_lowercase());
        self.body = self.body.map(|v| v.trim().to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            check_name(name)?;
        }
        if let Some(email) = &self.email {
            check_email(email)?;
        }
        if let Some(body) = &self.body {
            check_comment_body(body)?;
        }
        Ok(())
    }
}

fn check_name(name: &str) -> Result<(), ApiError> {
    if !(2..=100).contains(&name.chars().count()) {
        return Err(ApiError::Validation("name must be 2-100 characters".into()));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), ApiError> {
    if !is_valid_email(email) {
        return Err(ApiError::Validation("invalid email".into()));
    }
    Ok(())
}

fn check_comment_body(body: &str) -> Result<(), ApiError> {
    if !(5..=1000).contains(&body.chars().count()) {
        return Err(ApiError::Validation(
            "body must be 5-1000 characters".into(),
        ));
    }
    Ok(())
}
