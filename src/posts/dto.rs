use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl CreatePostRequest {
    pub fn normalize(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.body = self.body.trim().to_string();
        self.author = self.author.trim().to_string();
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        check_title(&self.title)?;
        check_body(&self.body)?;
        check_author(&self.author)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub published: Option<bool>,
}

impl UpdatePostRequest {
    pub fn normalize(mut self) -> Self {
        self.title = self.title.map(|v| v.trim().to_string());
        self.body = self.body.map(|v| v.trim().to_string());
        self.author = self.author.map(|v| v.trim().to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            check_title(title)?;
        }
        if let Some(body) = &self.body {
            check_body(body)?;
        }
        if let Some(author) = &self.author {
            check_author(author)?;
        }
        Ok(())
    }
}

fn check_title(title: &str) -> Result<(), ApiError> {
    if !(3..=200).contains(&title.chars().count()) {
        return Err(ApiError::Validation(
            "title must be 3-200 characters".into(),
        ));
    }
    Ok(())
}

fn check_body(body: &str) -> Result<(), ApiError> {
    if body.chars().count() < 10 {
        return Err(ApiError::Validation(
            "body must be at least 10 characters".into(),
        ));
    }
    Ok(())
}

fn check_author(author: &str) -> Result<(), ApiError> {
    if !(2..=100).contains(&author.chars().count()) {
        return Err(ApiError::Validation(
            "author must be 2-100 characters".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CreatePostRequest {
        CreatePostRequest {
            title: "My first post".into(),
            body: "Long enough body text".into(),
            author: "John Doe".into(),
            tags: vec![],
            image_url: None,
            published: false,
        }
    }

    #[test]
    fn accepts_a_valid_post() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_short_title_and_body() {
        let mut req = valid();
        req.title = "ab".into();
        assert!(req.validate().is_err());

        let mut req = valid();
        req.body = "too short".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_validates_only_present_fields() {
        let patch = UpdatePostRequest {
            title: None,
            body: None,
            author: None,
            tags: Some(vec!["rust".into()]),
            image_url: None,
            published: Some(true),
        };
        assert!(patch.validate().is_ok());

        let patch = UpdatePostRequest {
            title: Some("ab".into()),
            body: None,
            author: None,
            tags: None,
            image_url: None,
            published: None,
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn create_defaults_tags_and_published() {
        let req: CreatePostRequest = serde_json::from_str(
            r#"{"title":"My first post","body":"Long enough body text","author":"John Doe"}"#,
        )
        .unwrap();
        assert!(req.tags.is_empty());
        assert!(!req.published);
        assert!(req.image_url.is_none());
    }
}
