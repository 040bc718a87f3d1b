use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::repo::User;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// Trim identifiers and lowercase the email before the core sees them.
    pub fn normalize(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self
    }
}

/// Request body for login. `username` accepts a username or an email.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_lowercases_email() {
        let req = RegisterRequest {
            username: "  johndoe ".into(),
            name: " John Doe ".into(),
            email: " JOHN@X.COM ".into(),
            password: "Password1!".into(),
        };
        let req = req.normalize();
        assert_eq!(req.username, "johndoe");
        assert_eq!(req.name, "John Doe");
        assert_eq!(req.email, "john@x.com");
        assert_eq!(req.password, "Password1!");
    }

    #[test]
    fn auth_response_uses_camel_case_on_the_wire() {
        let resp = AuthResponse {
            access_token: "tok".into(),
            user: PublicUser {
                id: Uuid::new_v4(),
                username: "johndoe".into(),
                name: "John Doe".into(),
                email: "john@x.com".into(),
            },
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"accessToken\""));
        assert!(json.contains("\"john@x.com\""));
    }
}
