use serde::{Deserialize, Serialize};
use validator::Validate;

/// Access-token payload: the opaque session subject handed back to the
/// front end after a successful admin login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
}

impl AuthResponse {
    pub fn new(access_token: String) -> Self {
        AuthResponse {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginAdmin {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}
