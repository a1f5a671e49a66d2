use jsonwebtoken::TokenData;

use crate::entities::admin::Admin;
use crate::entities::token::Claims;
use crate::errors::AuthError;

#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    fn create_jwt(&self, admin: &Admin) -> Result<String, AuthError>;
    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError>;
}
