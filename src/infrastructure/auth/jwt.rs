use jsonwebtoken::{encode, Header, decode, Validation, TokenData, Algorithm};
use chrono::{Utc, Duration};

use crate::entities::admin::Admin;
use crate::entities::token::Claims;
use crate::repositories::token::TokenService;
use crate::settings::{AppConfig, JwtKeys};
use crate::errors::AuthError;

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_expiration: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
            access_expiration: Duration::minutes(config.jwt_expiration_minutes),
        }
    }

    pub fn create_jwt(&self, admin: &Admin) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = (now + self.access_expiration).timestamp() as usize;

        let claims = Claims {
            sub: admin.id.to_string(),
            name: admin.name.clone(),
            email: admin.email.clone(),
            iat: now.timestamp() as usize,
            exp,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding).map_err(AuthError::from)
    }

    pub fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        decode::<Claims>(
            token,
            &self.keys.decoding,
            &validation
        )
        .map_err(AuthError::from)
    }
}

impl TokenService for JwtService {
    fn create_jwt(&self, admin: &Admin) -> Result<String, AuthError> {
        self.create_jwt(admin)
    }

    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        self.decode_jwt(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AuthError;
    use crate::settings::{AppConfig, AppEnvironment};

    fn test_config(expiration_minutes: i64) -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "Tesseract Test".into(),
            port: 0,
            host: "127.0.0.1".into(),
            worker_count: 1,
            database_url: "postgres://localhost/unused".into(),
            cors_allowed_origins: vec!["*".into()],
            jwt_secret: "test_jwt_secret_that_is_long_enough_for_hs512_1234567890".into(),
            jwt_expiration_minutes: expiration_minutes,
            admin_name: "Admin tesseract".into(),
            admin_email: "admin@tesseract.com".into(),
            admin_password: "admintesseract123".into(),
        }
    }

    fn test_admin() -> Admin {
        Admin {
            id: 1,
            name: "Admin tesseract".into(),
            email: "admin@tesseract.com".into(),
            password_hash: "unused".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn create_and_decode_round_trip() {
        let service = JwtService::new(&test_config(10));

        let token = service.create_jwt(&test_admin()).unwrap();
        let decoded = service.decode_jwt(&token).unwrap();

        assert_eq!(decoded.claims.sub, "1");
        assert_eq!(decoded.claims.email, "admin@tesseract.com");
        assert_eq!(decoded.claims.name, "Admin tesseract");
    }

    #[test]
    fn expired_token_is_rejected() {
        // Negative expiration backdates the token past the leeway window.
        let service = JwtService::new(&test_config(-10));

        let token = service.create_jwt(&test_admin()).unwrap();

        assert!(matches!(
            service.decode_jwt(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let service = JwtService::new(&test_config(10));
        let mut other_config = test_config(10);
        other_config.jwt_secret =
            "another_secret_that_is_also_long_enough_0987654321".into();
        let other = JwtService::new(&other_config);

        let token = other.create_jwt(&test_admin()).unwrap();

        assert!(service.decode_jwt(&token).is_err());
    }
}
