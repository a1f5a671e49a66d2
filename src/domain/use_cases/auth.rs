use once_cell::sync::Lazy;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::entities::admin::AdminInsert;
use crate::entities::token::{AuthResponse, LoginAdmin};
use crate::errors::{AppError, AuthError};
use crate::repositories::admin::AdminRepository;
use crate::repositories::token::TokenService;

// Verified against when no admin matches the email, so both failure paths
// pay for a full argon2 verification.
static PHANTOM_HASH: Lazy<String> =
    Lazy::new(|| hash_password("phantom-credentials").unwrap_or_default());

pub struct AuthHandler<R, T>
where
    R: AdminRepository,
    T: TokenService,
{
    pub admin_repo: R,
    pub token_service: T,
}

impl<R, T> AuthHandler<R, T>
where
    R: AdminRepository,
    T: TokenService,
{
    pub fn new(admin_repo: R, token_service: T) -> Self {
        AuthHandler {
            admin_repo,
            token_service,
        }
    }

    /// Checks the supplied credentials against the stored admin record and
    /// issues an access token. Every failure collapses to
    /// `WrongCredentials` so callers cannot tell which check failed.
    pub async fn login(&self, request: LoginAdmin) -> Result<AuthResponse, AuthError> {
        request.validate()?;

        let admin = match self.admin_repo.find_admin_by_email(&request.email).await {
            Ok(Some(admin)) => admin,
            Ok(None) => {
                let _ = verify_password(&request.password, &PHANTOM_HASH);
                return Err(AuthError::WrongCredentials);
            }
            Err(_) => return Err(AuthError::WrongCredentials),
        };

        let is_password_valid = verify_password(&request.password, &admin.password_hash)
            .map_err(|_| AuthError::WrongCredentials)?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        let access_token = self.token_service.create_jwt(&admin).map_err(|e| {
            tracing::warn!("Failed to create JWT: {}", e);
            AuthError::TokenCreation
        })?;

        tracing::info!("Admin logged in successfully");
        Ok(AuthResponse::new(access_token))
    }

    /// Idempotent seed: creates the configured admin if no record with
    /// that email exists yet. The password is always hashed before it is
    /// stored.
    pub async fn bootstrap_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AppError> {
        if self.admin_repo.find_admin_by_email(email).await?.is_some() {
            tracing::info!("Admin already exists: {}", email);
            return Ok(());
        }

        let password_hash = hash_password(password)?;
        let admin = self
            .admin_repo
            .create_admin(&AdminInsert {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        tracing::info!("Admin created successfully: {}", admin.email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::admin::Admin;
    use crate::repositories::admin::MockAdminRepository;
    use crate::repositories::token::MockTokenService;

    fn stored_admin(password: &str) -> Admin {
        Admin {
            id: 1,
            name: "Admin tesseract".into(),
            email: "admin@tesseract.com".into(),
            password_hash: hash_password(password).unwrap(),
            created_at: chrono::Utc::now(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginAdmin {
        LoginAdmin {
            email: email.into(),
            password: password.into(),
        }
    }

    #[actix_rt::test]
    async fn login_with_valid_credentials_issues_a_token() {
        let admin = stored_admin("admintesseract123");

        let mut repo = MockAdminRepository::new();
        repo.expect_find_admin_by_email()
            .returning(move |_| Ok(Some(admin.clone())));

        let mut tokens = MockTokenService::new();
        tokens
            .expect_create_jwt()
            .returning(|_| Ok("signed-token".into()));

        let handler = AuthHandler::new(repo, tokens);

        let response = handler
            .login(login_request("admin@tesseract.com", "admintesseract123"))
            .await
            .unwrap();

        assert_eq!(response.access_token, "signed-token");
        assert_eq!(response.token_type, "bearer");
    }

    #[actix_rt::test]
    async fn wrong_password_and_unknown_email_fail_identically() {
        let admin = stored_admin("admintesseract123");

        let mut repo = MockAdminRepository::new();
        repo.expect_find_admin_by_email()
            .returning(move |email| {
                if email == "admin@tesseract.com" {
                    Ok(Some(admin.clone()))
                } else {
                    Ok(None)
                }
            });

        let mut tokens = MockTokenService::new();
        tokens.expect_create_jwt().times(0);

        let handler = AuthHandler::new(repo, tokens);

        let wrong_password = handler
            .login(login_request("admin@tesseract.com", "not-the-password"))
            .await;
        let unknown_email = handler
            .login(login_request("nobody@example.com", "anything"))
            .await;

        assert!(matches!(wrong_password, Err(AuthError::WrongCredentials)));
        assert!(matches!(unknown_email, Err(AuthError::WrongCredentials)));
    }

    #[actix_rt::test]
    async fn bootstrap_is_a_no_op_when_the_admin_exists() {
        let admin = stored_admin("admintesseract123");

        let mut repo = MockAdminRepository::new();
        repo.expect_find_admin_by_email()
            .returning(move |_| Ok(Some(admin.clone())));
        repo.expect_create_admin().times(0);

        let tokens = MockTokenService::new();
        let handler = AuthHandler::new(repo, tokens);

        handler
            .bootstrap_admin("Admin tesseract", "admin@tesseract.com", "admintesseract123")
            .await
            .unwrap();
    }

    #[actix_rt::test]
    async fn bootstrap_stores_a_hash_and_never_the_plaintext() {
        let mut repo = MockAdminRepository::new();
        repo.expect_find_admin_by_email().returning(|_| Ok(None));
        repo.expect_create_admin()
            .withf(|insert| {
                insert.password_hash != "admintesseract123"
                    && verify_password("admintesseract123", &insert.password_hash)
                        .unwrap_or(false)
            })
            .returning(|insert| {
                Ok(Admin {
                    id: 1,
                    name: insert.name.clone(),
                    email: insert.email.clone(),
                    password_hash: insert.password_hash.clone(),
                    created_at: chrono::Utc::now(),
                })
            });

        let tokens = MockTokenService::new();
        let handler = AuthHandler::new(repo, tokens);

        handler
            .bootstrap_admin("Admin tesseract", "admin@tesseract.com", "admintesseract123")
            .await
            .unwrap();
    }
}
