use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use derive_more::Display;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use serde::Serialize;
use serde_json::json;
use validator::ValidationErrors;

/// One caller-fixable input problem, echoed back in 400 bodies.
#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Display)]
pub enum AppError {
    #[display("validation failed on {} field(s)", _0.len())]
    ValidationError(Vec<FieldError>),

    #[display("{_0}")]
    NotFound(String),

    #[display("{_0}")]
    Conflict(String),

    #[display("internal error: {_0}")]
    InternalError(String),
}

impl AppError {
    pub fn to_http_response(&self) -> HttpResponse {
        self.error_response()
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());

        match self {
            AppError::ValidationError(details) => builder.json(json!({
                "error": "Validation failed",
                "details": details,
            })),
            // The diagnostic stays in the server log; callers get a
            // generic body.
            AppError::InternalError(detail) => {
                tracing::error!("{detail}");
                builder.json(json!({ "error": "Internal server error" }))
            }
            AppError::NotFound(message) | AppError::Conflict(message) => {
                builder.json(json!({ "error": message }))
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .iter()
            .flat_map(|(field, failures)| {
                failures.iter().map(|failure| FieldError {
                    field: field.to_string(),
                    message: failure
                        .message
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| format!("failed the `{}` rule", failure.code)),
                })
            })
            .collect();

        AppError::ValidationError(details)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => {
                AppError::NotFound("requested row does not exist".into())
            }
            sqlx::Error::Database(db) => match db.code().as_deref() {
                Some("23505") => {
                    AppError::Conflict("a record with this key already exists".into())
                }
                Some("23503") => {
                    AppError::Conflict("operation violates a foreign key".into())
                }
                _ => AppError::InternalError(format!("database error: {}", db.message())),
            },
            other => AppError::InternalError(format!("database error: {other}")),
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

#[derive(Debug, Display)]
pub enum AuthError {
    #[display("Invalid email or password")]
    WrongCredentials,

    #[display("Authentication required")]
    MissingCredentials,

    #[display("Invalid access token")]
    InvalidToken,

    #[display("Access token has expired")]
    TokenExpired,

    #[display("Could not issue access token")]
    TokenCreation,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::TokenCreation => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        if matches!(err.kind(), ErrorKind::ExpiredSignature) {
            AuthError::TokenExpired
        } else {
            AuthError::InvalidToken
        }
    }
}

// A login body that fails shape validation is treated the same as absent
// credentials.
impl From<ValidationErrors> for AuthError {
    fn from(_: ValidationErrors) -> Self {
        AuthError::MissingCredentials
    }
}

#[derive(Debug, Display)]
pub enum PasswordError {
    #[display("unusable hashing parameters: {_0}")]
    InvalidParameters(String),

    #[display("hashing failed: {_0}")]
    HashingError(String),

    #[display("stored hash is not a valid PHC string: {_0}")]
    InvalidHashFormat(String),

    #[display("verification failed: {_0}")]
    VerificationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            AppError::ValidationError(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("gone".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("dup".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InternalError("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn auth_failures_are_unauthorized_except_token_creation() {
        assert_eq!(
            AuthError::WrongCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::TokenExpired.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::TokenCreation.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_errors_keep_their_field_names() {
        let mut source = ValidationErrors::new();
        source.add("fullname", ValidationError::new("blank"));

        let AppError::ValidationError(details) = AppError::from(source) else {
            panic!("expected a validation error");
        };

        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field, "fullname");
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(
            AppError::from(sqlx::Error::RowNotFound),
            AppError::NotFound(_)
        ));
    }
}
