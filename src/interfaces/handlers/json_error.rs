use actix_web::{http::StatusCode, HttpResponse};
use serde_json::json;

/// Uniform JSON error body used by the middleware and extractor handlers.
pub fn json_error(status: StatusCode, message: &str, details: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "error": message,
        "details": details,
    }))
}
