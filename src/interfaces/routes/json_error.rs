use actix_web::{error::InternalError, http::StatusCode, web};

use crate::handlers::json_error::json_error;

// Actix's default extractor failures are plain text; these handlers make
// malformed bodies and non-numeric path ids surface as JSON 400s instead.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let response =
            json_error(StatusCode::BAD_REQUEST, "Malformed JSON body", &err.to_string());
        InternalError::from_response(err, response).into()
    }));

    cfg.app_data(web::PathConfig::default().error_handler(|err, _req| {
        let response =
            json_error(StatusCode::BAD_REQUEST, "Invalid path parameter", &err.to_string());
        InternalError::from_response(err, response).into()
    }));
}
