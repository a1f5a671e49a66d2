use std::{
    rc::Rc,
    task::{Context, Poll},
};

use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, StatusCode},
    web, Error, HttpMessage,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::{handlers::json_error::json_error, AppState};

/// Decodes a bearer token, when one is present, and parks its claims in the
/// request extensions for the `AdminClaims` extractor. Requests without a
/// token pass through untouched: most of the API is public and privileged
/// handlers enforce the session themselves.
pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerClaimsService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerClaimsService {
            inner: Rc::new(service),
        }))
    }
}

pub struct BearerClaimsService<S> {
    inner: Rc<S>,
}

impl<S> Service<ServiceRequest> for BearerClaimsService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let inner = Rc::clone(&self.inner);

        Box::pin(async move {
            let Some(token) = bearer_token(&req) else {
                return inner.call(req).await;
            };

            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                tracing::error!("AppState is not registered; cannot decode bearer tokens");
                let response = json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    "request cannot be authenticated",
                );
                return Ok(req.into_response(response));
            };

            match state.auth_handler.token_service.decode_jwt(&token) {
                Ok(decoded) => {
                    req.extensions_mut().insert(decoded.claims);
                    inner.call(req).await
                }
                Err(err) => {
                    tracing::warn!("Rejected bearer token: {err}");
                    let response =
                        json_error(StatusCode::UNAUTHORIZED, "Unauthorized", &err.to_string());
                    Ok(req.into_response(response))
                }
            }
        })
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let header = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty())
        .then(|| token.to_string())
}
