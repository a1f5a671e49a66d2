use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::{
    entities::profile::{NewProfile, UpdateProfile},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub available: bool,
}

pub async fn list_profiles(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> impl Responder {
    match state
        .profile_handler
        .list_profiles(query.search.as_deref())
        .await
    {
        Ok(profiles) => HttpResponse::Ok().json(profiles),
        Err(e) => e.to_http_response(),
    }
}

pub async fn create_profile(
    state: web::Data<AppState>,
    profile: web::Json<NewProfile>,
) -> impl Responder {
    match state.profile_handler.create_profile(profile.into_inner()).await {
        Ok(created) => HttpResponse::Ok().json(created),
        Err(e) => e.to_http_response(),
    }
}

pub async fn get_profile(
    state: web::Data<AppState>,
    profile_id: web::Path<i64>,
) -> impl Responder {
    match state.profile_handler.get_profile(profile_id.into_inner()).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => e.to_http_response(),
    }
}

pub async fn update_profile(
    state: web::Data<AppState>,
    profile_id: web::Path<i64>,
    update: web::Json<UpdateProfile>,
) -> impl Responder {
    match state
        .profile_handler
        .update_profile(profile_id.into_inner(), update.into_inner())
        .await
    {
        Ok(updated) => HttpResponse::Ok().json(updated),
        Err(e) => e.to_http_response(),
    }
}

pub async fn update_availability(
    state: web::Data<AppState>,
    profile_id: web::Path<i64>,
    request: web::Json<AvailabilityRequest>,
) -> impl Responder {
    match state
        .profile_handler
        .set_availability(profile_id.into_inner(), request.available)
        .await
    {
        Ok(updated) => HttpResponse::Ok().json(updated),
        Err(e) => e.to_http_response(),
    }
}

/// Returns the deleted profile's last known representation.
pub async fn delete_profile(
    state: web::Data<AppState>,
    profile_id: web::Path<i64>,
) -> impl Responder {
    match state.profile_handler.delete_profile(profile_id.into_inner()).await {
        Ok(deleted) => HttpResponse::Ok().json(deleted),
        Err(e) => e.to_http_response(),
    }
}
