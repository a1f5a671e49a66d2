use actix_web::{web, HttpResponse, Responder};

use crate::{
    entities::testimonial::NewTestimonial,
    use_cases::extractors::AdminClaims,
    AppState,
};

pub async fn list_testimonials(state: web::Data<AppState>) -> impl Responder {
    match state.testimonial_handler.list_testimonials().await {
        Ok(testimonials) => HttpResponse::Ok().json(testimonials),
        Err(e) => e.to_http_response(),
    }
}

pub async fn get_testimonial(
    state: web::Data<AppState>,
    testimonial_id: web::Path<i64>,
) -> impl Responder {
    match state
        .testimonial_handler
        .get_testimonial(testimonial_id.into_inner())
        .await
    {
        Ok(testimonial) => HttpResponse::Ok().json(testimonial),
        Err(e) => e.to_http_response(),
    }
}

// Writes require a privileged session; reads stay public.
pub async fn create_testimonial(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    testimonial: web::Json<NewTestimonial>,
) -> impl Responder {
    match state
        .testimonial_handler
        .create_testimonial(testimonial.into_inner())
        .await
    {
        Ok(created) => HttpResponse::Created().json(created),
        Err(e) => e.to_http_response(),
    }
}

pub async fn update_testimonial(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    testimonial_id: web::Path<i64>,
    testimonial: web::Json<NewTestimonial>,
) -> impl Responder {
    match state
        .testimonial_handler
        .update_testimonial(testimonial_id.into_inner(), testimonial.into_inner())
        .await
    {
        Ok(updated) => HttpResponse::Ok().json(updated),
        Err(e) => e.to_http_response(),
    }
}

pub async fn delete_testimonial(
    state: web::Data<AppState>,
    testimonial_id: web::Path<i64>,
) -> impl Responder {
    match state
        .testimonial_handler
        .delete_testimonial(testimonial_id.into_inner())
        .await
    {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Testimonial deleted successfully"
        })),
        Err(e) => e.to_http_response(),
    }
}
