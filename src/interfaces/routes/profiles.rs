use actix_web::web;

use crate::handlers::profiles;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/profile")
            .service(
                web::resource("")
                    .route(web::get().to(profiles::list_profiles))
                    .route(web::post().to(profiles::create_profile))
            )
            .service(
                web::resource("/{profile_id}")
                    .route(web::get().to(profiles::get_profile))
                    .route(web::put().to(profiles::update_profile))
                    .route(web::delete().to(profiles::delete_profile))
            )
            .service(
                web::resource("/{profile_id}/availability")
                    .route(web::patch().to(profiles::update_availability))
            )
    );
}
