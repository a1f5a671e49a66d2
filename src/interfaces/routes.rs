use actix_web::web;

use crate::handlers::home::home;

mod admin;
mod auth;
mod json_error;
mod profiles;
mod testimonials;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope("/api")
            .configure(auth::config_routes)
            .configure(admin::config_routes)
            .configure(profiles::config_routes)
            .configure(testimonials::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
