mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases, validation};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db};

use auth::jwt::JwtService;
use repositories::sqlx_repo::{SqlxAdminRepo, SqlxProfileRepo, SqlxTestimonialRepo};
use use_cases::auth::AuthHandler;
use use_cases::profile::ProfileHandler;
use use_cases::testimonial::TestimonialHandler;

pub type AppAuthHandler = AuthHandler<SqlxAdminRepo, JwtService>;
pub type AppProfileHandler = ProfileHandler<SqlxProfileRepo>;
pub type AppTestimonialHandler = TestimonialHandler<SqlxTestimonialRepo>;

pub struct AppState {
    pub auth_handler: AppAuthHandler,
    pub profile_handler: AppProfileHandler,
    pub testimonial_handler: AppTestimonialHandler,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let jwt_service = JwtService::new(config);
        let auth_handler = AuthHandler::new(SqlxAdminRepo::new(pool.clone()), jwt_service);
        let profile_handler = ProfileHandler::new(SqlxProfileRepo::new(pool.clone()));
        let testimonial_handler = TestimonialHandler::new(SqlxTestimonialRepo::new(pool));

        AppState {
            auth_handler,
            profile_handler,
            testimonial_handler,
        }
    }
}
