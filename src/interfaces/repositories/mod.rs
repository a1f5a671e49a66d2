pub mod admin;
pub mod profile;
pub mod sqlx_repo;
pub mod testimonial;
pub mod token;
