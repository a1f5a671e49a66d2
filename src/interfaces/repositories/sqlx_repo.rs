use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxProfileRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxTestimonialRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxAdminRepo {
    pub pool: PgPool,
}
