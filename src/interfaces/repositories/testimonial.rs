use async_trait::async_trait;

use crate::{
    entities::testimonial::{Testimonial, TestimonialInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxTestimonialRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TestimonialRepository: Send + Sync {
    /// All testimonials, newest first.
    async fn list_testimonials(&self) -> Result<Vec<Testimonial>, AppError>;

    async fn get_testimonial_by_id(&self, id: i64) -> Result<Option<Testimonial>, AppError>;

    async fn create_testimonial(&self, testimonial: &TestimonialInsert) -> Result<Testimonial, AppError>;

    /// Overwrites all four mutable fields; NotFound when the id is absent.
    async fn update_testimonial(
        &self,
        id: i64,
        testimonial: &TestimonialInsert,
    ) -> Result<Testimonial, AppError>;

    async fn delete_testimonial(&self, id: i64) -> Result<(), AppError>;
}

impl SqlxTestimonialRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxTestimonialRepo { pool }
    }
}

#[async_trait]
impl TestimonialRepository for SqlxTestimonialRepo {
    async fn list_testimonials(&self) -> Result<Vec<Testimonial>, AppError> {
        let testimonials = sqlx::query_as::<_, Testimonial>(
            "SELECT * FROM testimonials ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(testimonials)
    }

    async fn get_testimonial_by_id(&self, id: i64) -> Result<Option<Testimonial>, AppError> {
        let testimonial = sqlx::query_as::<_, Testimonial>(
            "SELECT * FROM testimonials WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(testimonial)
    }

    async fn create_testimonial(&self, testimonial: &TestimonialInsert) -> Result<Testimonial, AppError> {
        let created = sqlx::query_as::<_, Testimonial>(
            r#"
            INSERT INTO testimonials (fullname, "function", comments, rate)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&testimonial.fullname)
        .bind(&testimonial.job_title)
        .bind(&testimonial.comments)
        .bind(testimonial.rate)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update_testimonial(
        &self,
        id: i64,
        testimonial: &TestimonialInsert,
    ) -> Result<Testimonial, AppError> {
        sqlx::query_as::<_, Testimonial>(
            r#"
            UPDATE testimonials
            SET fullname = $2, "function" = $3, comments = $4, rate = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&testimonial.fullname)
        .bind(&testimonial.job_title)
        .bind(&testimonial.comments)
        .bind(testimonial.rate)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Testimonial {} not found", id)))
    }

    async fn delete_testimonial(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM testimonials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|result| {
                if result.rows_affected() == 0 {
                    Err(AppError::NotFound(format!("Testimonial {} not found", id)))
                } else {
                    Ok(())
                }
            })?
    }
}
