use validator::Validate;

use crate::entities::testimonial::{NewTestimonial, Testimonial};
use crate::errors::AppError;
use crate::repositories::testimonial::TestimonialRepository;

pub struct TestimonialHandler<R>
where
    R: TestimonialRepository,
{
    pub testimonial_repo: R,
}

impl<R> TestimonialHandler<R>
where
    R: TestimonialRepository,
{
    pub fn new(testimonial_repo: R) -> Self {
        TestimonialHandler { testimonial_repo }
    }

    pub async fn list_testimonials(&self) -> Result<Vec<Testimonial>, AppError> {
        self.testimonial_repo.list_testimonials().await
    }

    pub async fn get_testimonial(&self, id: i64) -> Result<Testimonial, AppError> {
        self.testimonial_repo
            .get_testimonial_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Testimonial {} not found", id)))
    }

    pub async fn create_testimonial(
        &self,
        request: NewTestimonial,
    ) -> Result<Testimonial, AppError> {
        request.validate()?;

        self.testimonial_repo
            .create_testimonial(&request.prepare_for_insert())
            .await
    }

    /// Same validation as create; the body is validated before the target
    /// is looked up, so a bad payload wins over a missing id.
    pub async fn update_testimonial(
        &self,
        id: i64,
        request: NewTestimonial,
    ) -> Result<Testimonial, AppError> {
        request.validate()?;

        self.testimonial_repo
            .update_testimonial(id, &request.prepare_for_insert())
            .await
    }

    pub async fn delete_testimonial(&self, id: i64) -> Result<(), AppError> {
        self.testimonial_repo.delete_testimonial(id).await
    }
}
