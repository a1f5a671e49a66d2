use validator::Validate;

use crate::entities::profile::{NewProfile, ProfileResponse, UpdateProfile};
use crate::errors::AppError;
use crate::repositories::profile::ProfileRepository;

pub struct ProfileHandler<R>
where
    R: ProfileRepository,
{
    pub profile_repo: R,
}

impl<R> ProfileHandler<R>
where
    R: ProfileRepository,
{
    pub fn new(profile_repo: R) -> Self {
        ProfileHandler { profile_repo }
    }

    /// Lists profiles with children, optionally filtered by a search term.
    pub async fn list_profiles(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<ProfileResponse>, AppError> {
        self.profile_repo.list_profiles(search).await
    }

    pub async fn get_profile(&self, id: i64) -> Result<ProfileResponse, AppError> {
        self.profile_repo
            .get_profile_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))
    }

    /// Creates a profile together with all supplied children.
    pub async fn create_profile(&self, request: NewProfile) -> Result<ProfileResponse, AppError> {
        request.validate()?;

        let insert = request.prepare_for_insert();

        self.profile_repo
            .create_profile(&insert, &request.education, &request.experience, &request.portfolio)
            .await
    }

    /// Partial update: absent scalars keep their value, supplied child
    /// collections replace the stored set wholesale.
    pub async fn update_profile(
        &self,
        id: i64,
        request: UpdateProfile,
    ) -> Result<ProfileResponse, AppError> {
        request.validate()?;

        self.profile_repo.update_profile(id, &request).await
    }

    pub async fn set_availability(
        &self,
        id: i64,
        available: bool,
    ) -> Result<ProfileResponse, AppError> {
        self.profile_repo.update_availability(id, available).await
    }

    pub async fn delete_profile(&self, id: i64) -> Result<ProfileResponse, AppError> {
        self.profile_repo.delete_profile(id).await
    }
}
