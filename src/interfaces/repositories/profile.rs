use std::collections::HashMap;

use async_trait::async_trait;

use crate::{
    entities::profile::{
        Education, Experience, NewEducation, NewExperience, NewPortfolio, Portfolio,
        ProfileInsert, ProfileResponse, ProfileRow, UpdateProfile,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxProfileRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;

    /// All profiles with children, newest first. A search term filters on
    /// full name, role, any education degree or any experience title
    /// (case-insensitive contains).
    async fn list_profiles<'a>(
        &self,
        search: Option<&'a str>,
    ) -> Result<Vec<ProfileResponse>, AppError>;

    async fn get_profile_by_id(&self, id: i64) -> Result<Option<ProfileResponse>, AppError>;

    /// Inserts the profile row and every supplied child in one transaction.
    async fn create_profile(
        &self,
        profile: &ProfileInsert,
        education: &[NewEducation],
        experience: &[NewExperience],
        portfolio: &[NewPortfolio],
    ) -> Result<ProfileResponse, AppError>;

    /// Applies scalar updates; each supplied child collection wholesale
    /// replaces the stored set. Runs in one transaction so a partially
    /// replaced collection is never observable.
    async fn update_profile(
        &self,
        id: i64,
        update: &UpdateProfile,
    ) -> Result<ProfileResponse, AppError>;

    async fn update_availability(
        &self,
        id: i64,
        available: bool,
    ) -> Result<ProfileResponse, AppError>;

    /// Deletes children then the profile row in one transaction and
    /// returns the last known representation.
    async fn delete_profile(&self, id: i64) -> Result<ProfileResponse, AppError>;
}

impl SqlxProfileRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxProfileRepo { pool }
    }

    async fn attach_children(
        &self,
        rows: Vec<ProfileRow>,
    ) -> Result<Vec<ProfileResponse>, AppError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

        let education = sqlx::query_as::<_, Education>(
            "SELECT * FROM education WHERE profile_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let experience = sqlx::query_as::<_, Experience>(
            "SELECT * FROM experience WHERE profile_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let portfolio = sqlx::query_as::<_, Portfolio>(
            "SELECT * FROM portfolio WHERE profile_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut education_by_profile = group_by_profile(education, |e| e.profile_id);
        let mut experience_by_profile = group_by_profile(experience, |e| e.profile_id);
        let mut portfolio_by_profile = group_by_profile(portfolio, |p| p.profile_id);

        Ok(rows
            .into_iter()
            .map(|row| {
                let id = row.id;
                ProfileResponse::from_parts(
                    row,
                    education_by_profile.remove(&id).unwrap_or_default(),
                    experience_by_profile.remove(&id).unwrap_or_default(),
                    portfolio_by_profile.remove(&id).unwrap_or_default(),
                )
            })
            .collect())
    }
}

#[async_trait]
impl ProfileRepository for SqlxProfileRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn list_profiles<'a>(
        &self,
        search: Option<&'a str>,
    ) -> Result<Vec<ProfileResponse>, AppError> {
        let rows = match search.map(str::trim).filter(|term| !term.is_empty()) {
            Some(term) => {
                let pattern = format!("%{}%", escape_like(term));
                sqlx::query_as::<_, ProfileRow>(
                    r#"
                    SELECT p.* FROM profiles p
                    WHERE p.full_name ILIKE $1
                       OR p.role ILIKE $1
                       OR EXISTS (
                            SELECT 1 FROM education e
                            WHERE e.profile_id = p.id AND e.degree ILIKE $1
                          )
                       OR EXISTS (
                            SELECT 1 FROM experience x
                            WHERE x.profile_id = p.id AND x.title ILIKE $1
                          )
                    ORDER BY p.created_at DESC
                    "#,
                )
                .bind(pattern)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ProfileRow>(
                    "SELECT * FROM profiles ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        self.attach_children(rows).await
    }

    async fn get_profile_by_id(&self, id: i64) -> Result<Option<ProfileResponse>, AppError> {
        let row = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(self.attach_children(vec![row]).await?.into_iter().next())
    }

    async fn create_profile(
        &self,
        profile: &ProfileInsert,
        education: &[NewEducation],
        experience: &[NewExperience],
        portfolio: &[NewPortfolio],
    ) -> Result<ProfileResponse, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (full_name, role, about_me, image_url, available, stars)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&profile.full_name)
        .bind(&profile.role)
        .bind(&profile.about_me)
        .bind(&profile.image_url)
        .bind(profile.available)
        .bind(profile.stars)
        .fetch_one(&mut *tx)
        .await?;

        let mut created_education = Vec::with_capacity(education.len());
        for entry in education {
            created_education.push(insert_education(&mut tx, row.id, entry).await?);
        }

        let mut created_experience = Vec::with_capacity(experience.len());
        for entry in experience {
            created_experience.push(insert_experience(&mut tx, row.id, entry).await?);
        }

        let mut created_portfolio = Vec::with_capacity(portfolio.len());
        for entry in portfolio {
            created_portfolio.push(insert_portfolio(&mut tx, row.id, entry).await?);
        }

        tx.commit().await?;

        Ok(ProfileResponse::from_parts(
            row,
            created_education,
            created_experience,
            created_portfolio,
        ))
    }

    async fn update_profile(
        &self,
        id: i64,
        update: &UpdateProfile,
    ) -> Result<ProfileResponse, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, ProfileRow>(
            r#"
            UPDATE profiles SET
                full_name = COALESCE($2, full_name),
                role = COALESCE($3, role),
                about_me = COALESCE($4, about_me),
                image_url = COALESCE($5, image_url),
                available = COALESCE($6, available),
                stars = COALESCE($7, stars)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.full_name)
        .bind(&update.role)
        .bind(&update.about_me)
        .bind(&update.image_url)
        .bind(update.available)
        .bind(update.stars)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Err(AppError::NotFound(format!("Profile {} not found", id)));
        }

        // Supplied collections replace the stored set wholesale; omitted
        // collections stay untouched.
        if let Some(entries) = &update.education {
            sqlx::query("DELETE FROM education WHERE profile_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for entry in entries {
                insert_education(&mut tx, id, entry).await?;
            }
        }

        if let Some(entries) = &update.experience {
            sqlx::query("DELETE FROM experience WHERE profile_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for entry in entries {
                insert_experience(&mut tx, id, entry).await?;
            }
        }

        if let Some(entries) = &update.portfolio {
            sqlx::query("DELETE FROM portfolio WHERE profile_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for entry in entries {
                insert_portfolio(&mut tx, id, entry).await?;
            }
        }

        tx.commit().await?;

        self.get_profile_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))
    }

    async fn update_availability(
        &self,
        id: i64,
        available: bool,
    ) -> Result<ProfileResponse, AppError> {
        let result = sqlx::query("UPDATE profiles SET available = $2 WHERE id = $1")
            .bind(id)
            .bind(available)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Profile {} not found", id)));
        }

        self.get_profile_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))
    }

    async fn delete_profile(&self, id: i64) -> Result<ProfileResponse, AppError> {
        let profile = self
            .get_profile_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))?;

        // Explicit child deletes instead of relying on FK cascade, so the
        // all-or-nothing guarantee holds independent of schema options.
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM education WHERE profile_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM experience WHERE profile_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM portfolio WHERE profile_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(profile)
    }
}

async fn insert_education(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    profile_id: i64,
    entry: &NewEducation,
) -> Result<Education, AppError> {
    sqlx::query_as::<_, Education>(
        r#"
        INSERT INTO education (profile_id, school, degree, year)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(profile_id)
    .bind(&entry.school)
    .bind(&entry.degree)
    .bind(entry.year)
    .fetch_one(&mut **tx)
    .await
    .map_err(AppError::from)
}

async fn insert_experience(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    profile_id: i64,
    entry: &NewExperience,
) -> Result<Experience, AppError> {
    sqlx::query_as::<_, Experience>(
        r#"
        INSERT INTO experience (profile_id, title, company, start_year, end_year, description)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(profile_id)
    .bind(&entry.title)
    .bind(&entry.company)
    .bind(entry.start_year)
    .bind(entry.end_year)
    .bind(&entry.description)
    .fetch_one(&mut **tx)
    .await
    .map_err(AppError::from)
}

async fn insert_portfolio(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    profile_id: i64,
    entry: &NewPortfolio,
) -> Result<Portfolio, AppError> {
    sqlx::query_as::<_, Portfolio>(
        r#"
        INSERT INTO portfolio (profile_id, title, client, image_url, tech_stack)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(profile_id)
    .bind(&entry.title)
    .bind(&entry.client)
    .bind(&entry.image_url)
    .bind(&entry.tech_stack)
    .fetch_one(&mut **tx)
    .await
    .map_err(AppError::from)
}

fn group_by_profile<T, F>(items: Vec<T>, key: F) -> HashMap<i64, Vec<T>>
where
    F: Fn(&T) -> i64,
{
    let mut grouped: HashMap<i64, Vec<T>> = HashMap::new();
    for item in items {
        grouped.entry(key(&item)).or_default().push(item);
    }
    grouped
}

/// Escapes LIKE metacharacters so a search term only ever matches
/// literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
