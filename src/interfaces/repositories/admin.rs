use async_trait::async_trait;

use crate::{
    entities::admin::{Admin, AdminInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxAdminRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, AppError>;
    async fn create_admin(&self, admin: &AdminInsert) -> Result<Admin, AppError>;
}

impl SqlxAdminRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxAdminRepo { pool }
    }
}

#[async_trait]
impl AdminRepository for SqlxAdminRepo {
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, AppError> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admin)
    }

    async fn create_admin(&self, admin: &AdminInsert) -> Result<Admin, AppError> {
        let created = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&admin.name)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db) = &err {
                // The unique index on email makes a duplicate seed visible
                // here rather than as a generic failure.
                if db.code().as_deref() == Some("23505") {
                    return AppError::Conflict("admin email is already registered".to_string());
                }
            }
            AppError::from(err)
        })?;

        Ok(created)
    }
}
