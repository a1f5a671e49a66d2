use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

const MAX_ATTEMPTS: u32 = 5;

/// Builds the process-wide pool, retrying with exponential backoff so the
/// service survives a database that comes up slightly after it does.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let mut delay = Duration::from_secs(2);
    let mut attempt = 1;

    loop {
        match PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
        {
            Ok(pool) => {
                tracing::info!("Connected to Postgres");
                return Ok(pool);
            }
            Err(err) if attempt < MAX_ATTEMPTS => {
                tracing::warn!(
                    "Postgres not reachable (attempt {attempt}/{MAX_ATTEMPTS}): {err}; retrying in {}s",
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
