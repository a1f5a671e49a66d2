use chrono::{DateTime, Utc};

// Deliberately not Serialize: admin records are used for authentication
// only and must never reach a client.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Admin {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct AdminInsert {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
