use crate::models::{Role, User};
use sqlx::PgPool;

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Record the caller on every authenticated request, refreshing name and
    /// email from the identity provider. The stored role is never touched
    /// here; only an explicit admin action changes it.
    pub async fn upsert_identity(
        &self,
        id: &str,
        name: &str,
        email: &str,
    ) -> Result<User, sqlx::Error> {
        let now = chrono::Utc::now().timestamp();
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, role, created_at, updated_at)
             VALUES ($1, $2, $3, 'USER', $4, $4)
             ON CONFLICT (id) DO UPDATE
             SET name = EXCLUDED.name, email = EXCLUDED.email, updated_at = EXCLUDED.updated_at
             RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn list(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn set_role(&self, id: &str, role: Role) -> Result<Option<User>, sqlx::Error> {
        let now = chrono::Utc::now().timestamp();
        sqlx::query_as::<_, User>(
            "UPDATE users SET role = $1, updated_at = $2 WHERE id = $3 RETURNING *",
        )
        .bind(role)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
    }
}
