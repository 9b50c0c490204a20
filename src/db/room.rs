use crate::models::Room;
use sqlx::PgPool;

pub struct RoomRepository {
    pool: PgPool,
}

/// Fields an admin supplies when creating or updating a room. Validation
/// happens at the handler boundary; this is pure storage.
pub struct RoomInput {
    pub name: String,
    pub capacity: i32,
    pub hourly_rate: f64,
    pub facilities: Vec<String>,
    pub available_time_slots: Vec<String>,
    pub description: String,
    pub location: String,
}

impl RoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Room>, sqlx::Error> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn list(&self) -> Result<Vec<Room>, sqlx::Error> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn create(&self, input: &RoomInput) -> Result<Room, sqlx::Error> {
        let now = chrono::Utc::now().timestamp();
        sqlx::query_as::<_, Room>(
            "INSERT INTO rooms (name, capacity, hourly_rate, facilities, available_time_slots,
                                description, location, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
             RETURNING *",
        )
        .bind(&input.name)
        .bind(input.capacity)
        .bind(input.hourly_rate)
        .bind(&input.facilities)
        .bind(&input.available_time_slots)
        .bind(&input.description)
        .bind(&input.location)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update(&self, id: i64, input: &RoomInput) -> Result<Option<Room>, sqlx::Error> {
        let now = chrono::Utc::now().timestamp();
        sqlx::query_as::<_, Room>(
            "UPDATE rooms
             SET name = $1, capacity = $2, hourly_rate = $3, facilities = $4,
                 available_time_slots = $5, description = $6, location = $7, updated_at = $8
             WHERE id = $9
             RETURNING *",
        )
        .bind(&input.name)
        .bind(input.capacity)
        .bind(input.hourly_rate)
        .bind(&input.facilities)
        .bind(&input.available_time_slots)
        .bind(&input.description)
        .bind(&input.location)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM rooms")
            .fetch_one(&self.pool)
            .await
    }
}
