use crate::models::{Booking, BookingStatus};
use sqlx::PgPool;

pub struct BookingRepository {
    pool: PgPool,
}

pub struct NewBooking {
    pub room_id: i64,
    pub room_name: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub date: String,
    pub time_slot: String,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// All bookings for a room on one day, time-slot ascending.
    pub async fn list_for_room_date(
        &self,
        room_id: i64,
        date: &str,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE room_id = $1 AND date = $2 ORDER BY time_slot ASC",
        )
        .bind(room_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = $1 ORDER BY date DESC, time_slot ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn list_all(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        match status {
            Some(status) => {
                sqlx::query_as::<_, Booking>(
                    "SELECT * FROM bookings WHERE status = $1 ORDER BY date DESC, time_slot ASC",
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Booking>(
                    "SELECT * FROM bookings ORDER BY date DESC, time_slot ASC",
                )
                .fetch_all(&self.pool)
                .await
            }
        }
    }

    /// Snapshot for the auto-resolution pass. Ordered by creation time with
    /// id as tiebreaker so the first-wins policy is reproducible.
    pub async fn list_in_creation_order(&self) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn list_for_date(&self, date: &str) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE date = $1 ORDER BY time_slot ASC",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
    }

    /// True if any non-rejected booking holds the slot. The partial unique
    /// index is the real guard against a racing insert; this check exists to
    /// answer with a clean Conflict instead of a constraint error.
    pub async fn slot_taken(
        &self,
        room_id: i64,
        date: &str,
        time_slot: &str,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings
             WHERE room_id = $1 AND date = $2 AND time_slot = $3 AND status <> 'REJECTED'",
        )
        .bind(room_id)
        .bind(date)
        .bind(time_slot)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    pub async fn create(&self, new: &NewBooking) -> Result<Booking, sqlx::Error> {
        let now = chrono::Utc::now().timestamp();
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (room_id, room_name, user_id, user_name, user_email,
                                   date, time_slot, status, note, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'PENDING', '', $8, $8)
             RETURNING *",
        )
        .bind(new.room_id)
        .bind(&new.room_name)
        .bind(&new.user_id)
        .bind(&new.user_name)
        .bind(&new.user_email)
        .bind(&new.date)
        .bind(&new.time_slot)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    /// Apply a status transition, guarded on the row still being PENDING.
    /// Returns None if the booking was not PENDING at update time (or does
    /// not exist); callers distinguish the two with `get_by_id`.
    pub async fn transition_from_pending(
        &self,
        id: i64,
        status: BookingStatus,
        note: Option<&str>,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let now = chrono::Utc::now().timestamp();
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings
             SET status = $1, note = COALESCE($2, note), updated_at = $3
             WHERE id = $4 AND status = 'PENDING'
             RETURNING *",
        )
        .bind(status)
        .bind(note)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_for_room(&self, room_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE room_id = $1")
            .bind(room_id)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn count_all(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await
    }

    pub async fn count_by_status(&self, status: BookingStatus) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn count_for_date(&self, date: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE date = $1")
            .bind(date)
            .fetch_one(&self.pool)
            .await
    }
}
