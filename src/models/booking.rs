use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle of a booking. PENDING is the only initial state; APPROVED and
/// REJECTED are terminal. A rejected booking frees its slot for new requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub room_id: i64,
    /// Room name captured at creation so the display stays stable even if the
    /// room is renamed later.
    pub room_name: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub date: String,
    pub time_slot: String,
    pub status: BookingStatus,
    pub note: String,
    pub created_at: i64,
    pub updated_at: i64,
}
