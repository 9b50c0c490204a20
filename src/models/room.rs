use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub capacity: i32,
    pub hourly_rate: f64,
    pub facilities: Vec<String>,
    pub available_time_slots: Vec<String>,
    pub description: String,
    pub location: String,
    pub created_at: i64,
    pub updated_at: i64,
}
