use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::db::booking::BookingRepository;
use crate::db::room::{RoomInput, RoomRepository};
use crate::error::AppError;
use crate::models::Room;
use crate::schedule::availability::{self, SlotAvailability};
use crate::schedule::slot;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RoomPayload {
    pub name: String,
    pub capacity: i32,
    pub hourly_rate: f64,
    pub facilities: Vec<String>,
    pub available_time_slots: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
}

impl RoomPayload {
    fn validate(&self) -> Result<RoomInput, AppError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("room name must not be empty"));
        }
        if self.capacity <= 0 {
            return Err(AppError::validation("capacity must be a positive integer"));
        }
        if self.hourly_rate < 0.0 || !self.hourly_rate.is_finite() {
            return Err(AppError::validation("hourly rate must be non-negative"));
        }
        if self.facilities.is_empty() {
            return Err(AppError::validation("at least one facility is required"));
        }
        if self.available_time_slots.is_empty() {
            return Err(AppError::validation("at least one time slot is required"));
        }
        for label in &self.available_time_slots {
            slot::validate_slot_label(label)?;
        }

        Ok(RoomInput {
            name: name.to_string(),
            capacity: self.capacity,
            hourly_rate: self.hourly_rate,
            facilities: self.facilities.clone(),
            available_time_slots: self.available_time_slots.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
        })
    }
}

pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Json<Vec<Room>>, AppError> {
    let rooms = RoomRepository::new(state.db_pool.clone()).list().await?;
    Ok(Json(rooms))
}

pub async fn get_room(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Room>, AppError> {
    let room = RoomRepository::new(state.db_pool.clone())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("room not found"))?;
    Ok(Json(room))
}

pub async fn create_room(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<RoomPayload>,
) -> Result<Json<Room>, AppError> {
    user.require_admin()?;
    let input = payload.validate()?;

    let room = RoomRepository::new(state.db_pool.clone())
        .create(&input)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "a room with this name already exists"))?;

    tracing::info!("Room '{}' created by {}", room.name, user.email);
    Ok(Json(room))
}

/// Replace a room's definition. Removing a slot label that a live booking
/// holds is allowed: the booking stays in listings and keeps the slot key
/// held, but the slot no longer appears in the availability projection, which
/// iterates the room's current list. Admins resolve such bookings manually.
pub async fn update_room(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<RoomPayload>,
) -> Result<Json<Room>, AppError> {
    user.require_admin()?;
    let input = payload.validate()?;

    let room = RoomRepository::new(state.db_pool.clone())
        .update(id, &input)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "a room with this name already exists"))?
        .ok_or_else(|| AppError::not_found("room not found"))?;
    Ok(Json(room))
}

pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    user.require_admin()?;

    let room_repo = RoomRepository::new(state.db_pool.clone());
    if room_repo.get_by_id(id).await?.is_none() {
        return Err(AppError::not_found("room not found"));
    }

    // Any booking, past or rejected, still pins the room for record keeping.
    let references = BookingRepository::new(state.db_pool.clone())
        .count_for_room(id)
        .await?;
    if references > 0 {
        return Err(AppError::Conflict(
            "room still has bookings and cannot be deleted".to_string(),
        ));
    }

    // A booking created after the count lands on the room_id foreign key.
    room_repo.delete(id).await.map_err(|e| {
        AppError::conflict_on_fk(e, "room still has bookings and cannot be deleted")
    })?;
    tracing::info!("Room {} deleted by {}", id, user.email);
    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(Debug, Serialize)]
pub struct TodayRoom {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub capacity: i32,
    pub slots: Vec<SlotAvailability>,
}

#[derive(Debug, Serialize)]
pub struct TodayResponse {
    pub date: String,
    pub rooms: Vec<TodayRoom>,
}

/// Dashboard projection: every room's availability for today, in one call.
pub async fn today(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<TodayResponse>, AppError> {
    let date = chrono::Utc::now().format("%Y-%m-%d").to_string();

    let rooms = RoomRepository::new(state.db_pool.clone()).list().await?;
    let bookings = BookingRepository::new(state.db_pool.clone())
        .list_for_date(&date)
        .await?;

    let rooms = rooms
        .into_iter()
        .map(|room| {
            let for_room: Vec<_> = bookings
                .iter()
                .filter(|b| b.room_id == room.id)
                .cloned()
                .collect();
            let slots = availability::project(&room, &for_room, &user.id, user.role);
            TodayRoom {
                id: room.id,
                name: room.name,
                location: room.location,
                capacity: room.capacity,
                slots,
            }
        })
        .collect();

    Ok(Json(TodayResponse { date, rooms }))
}
