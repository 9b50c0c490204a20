use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::db::booking::{BookingRepository, NewBooking};
use crate::db::room::RoomRepository;
use crate::error::AppError;
use crate::models::Booking;
use crate::schedule::availability::{self, SlotAvailability};
use crate::schedule::slot;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct Booker {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub room_id: i64,
    pub date: String,
    pub time_slot: String,
    pub booked_by: Booker,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

fn required_date(query: &DateQuery) -> Result<&str, AppError> {
    let date = query
        .date
        .as_deref()
        .ok_or_else(|| AppError::validation("date query parameter is required"))?;
    slot::validate_date(date)?;
    Ok(date)
}

/// Create a PENDING booking for a free slot. The pre-check answers the common
/// case with a clean Conflict; the partial unique index settles the race when
/// two creates for the same slot arrive together.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<Booking>, AppError> {
    slot::validate_date(&request.date)?;
    slot::validate_slot_label(&request.time_slot)?;
    slot::validate_email(&request.booked_by.email)?;
    if request.booked_by.name.trim().is_empty() {
        return Err(AppError::validation("booker name must not be empty"));
    }

    let room = RoomRepository::new(state.db_pool.clone())
        .get_by_id(request.room_id)
        .await?
        .ok_or_else(|| AppError::not_found("room not found"))?;

    slot::check_slot_membership(&room.available_time_slots, &request.time_slot)?;

    let booking_repo = BookingRepository::new(state.db_pool.clone());
    if booking_repo
        .slot_taken(room.id, &request.date, &request.time_slot)
        .await?
    {
        return Err(AppError::Conflict("slot already booked".to_string()));
    }

    let booking = booking_repo
        .create(&NewBooking {
            room_id: room.id,
            room_name: room.name.clone(),
            user_id: user.id.clone(),
            user_name: request.booked_by.name.trim().to_string(),
            user_email: request.booked_by.email.clone(),
            date: request.date.clone(),
            time_slot: request.time_slot.clone(),
        })
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "slot already booked"))?;

    tracing::info!(
        "Booking {} created: room '{}' on {} at {}",
        booking.id,
        booking.room_name,
        booking.date,
        booking.time_slot
    );
    Ok(Json(booking))
}

/// All bookings for a room on a given day, time-slot ascending.
pub async fn list_room_bookings(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(room_id): Path<i64>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let date = required_date(&query)?;

    RoomRepository::new(state.db_pool.clone())
        .get_by_id(room_id)
        .await?
        .ok_or_else(|| AppError::not_found("room not found"))?;

    let bookings = BookingRepository::new(state.db_pool.clone())
        .list_for_room_date(room_id, date)
        .await?;
    Ok(Json(bookings))
}

/// Availability View: the room's slots projected against the day's ledger.
pub async fn room_availability(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(room_id): Path<i64>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<SlotAvailability>>, AppError> {
    let date = required_date(&query)?;

    let room = RoomRepository::new(state.db_pool.clone())
        .get_by_id(room_id)
        .await?
        .ok_or_else(|| AppError::not_found("room not found"))?;

    let bookings = BookingRepository::new(state.db_pool.clone())
        .list_for_room_date(room_id, date)
        .await?;

    Ok(Json(availability::project(
        &room, &bookings, &user.id, user.role,
    )))
}

pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = BookingRepository::new(state.db_pool.clone())
        .list_for_user(&user.id)
        .await?;
    Ok(Json(bookings))
}

/// Cancel a booking. Owners may remove their own; admins may remove any.
/// The slot becomes bookable again as soon as the row is gone.
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let booking_repo = BookingRepository::new(state.db_pool.clone());
    let booking = booking_repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("booking not found"))?;

    if booking.user_id != user.id && !user.is_admin() {
        return Err(AppError::permission_denied(
            "only the booking owner or an admin may cancel it",
        ));
    }

    booking_repo.delete(id).await?;
    tracing::info!("Booking {} cancelled by {}", id, user.email);
    Ok(Json(serde_json::json!({ "success": true })))
}
