use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::db::booking::BookingRepository;
use crate::db::room::RoomRepository;
use crate::db::user::UserRepository;
use crate::error::AppError;
use crate::models::{Booking, BookingStatus, Role, User};
use crate::schedule::workflow;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<BookingStatus>,
}

pub async fn list_all_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    user.require_admin()?;
    let bookings = BookingRepository::new(state.db_pool.clone())
        .list_all(query.status)
        .await?;
    Ok(Json(bookings))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
    pub note: Option<String>,
}

/// Manual workflow transition: approve or reject one PENDING booking.
pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Booking>, AppError> {
    user.require_admin()?;

    let booking_repo = BookingRepository::new(state.db_pool.clone());
    let booking = booking_repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("booking not found"))?;

    workflow::check_transition(booking.status, request.status)?;

    // The UPDATE is guarded on status = PENDING, so a transition racing with
    // this one loses cleanly instead of overwriting it.
    let updated = booking_repo
        .transition_from_pending(id, request.status, request.note.as_deref())
        .await?
        .ok_or_else(|| {
            AppError::InvalidTransition("booking is no longer PENDING".to_string())
        })?;

    tracing::info!(
        "Booking {} set to {:?} by {}",
        updated.id,
        updated.status,
        user.email
    );
    Ok(Json(updated))
}

#[derive(Debug, Serialize)]
pub struct AppliedResolution {
    pub booking_id: i64,
    pub status: BookingStatus,
    pub note: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub resolved: usize,
    pub resolutions: Vec<AppliedResolution>,
}

/// Auto-resolution pass over every PENDING booking; the policy lives in the
/// workflow module. Each change is applied with the same PENDING guard as a
/// manual transition, so a concurrent admin action cannot be clobbered.
pub async fn resolve_pending_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<ResolveResponse>, AppError> {
    user.require_admin()?;

    let booking_repo = BookingRepository::new(state.db_pool.clone());
    let snapshot = booking_repo.list_in_creation_order().await?;
    let resolutions = workflow::resolve_pending(&snapshot);

    let mut applied = Vec::new();
    for resolution in resolutions {
        let updated = booking_repo
            .transition_from_pending(resolution.booking_id, resolution.status, Some(resolution.note))
            .await?;
        // A row that stopped being PENDING since the snapshot is skipped.
        if updated.is_some() {
            applied.push(AppliedResolution {
                booking_id: resolution.booking_id,
                status: resolution.status,
                note: resolution.note,
            });
        }
    }

    tracing::info!(
        "Auto-resolution by {}: {} booking(s) transitioned",
        user.email,
        applied.len()
    );
    Ok(Json(ResolveResponse {
        resolved: applied.len(),
        resolutions: applied,
    }))
}

#[derive(Debug, Serialize)]
pub struct Stats {
    pub total_rooms: i64,
    pub total_users: i64,
    pub today_bookings: i64,
    pub pending_bookings: i64,
    pub approved_bookings: i64,
    pub rejected_bookings: i64,
    pub total_bookings: i64,
}

pub async fn stats(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Stats>, AppError> {
    user.require_admin()?;

    let room_repo = RoomRepository::new(state.db_pool.clone());
    let user_repo = UserRepository::new(state.db_pool.clone());
    let booking_repo = BookingRepository::new(state.db_pool.clone());
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();

    let stats = Stats {
        total_rooms: room_repo.count().await?,
        total_users: user_repo.count().await?,
        today_bookings: booking_repo.count_for_date(&today).await?,
        pending_bookings: booking_repo.count_by_status(BookingStatus::Pending).await?,
        approved_bookings: booking_repo.count_by_status(BookingStatus::Approved).await?,
        rejected_bookings: booking_repo.count_by_status(BookingStatus::Rejected).await?,
        total_bookings: booking_repo.count_all().await?,
    };
    Ok(Json(stats))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<User>>, AppError> {
    user.require_admin()?;
    let users = UserRepository::new(state.db_pool.clone()).list().await?;
    Ok(Json(users))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

pub async fn update_user_role(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<User>, AppError> {
    user.require_admin()?;
    if id == user.id {
        return Err(AppError::permission_denied("you cannot change your own role"));
    }

    let updated = UserRepository::new(state.db_pool.clone())
        .set_role(&id, request.role)
        .await?
        .ok_or_else(|| AppError::not_found("user not found"))?;

    tracing::info!(
        "User {} role set to {:?} by {}",
        updated.id,
        updated.role,
        user.email
    );
    Ok(Json(updated))
}
