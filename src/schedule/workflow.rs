use std::collections::HashSet;

use crate::error::AppError;
use crate::models::{Booking, BookingStatus};

pub const NOTE_AUTO_APPROVED: &str = "auto-approved, no conflict";
pub const NOTE_AUTO_REJECTED: &str = "slot already taken by another approval";

/// Check that a manual status change is legal. Only PENDING bookings may move,
/// and only to a terminal state.
pub fn check_transition(current: BookingStatus, target: BookingStatus) -> Result<(), AppError> {
    if target == BookingStatus::Pending {
        return Err(AppError::validation(
            "a booking cannot be moved back to PENDING",
        ));
    }
    if current != BookingStatus::Pending {
        return Err(AppError::InvalidTransition(format!(
            "booking is already {:?}, only PENDING bookings can be updated",
            current
        )));
    }
    Ok(())
}

/// One status change the auto-resolution pass wants applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub booking_id: i64,
    pub status: BookingStatus,
    pub note: &'static str,
}

/// Resolve every PENDING booking in the snapshot: reject it if an APPROVED
/// booking already holds the same (room, date, slot), otherwise approve it.
/// When several PENDINGs contend for one free slot, the first in snapshot
/// order wins and the rest are rejected, so callers must pass bookings in a
/// deterministic order (ascending creation time, then id).
///
/// The pass is idempotent: it only ever touches PENDING rows, and after one
/// run no PENDING rows remain among those it saw.
pub fn resolve_pending(bookings: &[Booking]) -> Vec<Resolution> {
    let mut approved: HashSet<(i64, &str, &str)> = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Approved)
        .map(|b| (b.room_id, b.date.as_str(), b.time_slot.as_str()))
        .collect();

    let mut resolutions = Vec::new();
    for booking in bookings {
        if booking.status != BookingStatus::Pending {
            continue;
        }
        let key = (booking.room_id, booking.date.as_str(), booking.time_slot.as_str());
        if approved.contains(&key) {
            resolutions.push(Resolution {
                booking_id: booking.id,
                status: BookingStatus::Rejected,
                note: NOTE_AUTO_REJECTED,
            });
        } else {
            approved.insert(key);
            resolutions.push(Resolution {
                booking_id: booking.id,
                status: BookingStatus::Approved,
                note: NOTE_AUTO_APPROVED,
            });
        }
    }
    resolutions
}
