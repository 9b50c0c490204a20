use serde::Serialize;

use crate::models::{Booking, BookingStatus, Role, Room};
use crate::schedule::slot;

/// Per-slot state as rendered to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SlotState {
    Free,
    Pending,
    Booked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookerInfo {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotAvailability {
    pub time_slot: String,
    /// Display grouping only (dawn/morning/afternoon/evening); no ledger
    /// meaning.
    pub band: &'static str,
    pub status: SlotState,
    /// Present only when the viewer is an admin or owns the booking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booked_by: Option<BookerInfo>,
}

/// Project a room's configured slots against one day's bookings, in the
/// room's stored slot order. Pure read: recomputed fresh on every call.
///
/// Rejected bookings are invisible here; their slot reads as FREE.
pub fn project(
    room: &Room,
    bookings: &[Booking],
    viewer_id: &str,
    viewer_role: Role,
) -> Vec<SlotAvailability> {
    room.available_time_slots
        .iter()
        .map(|label| {
            let band = slot::hour_band(label).label();
            let live = bookings
                .iter()
                .find(|b| b.time_slot == *label && b.status != BookingStatus::Rejected);

            match live {
                None => SlotAvailability {
                    time_slot: label.clone(),
                    band,
                    status: SlotState::Free,
                    booked_by: None,
                },
                Some(b) => {
                    let status = if b.status == BookingStatus::Approved {
                        SlotState::Booked
                    } else {
                        SlotState::Pending
                    };
                    let visible = viewer_role.is_admin() || b.user_id == viewer_id;
                    SlotAvailability {
                        time_slot: label.clone(),
                        band,
                        status,
                        booked_by: visible.then(|| BookerInfo {
                            name: b.user_name.clone(),
                            email: b.user_email.clone(),
                        }),
                    }
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(slots: &[&str]) -> Room {
        Room {
            id: 1,
            name: "A".to_string(),
            capacity: 8,
            hourly_rate: 20.0,
            facilities: vec!["projector".to_string()],
            available_time_slots: slots.iter().map(|s| s.to_string()).collect(),
            description: String::new(),
            location: "3F".to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn booking(id: i64, slot: &str, user_id: &str, status: BookingStatus) -> Booking {
        Booking {
            id,
            room_id: 1,
            room_name: "A".to_string(),
            user_id: user_id.to_string(),
            user_name: "U1 Name".to_string(),
            user_email: "u1@example.com".to_string(),
            date: "2024-06-01".to_string(),
            time_slot: slot.to_string(),
            status,
            note: String::new(),
            created_at: id,
            updated_at: id,
        }
    }

    #[test]
    fn test_approved_slot_reads_booked_rest_free() {
        let room = room(&["09:00-10:00", "10:00-11:00"]);
        let bookings = vec![booking(1, "09:00-10:00", "u1", BookingStatus::Approved)];

        let view = project(&room, &bookings, "admin", Role::Admin);
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].time_slot, "09:00-10:00");
        assert_eq!(view[0].status, SlotState::Booked);
        assert_eq!(view[1].time_slot, "10:00-11:00");
        assert_eq!(view[1].status, SlotState::Free);
        assert!(view[1].booked_by.is_none());
    }

    #[test]
    fn test_pending_slot_reads_pending() {
        let room = room(&["09:00-10:00"]);
        let bookings = vec![booking(1, "09:00-10:00", "u1", BookingStatus::Pending)];

        let view = project(&room, &bookings, "u2", Role::User);
        assert_eq!(view[0].status, SlotState::Pending);
    }

    #[test]
    fn test_rejected_slot_reads_free_again() {
        let room = room(&["09:00-10:00"]);
        let bookings = vec![booking(1, "09:00-10:00", "u1", BookingStatus::Rejected)];

        let view = project(&room, &bookings, "u1", Role::User);
        assert_eq!(view[0].status, SlotState::Free);
        assert!(view[0].booked_by.is_none());
    }

    #[test]
    fn test_booker_details_visible_to_admin_and_owner_only() {
        let room = room(&["09:00-10:00"]);
        let bookings = vec![booking(1, "09:00-10:00", "u1", BookingStatus::Approved)];

        let as_admin = project(&room, &bookings, "someone-else", Role::Admin);
        assert_eq!(
            as_admin[0].booked_by,
            Some(BookerInfo {
                name: "U1 Name".to_string(),
                email: "u1@example.com".to_string(),
            })
        );

        let as_owner = project(&room, &bookings, "u1", Role::User);
        assert!(as_owner[0].booked_by.is_some());

        let as_stranger = project(&room, &bookings, "u2", Role::User);
        assert_eq!(as_stranger[0].status, SlotState::Booked);
        assert!(as_stranger[0].booked_by.is_none());
    }

    #[test]
    fn test_slots_keep_room_order() {
        let room = room(&["14:00-15:00", "09:00-10:00", "10:00-11:00"]);
        let view = project(&room, &[], "u1", Role::User);
        let order: Vec<&str> = view.iter().map(|s| s.time_slot.as_str()).collect();
        assert_eq!(order, vec!["14:00-15:00", "09:00-10:00", "10:00-11:00"]);
        assert_eq!(view[0].band, "afternoon");
        assert_eq!(view[1].band, "morning");
    }
}
