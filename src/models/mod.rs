mod booking;
mod room;
mod user;

pub use booking::{Booking, BookingStatus};
pub use room::Room;
pub use user::{Role, User};
