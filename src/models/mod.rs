// Models module - Domain entity representations

pub mod event;
pub mod location;
pub mod reservation;

pub use event::Event;
pub use location::{ReferenceCity, UserLocation};
pub use reservation::{CreateReservationData, Reservation, ReservationStats, ReservationStatus};
