//! Pure data structures shared by the REST clients, the views and the development backend.

pub mod bookable;
pub mod booking;

pub use bookable::*;
pub use booking::*;

/// Session names, indexed by the numbers stored in [`Bookable::sessions`].
pub const SESSIONS: [&str; 5] = ["Breakfast", "Morning", "Lunch", "Afternoon", "Evening"];

/// Day names, indexed by the numbers stored in [`Bookable::days`] (0 = Sunday).
pub const DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];
