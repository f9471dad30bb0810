//! Week arithmetic and the per-bookable bookings grid.

pub mod grid;
pub mod week;

pub use grid::{Cell, Grid};
pub use week::{short_iso, Week};
