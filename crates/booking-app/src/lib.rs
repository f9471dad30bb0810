//! # Bookings App Library
//!
//! Bookables (rooms, kit) and their bookings, read through
//! [`fetch_framework`] state machines and written through typed REST clients.
//!
//! - **[model]**: [`Bookable`](model::Bookable), [`Booking`](model::Booking) and their DTOs.
//! - **[api]**: [`HttpReader`](api::HttpReader) for fetch machines, REST clients for writes.
//! - **[backend]** / **[lifecycle]**: an in-memory json-server replacement for development and tests.
//! - **[schedule]**, **[views]**, **[routes]**, **[form]**, **[ui]**: what the pages are made of.
//! - **[config]**: TOML settings.

pub mod api;
pub mod backend;
pub mod config;
pub mod form;
pub mod lifecycle;
pub mod model;
pub mod routes;
pub mod schedule;
pub mod ui;
pub mod views;
