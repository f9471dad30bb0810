//! # Bookings API
//!
//! Everything that talks to the bookings backend over HTTP.
//!
//! - [`HttpReader`] is the [`Reader`](fetch_framework::Reader) the views fetch through.
//! - [`RestClient`] does CRUD on one collection; [`BookableClient`] and
//!   [`BookingClient`] wrap it with validation and domain errors.

pub mod bookable_client;
pub mod booking_client;
pub mod client_trait;
pub mod error;
pub mod http;
pub mod rest;

pub use bookable_client::*;
pub use booking_client::*;
pub use client_trait::*;
pub use error::*;
pub use http::{build_http_client, parse_base_url, resolve, HttpReader};
pub use rest::*;
