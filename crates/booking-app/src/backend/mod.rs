//! # Development Backend
//!
//! An in-memory stand-in for the bookings REST server, used by the `serve`
//! command and by the end-to-end tests.
//!
//! Each collection lives in its own [`StoreActor`]; the axum handlers in
//! [`router`] only forward requests to a [`StoreClient`].

pub mod error;
pub mod record;
pub mod router;
pub mod seed;
pub mod store;

pub use error::{BackendError, BackendResult};
pub use record::{BookableFilter, BookingFilter, Record};
pub use router::{build_router, collection_router};
pub use seed::Seed;
pub use store::{StoreActor, StoreClient, StoreError, StoreRequest};
