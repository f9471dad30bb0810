//! Small UI helpers shared by the pages: error containment and pending actions.

pub mod boundary;
pub mod pending;

pub use boundary::ErrorBoundary;
pub use pending::{Finished, PendingAction, PendingError, DEFAULT_TIMEOUT};
