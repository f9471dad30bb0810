//! # Framework Errors
//!
//! Errors raised by the fetch machinery itself. Read failures are not errors at this
//! level: they are published as [`FetchState::Error`](crate::FetchState::Error).

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("Fetch machine detached")]
    Detached,
    #[error("Fetch machine dropped response channel")]
    MachineDropped,
}
