//! # Fetch State
//!
//! The observable lifecycle of a single read: `Idle → Loading → Success | Error`.
//!
//! [`FetchState`] is a sum type, so a state can never carry both a payload and a
//! failure. [`FetchSnapshot`] is what observers actually see: the state plus the
//! resource it belongs to and the attempt generation that produced it.

use std::fmt;
use std::sync::Arc;

/// The lifecycle phase of a fetch, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error,
}

impl FetchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchStatus::Idle => "idle",
            FetchStatus::Loading => "loading",
            FetchStatus::Success => "success",
            FetchStatus::Error => "error",
        }
    }

    /// Returns `true` if the machine may move from `self` to `next`.
    ///
    /// # Transition Table
    ///
    /// | from \ to | Idle | Loading | Success | Error |
    /// |-----------|------|---------|---------|-------|
    /// | Idle      |      | yes     |         |       |
    /// | Loading   |      | yes     | yes     | yes   |
    /// | Success   |      | yes     |         |       |
    /// | Error     |      | yes     |         |       |
    ///
    /// `Loading → Loading` happens when the resource changes before the read settles.
    /// Nothing ever returns to `Idle`.
    pub fn can_advance_to(&self, next: FetchStatus) -> bool {
        match (self, next) {
            (_, FetchStatus::Loading) => true,
            (FetchStatus::Loading, FetchStatus::Success | FetchStatus::Error) => true,
            _ => false,
        }
    }

    /// `Success` and `Error` are terminal for an attempt.
    pub fn is_settled(&self) -> bool {
        matches!(self, FetchStatus::Success | FetchStatus::Error)
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The state of one fetch attempt.
///
/// The failure is held behind an [`Arc`] because most transport errors are not
/// `Clone`, while snapshots are cloned out to every observer.
#[derive(Debug)]
pub enum FetchState<T, E> {
    Idle,
    Loading,
    Success(T),
    Error(Arc<E>),
}

impl<T, E> FetchState<T, E> {
    pub fn status(&self) -> FetchStatus {
        match self {
            FetchState::Idle => FetchStatus::Idle,
            FetchState::Loading => FetchStatus::Loading,
            FetchState::Success(_) => FetchStatus::Success,
            FetchState::Error(_) => FetchStatus::Error,
        }
    }

    /// The payload, present only on `Success`.
    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Success(data) => Some(data),
            _ => None,
        }
    }

    /// The failure, present only on `Error`.
    pub fn error(&self) -> Option<&E> {
        match self {
            FetchState::Error(error) => Some(error.as_ref()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn is_settled(&self) -> bool {
        self.status().is_settled()
    }

    /// Converts a read outcome into the matching settled state.
    pub fn from_outcome(outcome: Result<T, E>) -> Self {
        match outcome {
            Ok(data) => FetchState::Success(data),
            Err(error) => FetchState::Error(Arc::new(error)),
        }
    }
}

impl<T: Clone, E> Clone for FetchState<T, E> {
    fn clone(&self) -> Self {
        match self {
            FetchState::Idle => FetchState::Idle,
            FetchState::Loading => FetchState::Loading,
            FetchState::Success(data) => FetchState::Success(data.clone()),
            FetchState::Error(error) => FetchState::Error(Arc::clone(error)),
        }
    }
}

impl<T: PartialEq, E: PartialEq> PartialEq for FetchState<T, E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FetchState::Idle, FetchState::Idle) => true,
            (FetchState::Loading, FetchState::Loading) => true,
            (FetchState::Success(a), FetchState::Success(b)) => a == b,
            (FetchState::Error(a), FetchState::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl<T, E> Default for FetchState<T, E> {
    fn default() -> Self {
        FetchState::Idle
    }
}

/// What an observer sees: the state, the resource it describes, and the attempt
/// generation that produced it.
///
/// `generation` is `0` until the first observation and increases by one for
/// every new attempt.
#[derive(Debug)]
pub struct FetchSnapshot<R, T, E> {
    pub resource: Option<R>,
    pub generation: u64,
    pub state: FetchState<T, E>,
}

impl<R, T, E> FetchSnapshot<R, T, E> {
    pub fn idle() -> Self {
        Self {
            resource: None,
            generation: 0,
            state: FetchState::Idle,
        }
    }

    pub fn status(&self) -> FetchStatus {
        self.state.status()
    }
}

impl<R: Clone, T: Clone, E> Clone for FetchSnapshot<R, T, E> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
            generation: self.generation,
            state: self.state.clone(),
        }
    }
}
