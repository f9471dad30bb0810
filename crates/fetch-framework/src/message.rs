//! # Messages
//!
//! Requests sent from a [`FetchClient`](crate::FetchClient) to its
//! [`FetchMachine`](crate::FetchMachine), and settlements sent back by read tasks.

use crate::error::FetchError;
use crate::reader::Reader;
use tokio::sync::oneshot;

pub type Response<T> = oneshot::Sender<Result<T, FetchError>>;

#[derive(Debug)]
pub enum FetchRequest<R: Reader> {
    /// Start observing `resource`. Responds `true` if a new read was started.
    Observe {
        resource: R::Resource,
        respond_to: Response<bool>,
    },
    /// Stop observing. The machine exits after responding.
    Detach { respond_to: Response<()> },
}

/// The outcome of one read attempt, tagged with the generation that started it.
#[derive(Debug)]
pub struct Settlement<R: Reader> {
    pub generation: u64,
    pub outcome: Result<R::Output, R::Error>,
}
