//! # Fetch Client
//!
//! The observer's handle on a [`FetchMachine`](crate::FetchMachine).

use crate::error::FetchError;
use crate::message::FetchRequest;
use crate::reader::{Reader, SnapshotOf, StateOf};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

/// A handle for driving a fetch machine and watching its state.
///
/// Clones share the same machine. The machine detaches when [`detach`](Self::detach)
/// is called or when the last clone is dropped.
pub struct FetchClient<R: Reader> {
    sender: mpsc::Sender<FetchRequest<R>>,
    state: watch::Receiver<SnapshotOf<R>>,
}

impl<R: Reader> Clone for FetchClient<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            state: self.state.clone(),
        }
    }
}

impl<R: Reader> FetchClient<R> {
    pub fn new(sender: mpsc::Sender<FetchRequest<R>>, state: watch::Receiver<SnapshotOf<R>>) -> Self {
        Self { sender, state }
    }

    /// Observes `resource`.
    ///
    /// Returns `true` if this started a new read, `false` if `resource` equals the
    /// one already observed (nothing changes in that case).
    pub async fn observe(&self, resource: R::Resource) -> Result<bool, FetchError> {
        debug!(%resource, "Observe");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(FetchRequest::Observe {
                resource,
                respond_to,
            })
            .await
            .map_err(|_| FetchError::Detached)?;
        response.await.map_err(|_| FetchError::MachineDropped)?
    }

    /// Stops observing. Any outstanding read is ignored when it settles.
    pub async fn detach(&self) -> Result<(), FetchError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(FetchRequest::Detach { respond_to })
            .await
            .map_err(|_| FetchError::Detached)?;
        response.await.map_err(|_| FetchError::MachineDropped)?
    }

    /// The current snapshot. After detaching this is the last published value.
    pub fn snapshot(&self) -> SnapshotOf<R> {
        self.state.borrow().clone()
    }

    /// The current state without its resource and generation.
    pub fn state(&self) -> StateOf<R> {
        self.state.borrow().state.clone()
    }

    /// A receiver that is notified on every published change.
    pub fn subscribe(&self) -> watch::Receiver<SnapshotOf<R>> {
        self.state.clone()
    }

    /// Waits until the current attempt settles and returns its state.
    ///
    /// Returns immediately if the current state is already settled. Waits forever on
    /// a machine that was never asked to observe anything, unless it detaches.
    pub async fn settled(&self) -> Result<StateOf<R>, FetchError> {
        let mut state = self.state.clone();
        let snapshot = state
            .wait_for(|snapshot| snapshot.state.is_settled())
            .await
            .map_err(|_| FetchError::Detached)?;
        Ok(snapshot.state.clone())
    }

    /// Observes `resource` and waits for the attempt to settle.
    pub async fn fetch(&self, resource: R::Resource) -> Result<StateOf<R>, FetchError> {
        self.observe(resource).await?;
        self.settled().await
    }
}
