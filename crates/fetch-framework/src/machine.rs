//! # Fetch Machine
//!
//! This module defines the `FetchMachine`, the actor that owns one observer's
//! [`FetchState`] and drives it through its lifecycle. It is the "Server" half of
//! the pair; [`FetchClient`] is the handle the observer holds.
//!
//! ## Stale Results
//!
//! Every attempt is tagged with a generation number. Observing a new resource (or
//! detaching) bumps the generation, and a read task's settlement is applied only if
//! its generation is still the current one. Superseded results are dropped on the
//! floor without touching the published state.

use crate::client::FetchClient;
use crate::message::{FetchRequest, Settlement};
use crate::reader::{Reader, SnapshotOf};
use crate::state::{FetchSnapshot, FetchState};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Tuning knobs for a [`FetchMachine`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Capacity of the request channel between client and machine.
    pub buffer_size: usize,
    /// Abort the read task of a superseded attempt instead of only ignoring its
    /// result. Off by default: the generation gate alone is enough for correctness.
    pub abort_superseded: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            buffer_size: 32,
            abort_superseded: false,
        }
    }
}

/// The actor that runs the fetch lifecycle for a single observer.
///
/// **Concurrency Model**:
/// Requests from the client and settlements from read tasks arrive on two channels
/// and are handled one at a time inside [`run`](Self::run). Read tasks never touch
/// the state directly; they only report back. That single loop is the only writer
/// of the published snapshot, so no lock is needed around it.
pub struct FetchMachine<R: Reader> {
    reader: Arc<R>,
    receiver: mpsc::Receiver<FetchRequest<R>>,
    settle_tx: mpsc::UnboundedSender<Settlement<R>>,
    settle_rx: mpsc::UnboundedReceiver<Settlement<R>>,
    publisher: watch::Sender<SnapshotOf<R>>,
    current: Option<R::Resource>,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    abort_superseded: bool,
}

impl<R: Reader> FetchMachine<R> {
    /// Creates a machine with default options and its client.
    ///
    /// The machine does nothing until [`run`](Self::run) is spawned.
    pub fn new(reader: R) -> (Self, FetchClient<R>) {
        Self::with_options(reader, FetchOptions::default())
    }

    pub fn with_options(reader: R, options: FetchOptions) -> (Self, FetchClient<R>) {
        let (sender, receiver) = mpsc::channel(options.buffer_size);
        let (settle_tx, settle_rx) = mpsc::unbounded_channel();
        let (publisher, state) = watch::channel(FetchSnapshot::idle());
        let machine = Self {
            reader: Arc::new(reader),
            receiver,
            settle_tx,
            settle_rx,
            publisher,
            current: None,
            generation: 0,
            in_flight: None,
            abort_superseded: options.abort_superseded,
        };
        (machine, FetchClient::new(sender, state))
    }

    /// Creates a machine, spawns it on the current runtime and returns the client.
    pub fn spawn(reader: R) -> FetchClient<R> {
        let (machine, client) = Self::new(reader);
        tokio::spawn(machine.run());
        client
    }

    /// Runs the machine until the observer detaches.
    ///
    /// Detaching happens on an explicit [`FetchClient::detach`] or when every
    /// client clone has been dropped. On exit the publisher is dropped with the
    /// machine, so nothing can mutate the state afterwards.
    pub async fn run(mut self) {
        let reader = short_type_name::<R>();
        info!(reader, "Fetch machine started");

        loop {
            tokio::select! {
                biased;
                request = self.receiver.recv() => match request {
                    Some(FetchRequest::Observe { resource, respond_to }) => {
                        let started = self.observe(resource);
                        let _ = respond_to.send(Ok(started));
                    }
                    Some(FetchRequest::Detach { respond_to }) => {
                        self.detach();
                        let _ = respond_to.send(Ok(()));
                        break;
                    }
                    None => {
                        debug!(reader, "All clients dropped");
                        self.detach();
                        break;
                    }
                },
                Some(settlement) = self.settle_rx.recv() => self.settle(settlement),
            }
        }

        info!(reader, generation = self.generation, "Fetch machine detached");
    }

    fn observe(&mut self, resource: R::Resource) -> bool {
        if self.current.as_ref() == Some(&resource) {
            debug!(%resource, generation = self.generation, "Resource unchanged");
            return false;
        }

        self.supersede();
        self.current = Some(resource.clone());

        // Publish Loading before the read exists, so no settlement can precede it.
        self.publisher.send_replace(FetchSnapshot {
            resource: Some(resource.clone()),
            generation: self.generation,
            state: FetchState::Loading,
        });
        debug!(%resource, generation = self.generation, "Loading");

        let reader = Arc::clone(&self.reader);
        let settle_tx = self.settle_tx.clone();
        let generation = self.generation;
        self.in_flight = Some(tokio::spawn(async move {
            let outcome = reader.read(&resource).await;
            let _ = settle_tx.send(Settlement {
                generation,
                outcome,
            });
        }));
        true
    }

    fn settle(&mut self, settlement: Settlement<R>) {
        if settlement.generation != self.generation {
            debug!(
                attempt = settlement.generation,
                current = self.generation,
                "Discarding superseded result"
            );
            return;
        }
        self.in_flight = None;

        let state = FetchState::from_outcome(settlement.outcome);
        match &state {
            FetchState::Error(e) => warn!(generation = self.generation, error = %e, "Read failed"),
            _ => info!(generation = self.generation, "Read succeeded"),
        }
        self.publisher.send_modify(|snapshot| snapshot.state = state);
    }

    fn detach(&mut self) {
        self.supersede();
    }

    /// Makes the in-flight attempt, if any, non-current.
    fn supersede(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.in_flight.take() {
            if self.abort_superseded {
                debug!("Aborting superseded read");
                handle.abort();
            }
        }
    }
}

/// `my_crate::api::HttpReader<Vec<Thing>>` -> `HttpReader`
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockError, MockReader};
    use crate::state::FetchStatus;

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<String>(), "String");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
        assert_eq!(
            short_type_name::<MockReader<String, u32, MockError>>(),
            "MockReader"
        );
    }

    #[tokio::test]
    async fn test_machine_publishes_loading_then_success() {
        let mut mock = MockReader::<String, u32, MockError>::new();
        mock.expect_read("R1".to_string()).return_ok(42);

        let (machine, client) = FetchMachine::new(mock.clone());
        assert_eq!(client.snapshot().status(), FetchStatus::Idle);
        tokio::spawn(machine.run());

        assert!(client.observe("R1".to_string()).await.unwrap());
        let state = client.settled().await.unwrap();
        assert_eq!(state, FetchState::Success(42));

        let snapshot = client.snapshot();
        assert_eq!(snapshot.resource.as_deref(), Some("R1"));
        assert_eq!(snapshot.generation, 1);
        mock.verify();
    }

    #[tokio::test]
    async fn test_same_resource_is_not_read_twice() {
        let mut mock = MockReader::<String, u32, MockError>::new();
        mock.expect_read("R1".to_string()).return_ok(1);

        let client = FetchMachine::spawn(mock.clone());
        assert!(client.observe("R1".to_string()).await.unwrap());
        client.settled().await.unwrap();

        assert!(!client.observe("R1".to_string()).await.unwrap());
        assert_eq!(client.snapshot().status(), FetchStatus::Success);
        assert_eq!(mock.read_count(), 1);
    }

    #[tokio::test]
    async fn test_abort_superseded_cancels_the_read_task() {
        let mut mock = MockReader::<String, u32, MockError>::new();
        let first = mock.expect_read("R1".to_string()).defer();
        mock.expect_read("R2".to_string()).return_ok(2);

        let options = FetchOptions {
            abort_superseded: true,
            ..FetchOptions::default()
        };
        let (machine, client) = FetchMachine::with_options(mock.clone(), options);
        tokio::spawn(machine.run());

        client.observe("R1".to_string()).await.unwrap();
        first.wait_started().await;
        client.observe("R2".to_string()).await.unwrap();
        assert_eq!(client.settled().await.unwrap(), FetchState::Success(2));

        // The aborted read dropped its end of the responder.
        first.closed().await;
    }
}
