//! # Mock Readers & Testing Guide
//!
//! Testing a fetch machine against a real network is slow and, worse, gives you no
//! control over *when* a read settles. The mocks here implement [`Reader`] entirely
//! in memory so tests can script outcomes and decide the order in which reads finish.
//!
//! ## When to use which
//!
//! | Mock | Matching | Settles | Use Case |
//! |------|----------|---------|----------|
//! | [`MockReader`] | by resource, scripted up front | immediately or when a [`Responder`] fires | most tests |
//! | [`ChannelReader`] | none, every read is forwarded | when the test answers the [`PendingRead`] | inspecting reads as they happen |
//!
//! ## Pattern 1: Scripted outcomes
//!
//! ```rust
//! use fetch_framework::mock::{MockError, MockReader};
//! use fetch_framework::{FetchMachine, FetchState};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockReader::<String, u32, MockError>::new();
//!     mock.expect_read("R1".to_string()).return_ok(7);
//!
//!     let client = FetchMachine::spawn(mock.clone());
//!     client.observe("R1".to_string()).await.unwrap();
//!     assert_eq!(client.settled().await.unwrap(), FetchState::Success(7));
//!     mock.verify();
//! }
//! ```
//!
//! ## Pattern 2: Controlling settlement order
//!
//! [`ReadExpectationBuilder::defer`] hands back a [`Responder`]. The read stays
//! outstanding until the test calls [`Responder::succeed`] or [`Responder::fail`],
//! which makes "the first read settles after the second one started" trivial to set up.
//!
//! ```rust
//! use fetch_framework::mock::{MockError, MockReader};
//! use fetch_framework::{FetchMachine, FetchState};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockReader::<String, u32, MockError>::new();
//!     let slow = mock.expect_read("R1".to_string()).defer();
//!     mock.expect_read("R2".to_string()).return_ok(2);
//!
//!     let client = FetchMachine::spawn(mock.clone());
//!     client.observe("R1".to_string()).await.unwrap();
//!     client.observe("R2".to_string()).await.unwrap();
//!     assert_eq!(client.settled().await.unwrap(), FetchState::Success(2));
//!
//!     // Too late: R1 was superseded.
//!     slow.succeed(1);
//! }
//! ```

use crate::reader::Reader;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::fmt::{Debug, Display};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot, Notify};

/// A plain string failure for tests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct MockError(pub String);

impl From<&str> for MockError {
    fn from(msg: &str) -> Self {
        MockError(msg.to_string())
    }
}

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Outcome<Out, Err> {
    Ready(Result<Out, Err>),
    Deferred {
        receiver: oneshot::Receiver<Result<Out, Err>>,
        started: Arc<Notify>,
    },
}

struct Expectation<Res, Out, Err> {
    resource: Res,
    outcome: Outcome<Out, Err>,
}

type Expectations<Res, Out, Err> = Arc<Mutex<VecDeque<Expectation<Res, Out, Err>>>>;

/// A reader with expectation tracking.
///
/// Cloning is cheap and clones share expectations, so hand one clone to the
/// machine and keep another for `verify()`.
///
/// Reads are matched to the oldest unmet expectation for the same resource.
/// A read with no matching expectation panics.
pub struct MockReader<Res, Out, Err> {
    expectations: Expectations<Res, Out, Err>,
    calls: Arc<Mutex<Vec<Res>>>,
}

impl<Res, Out, Err> Clone for MockReader<Res, Out, Err> {
    fn clone(&self) -> Self {
        Self {
            expectations: Arc::clone(&self.expectations),
            calls: Arc::clone(&self.calls),
        }
    }
}

impl<Res, Out, Err> Default for MockReader<Res, Out, Err> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Res, Out, Err> MockReader<Res, Out, Err> {
    /// Creates a new mock reader with no expectations.
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Expects a read of `resource`.
    pub fn expect_read(&mut self, resource: Res) -> ReadExpectationBuilder<Res, Out, Err> {
        ReadExpectationBuilder {
            resource,
            expectations: Arc::clone(&self.expectations),
        }
    }

    /// Number of reads performed so far.
    pub fn read_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

impl<Res: Clone, Out, Err> MockReader<Res, Out, Err> {
    /// The resources read so far, in call order.
    pub fn calls(&self) -> Vec<Res> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl<Res, Out, Err> Reader for MockReader<Res, Out, Err>
where
    Res: Clone + PartialEq + Send + Sync + Debug + Display + 'static,
    Out: Clone + Send + Sync + Debug + 'static,
    Err: std::error::Error + Send + Sync + 'static,
{
    type Resource = Res;
    type Output = Out;
    type Error = Err;

    async fn read(&self, resource: &Res) -> Result<Out, Err> {
        let expectation = {
            self.calls.lock().unwrap().push(resource.clone());
            let mut exps = self.expectations.lock().unwrap();
            match exps.iter().position(|e| &e.resource == resource) {
                Some(index) => exps.remove(index),
                None => None,
            }
        };

        let Some(expectation) = expectation else {
            panic!("Unexpected read of {resource}");
        };

        match expectation.outcome {
            Outcome::Ready(result) => result,
            Outcome::Deferred { receiver, started } => {
                started.notify_one();
                match receiver.await {
                    Ok(result) => result,
                    // Responder dropped: the read never completes.
                    Err(_) => std::future::pending().await,
                }
            }
        }
    }
}

/// Builder for read expectations.
pub struct ReadExpectationBuilder<Res, Out, Err> {
    resource: Res,
    expectations: Expectations<Res, Out, Err>,
}

impl<Res, Out, Err> ReadExpectationBuilder<Res, Out, Err> {
    /// The read succeeds immediately with `value`.
    pub fn return_ok(self, value: Out) {
        self.push(Outcome::Ready(Ok(value)));
    }

    /// The read fails immediately with `error`.
    pub fn return_err(self, error: Err) {
        self.push(Outcome::Ready(Err(error)));
    }

    /// The read stays outstanding until the returned [`Responder`] is used.
    pub fn defer(self) -> Responder<Out, Err> {
        let (sender, receiver) = oneshot::channel();
        let started = Arc::new(Notify::new());
        self.push(Outcome::Deferred {
            receiver,
            started: Arc::clone(&started),
        });
        Responder { sender, started }
    }

    fn push(self, outcome: Outcome<Out, Err>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation {
            resource: self.resource,
            outcome,
        });
    }
}

/// Settles a deferred read.
pub struct Responder<Out, Err> {
    sender: oneshot::Sender<Result<Out, Err>>,
    started: Arc<Notify>,
}

impl<Out, Err> Responder<Out, Err> {
    /// Resolves once the machine has actually started this read.
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    /// Resolves when the read side has gone away (e.g. the read task was aborted).
    pub async fn closed(mut self) {
        self.sender.closed().await;
    }

    /// Settles the read successfully. Returns `false` if nobody was waiting any more.
    pub fn succeed(self, value: Out) -> bool {
        self.sender.send(Ok(value)).is_ok()
    }

    /// Settles the read with a failure. Returns `false` if nobody was waiting any more.
    pub fn fail(self, error: Err) -> bool {
        self.sender.send(Err(error)).is_ok()
    }
}

// =============================================================================
// CHANNEL READER
// =============================================================================

/// A read forwarded to the test by a [`ChannelReader`].
pub struct PendingRead<Res, Out, Err> {
    pub resource: Res,
    pub respond_to: oneshot::Sender<Result<Out, Err>>,
}

/// A reader that forwards every read to a channel the test controls.
///
/// # Testing Strategy
/// Instead of scripting outcomes up front, the test receives each read as a
/// [`PendingRead`] and answers it whenever it likes. Useful for asserting exactly
/// which reads the machine issued and in what order.
pub struct ChannelReader<Res, Out, Err> {
    sender: mpsc::Sender<PendingRead<Res, Out, Err>>,
}

/// Creates a channel reader and the receiver on which its reads arrive.
pub fn create_channel_reader<Res, Out, Err>(
    buffer_size: usize,
) -> (
    ChannelReader<Res, Out, Err>,
    mpsc::Receiver<PendingRead<Res, Out, Err>>,
) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ChannelReader { sender }, receiver)
}

/// Helper to wait for the next forwarded read.
pub async fn expect_read<Res, Out, Err>(
    receiver: &mut mpsc::Receiver<PendingRead<Res, Out, Err>>,
) -> Option<PendingRead<Res, Out, Err>> {
    receiver.recv().await
}

#[async_trait]
impl<Res, Out, Err> Reader for ChannelReader<Res, Out, Err>
where
    Res: Clone + PartialEq + Send + Sync + Debug + Display + 'static,
    Out: Clone + Send + Sync + Debug + 'static,
    Err: std::error::Error + Send + Sync + 'static,
{
    type Resource = Res;
    type Output = Out;
    type Error = Err;

    async fn read(&self, resource: &Res) -> Result<Out, Err> {
        let (respond_to, response) = oneshot::channel();
        let pending = PendingRead {
            resource: resource.clone(),
            respond_to,
        };
        if self.sender.send(pending).await.is_err() {
            return std::future::pending().await;
        }
        match response.await {
            Ok(result) => result,
            Err(_) => std::future::pending().await,
        }
    }
}
