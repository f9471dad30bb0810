//! # Fetch Framework
//!
//! This crate provides an explicit, testable state machine for asynchronous reads.
//! Give it a resource locator and it reads the resource, publishing an observable
//! lifecycle:
//!
//! ```text
//! Idle ──observe(r)──▶ Loading ──ok──▶ Success(data)
//!                         │    └─err──▶ Error(reason)
//!                         └──observe(r')──▶ Loading (r superseded)
//! ```
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into three layers:
//!
//! 1. **Read Layer** ([`Reader`]) - How a resource is actually fetched (HTTP, mock, ...)
//! 2. **Runtime Layer** ([`FetchMachine`]) - Lifecycle, ordering and stale-result suppression
//! 3. **Interface Layer** ([`FetchClient`]) - What the observer holds: `observe`, `detach`, snapshots
//!
//! ## Stale Results
//!
//! A read may still be in flight when the observer moves on to another resource or
//! detaches altogether. Each attempt carries a generation number; a settlement is only
//! applied while its generation is current. Once the machine detaches it drops its
//! publisher, so late results cannot reach the observer at all.
//!
//! ```rust
//! use fetch_framework::mock::{MockError, MockReader};
//! use fetch_framework::{FetchMachine, FetchStatus};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockReader::<String, Vec<u32>, MockError>::new();
//!     mock.expect_read("/bookables".to_string()).return_ok(vec![1, 2, 3]);
//!
//!     let (machine, client) = FetchMachine::new(mock);
//!     tokio::spawn(machine.run());
//!
//!     client.observe("/bookables".to_string()).await.unwrap();
//!     let state = client.settled().await.unwrap();
//!     assert_eq!(state.status(), FetchStatus::Success);
//!     assert_eq!(state.data(), Some(&vec![1, 2, 3]));
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each machine runs in its own Tokio task and owns its state exclusively
//! - Reads run in separate tasks and report back through a channel
//! - Observers read snapshots from a `watch` channel; no locks
//! - Two observers of the same resource get two machines and two reads (no sharing)
//!
//! ## Testing
//!
//! See the [`mock`] module for scripted and channel-driven readers.

pub mod client;
pub mod error;
pub mod machine;
pub mod message;
pub mod mock;
pub mod reader;
pub mod state;
pub mod tracing;

pub use client::FetchClient;
pub use error::FetchError;
pub use machine::{FetchMachine, FetchOptions};
pub use message::{FetchRequest, Response, Settlement};
pub use reader::{Reader, SnapshotOf, StateOf};
pub use state::{FetchSnapshot, FetchState, FetchStatus};
