//! # System Lifecycle
//!
//! Starting, serving and stopping the development backend.
//!
//! [`BackendSystem::start`] spawns one store actor per collection and keeps
//! their clients; [`BackendSystem::serve`] puts an axum server in front of them.
//!
//! ## Shutdown
//!
//! 1. **Stop the server** - graceful shutdown, then the router and its store
//!    clients are dropped
//! 2. **Drop the system's own clients** - closes the sender side of each store channel
//! 3. **Stores detect closure** - `receiver.recv()` returns `None` and they log their final size
//! 4. **Await completion** - every store task is joined
//!
//! The stores only shut down once every client is gone, which is why the
//! server, holding clones, has to stop first.

pub mod backend_system;

pub use backend_system::*;
