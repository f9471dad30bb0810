//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG` (defaulting to `info`).
//!
//! ## What Gets Traced
//!
//! - **Machine lifecycle**: `Fetch machine started` / `Fetch machine detached`
//! - **Attempts**: `Loading` with the resource and generation at debug level
//! - **Settlements**: `Read succeeded`, `Read failed` (with the error), and
//!   `Discarding superseded result` for stale reads
//!
//! ```bash
//! RUST_LOG=info bookings bookables list
//! RUST_LOG=fetch_framework=debug bookings bookings grid --bookable 1
//! ```
use tracing_subscriber::EnvFilter;

pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
