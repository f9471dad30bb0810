use crate::backend::{build_router, BackendError, Seed, StoreActor, StoreClient};
use crate::model::{Bookable, Booking};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info};

const STORE_BUFFER: usize = 64;

struct Server {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<std::io::Result<()>>,
}

/// The running development backend: one store actor per collection and,
/// once [`serve`](Self::serve) is called, an HTTP server in front of them.
pub struct BackendSystem {
    pub bookables: StoreClient<Bookable>,
    pub bookings: StoreClient<Booking>,
    handles: Vec<JoinHandle<()>>,
    server: Option<Server>,
}

impl BackendSystem {
    /// Spawns the store actors holding `seed`.
    pub fn start(seed: Seed) -> Self {
        let (bookable_store, bookables) = StoreActor::new(STORE_BUFFER, seed.bookables);
        let (booking_store, bookings) = StoreActor::new(STORE_BUFFER, seed.bookings);

        let handles = vec![
            tokio::spawn(bookable_store.run()),
            tokio::spawn(booking_store.run()),
        ];

        Self {
            bookables,
            bookings,
            handles,
            server: None,
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.bookables.clone(), self.bookings.clone())
    }

    /// Binds `addr` and serves the REST routes until [`shutdown`](Self::shutdown).
    ///
    /// Returns the bound address, which differs from `addr` when port 0 was asked for.
    pub async fn serve(&mut self, addr: impl ToSocketAddrs) -> Result<SocketAddr, BackendError> {
        if let Some(server) = &self.server {
            return Ok(server.addr);
        }

        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        let (stop, stopped) = oneshot::channel::<()>();
        let router = self.router();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = stopped.await;
                })
                .await
        });
        info!(%addr, "Backend listening");

        self.server = Some(Server { addr, stop, handle });
        Ok(addr)
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.as_ref().map(|s| s.addr)
    }

    /// Stops the server, then the stores, and waits for all of them.
    pub async fn shutdown(self) -> Result<(), BackendError> {
        info!("Shutting down backend...");

        // The router holds store clients, so the server must go first.
        if let Some(server) = self.server {
            let _ = server.stop.send(());
            match server.handle.await {
                Ok(result) => result?,
                Err(e) => {
                    error!("Server task failed: {:?}", e);
                    return Err(BackendError::Unavailable(format!("Server task failed: {e}")));
                }
            }
        }

        drop(self.bookables);
        drop(self.bookings);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(BackendError::Unavailable(format!("Store task failed: {e}")));
            }
        }

        info!("Backend shutdown complete.");
        Ok(())
    }
}
