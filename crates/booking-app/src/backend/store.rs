//! # Store Actor
//!
//! One `StoreActor<T>` owns one collection of the development backend. HTTP
//! handlers never touch the records; they hold a cloneable [`StoreClient`] and
//! send it requests, which the actor processes one at a time.

use super::record::Record;
use std::collections::BTreeMap;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Store closed")]
    ActorClosed,

    #[error("Store dropped response channel")]
    ActorDropped,

    #[error("{collection} {id} not found")]
    NotFound { collection: &'static str, id: u32 },

    #[error("{0}")]
    Invalid(String),
}

pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

#[derive(Debug)]
pub enum StoreRequest<T: Record> {
    List {
        filter: T::Filter,
        respond_to: Response<Vec<T>>,
    },
    Get {
        id: u32,
        respond_to: Response<Option<T>>,
    },
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    Update {
        id: u32,
        update: T::Update,
        respond_to: Response<T>,
    },
    Replace {
        id: u32,
        params: T::Create,
        respond_to: Response<T>,
    },
    Delete {
        id: u32,
        respond_to: Response<T>,
    },
}

pub struct StoreActor<T: Record> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    records: BTreeMap<u32, T>,
}

impl<T: Record> StoreActor<T> {
    /// Creates a store holding `seed` and the client that talks to it.
    pub fn new(buffer_size: usize, seed: Vec<T>) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let mut records = BTreeMap::new();
        for record in seed {
            if let Some(previous) = records.insert(record.key(), record) {
                warn!(collection = T::COLLECTION, id = previous.key(), "Duplicate seed id, keeping the last");
            }
        }
        let actor = Self { receiver, records };
        (actor, StoreClient::new(sender))
    }

    /// One past the largest id currently stored, or `None` once `u32::MAX` is taken.
    fn next_id(&self) -> Option<u32> {
        match self.records.keys().next_back() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }

    pub async fn run(mut self) {
        let collection = T::COLLECTION;
        info!(collection, size = self.records.len(), "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::List { filter, respond_to } => {
                    let items: Vec<T> = self
                        .records
                        .values()
                        .filter(|r| r.matches(&filter))
                        .cloned()
                        .collect();
                    debug!(collection, ?filter, count = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                StoreRequest::Get { id, respond_to } => {
                    let item = self.records.get(&id).cloned();
                    debug!(collection, id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                StoreRequest::Create { params, respond_to } => {
                    debug!(collection, ?params, "Create");
                    let Some(id) = self.next_id() else {
                        warn!(collection, "Id space exhausted");
                        let _ = respond_to.send(Err(StoreError::Invalid("id space exhausted".to_string())));
                        continue;
                    };
                    match T::from_create(id, params) {
                        Ok(item) => {
                            self.records.insert(id, item.clone());
                            info!(collection, id, size = self.records.len(), "Created");
                            let _ = respond_to.send(Ok(item));
                        }
                        Err(e) => {
                            warn!(collection, error = %e, "Create failed");
                            let _ = respond_to.send(Err(StoreError::Invalid(e)));
                        }
                    }
                }
                StoreRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(collection, id, ?update, "Update");
                    let result = match self.records.get_mut(&id) {
                        Some(item) => item
                            .apply_update(update)
                            .map(|()| item.clone())
                            .map_err(StoreError::Invalid),
                        None => Err(StoreError::NotFound { collection, id }),
                    };
                    match &result {
                        Ok(_) => info!(collection, id, "Updated"),
                        Err(e) => warn!(collection, id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Replace {
                    id,
                    params,
                    respond_to,
                } => {
                    debug!(collection, id, ?params, "Replace");
                    let result = if self.records.contains_key(&id) {
                        T::from_create(id, params).map_err(StoreError::Invalid)
                    } else {
                        Err(StoreError::NotFound { collection, id })
                    };
                    match &result {
                        Ok(item) => {
                            self.records.insert(id, item.clone());
                            info!(collection, id, "Replaced");
                        }
                        Err(e) => warn!(collection, id, error = %e, "Replace failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Delete { id, respond_to } => {
                    debug!(collection, id, "Delete");
                    match self.records.remove(&id) {
                        Some(item) => {
                            info!(collection, id, size = self.records.len(), "Deleted");
                            let _ = respond_to.send(Ok(item));
                        }
                        None => {
                            warn!(collection, id, "Not found");
                            let _ = respond_to.send(Err(StoreError::NotFound { collection, id }));
                        }
                    }
                }
            }
        }

        info!(collection, size = self.records.len(), "Shutdown");
    }
}

pub struct StoreClient<T: Record> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

impl<T: Record> Clone for StoreClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Record> StoreClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> StoreRequest<T>,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    pub async fn list(&self, filter: T::Filter) -> Result<Vec<T>, StoreError> {
        self.request(|respond_to| StoreRequest::List { filter, respond_to })
            .await
    }

    pub async fn get(&self, id: u32) -> Result<Option<T>, StoreError> {
        self.request(|respond_to| StoreRequest::Get { id, respond_to })
            .await
    }

    pub async fn create(&self, params: T::Create) -> Result<T, StoreError> {
        self.request(|respond_to| StoreRequest::Create { params, respond_to })
            .await
    }

    pub async fn update(&self, id: u32, update: T::Update) -> Result<T, StoreError> {
        self.request(|respond_to| StoreRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    pub async fn replace(&self, id: u32, params: T::Create) -> Result<T, StoreError> {
        self.request(|respond_to| StoreRequest::Replace {
            id,
            params,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, id: u32) -> Result<T, StoreError> {
        self.request(|respond_to| StoreRequest::Delete { id, respond_to })
            .await
    }
}
