//! # Bookable Client
//!
//! Wraps a `RestClient<Bookable>` and adds validation and not-found mapping.
use super::client_trait::ApiClient;
use super::error::ApiError;
use super::rest::RestClient;
use crate::model::{Bookable, BookableCreate, BookableId, BookableUpdate};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum BookableError {
    #[error("Bookable not found: {0}")]
    NotFound(BookableId),

    #[error("Invalid bookable: {0}")]
    Invalid(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Clone)]
pub struct BookableClient {
    inner: RestClient<Bookable>,
}

impl BookableClient {
    pub fn new(inner: RestClient<Bookable>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ApiClient<Bookable> for BookableClient {
    type Error = BookableError;

    fn inner(&self) -> &RestClient<Bookable> {
        &self.inner
    }
}

impl BookableClient {
    /// Creates a bookable after checking its title, group, days and sessions.
    #[instrument(skip(self))]
    pub async fn create_bookable(&self, params: BookableCreate) -> Result<Bookable, BookableError> {
        params.validate().map_err(BookableError::Invalid)?;
        debug!("Sending request");
        self.inner.create(&params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_bookable(
        &self,
        id: BookableId,
        update: BookableUpdate,
    ) -> Result<Bookable, BookableError> {
        if update.is_empty() {
            return Err(BookableError::Invalid("nothing to update".to_string()));
        }
        update.validate().map_err(BookableError::Invalid)?;

        debug!("Sending request");
        self.inner
            .update(id, &update)
            .await
            .map_err(|e| not_found_or(id, e))
    }

    /// Replaces the whole record, as the edit form does on save.
    #[instrument(skip(self))]
    pub async fn replace_bookable(&self, bookable: Bookable) -> Result<Bookable, BookableError> {
        bookable.validate().map_err(BookableError::Invalid)?;
        debug!("Sending request");
        self.inner
            .replace(bookable.id, &bookable)
            .await
            .map_err(|e| not_found_or(bookable.id, e))
    }

    /// Like [`ApiClient::get`] but a missing bookable is an error.
    #[instrument(skip(self))]
    pub async fn require(&self, id: BookableId) -> Result<Bookable, BookableError> {
        self.get(id).await?.ok_or(BookableError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_bookable(&self, id: BookableId) -> Result<(), BookableError> {
        self.delete(id).await.map_err(|e| match e {
            BookableError::Api(api) => not_found_or(id, api),
            other => other,
        })
    }
}

fn not_found_or(id: BookableId, e: ApiError) -> BookableError {
    if e.is_not_found() {
        BookableError::NotFound(id)
    } else {
        BookableError::Api(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client() -> BookableClient {
        // Nothing listens here; validation must fail before any request is sent.
        BookableClient::new(RestClient::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap())
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payload_without_sending() {
        let params = BookableCreate {
            group: "Rooms".into(),
            title: String::new(),
            notes: String::new(),
            sessions: vec![],
            days: vec![],
        };
        let result = client().create_bookable(params).await;
        assert!(matches!(result, Err(BookableError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_empty_and_out_of_range() {
        let result = client()
            .update_bookable(BookableId(1), BookableUpdate::default())
            .await;
        assert!(matches!(result, Err(BookableError::Invalid(msg)) if msg == "nothing to update"));

        let update = BookableUpdate {
            sessions: Some(vec![5]),
            ..Default::default()
        };
        let result = client().update_bookable(BookableId(1), update).await;
        assert!(matches!(result, Err(BookableError::Invalid(msg)) if msg == "unknown session: 5"));

        let update = BookableUpdate {
            group: Some("  ".into()),
            ..Default::default()
        };
        let result = client().update_bookable(BookableId(1), update).await;
        assert!(matches!(result, Err(BookableError::Invalid(msg)) if msg == "group must not be empty"));
    }

    #[test]
    fn test_not_found_mapping() {
        let missing = ApiError::Status {
            status: 404,
            url: "http://localhost:3001/bookables/4".into(),
        };
        assert!(matches!(
            not_found_or(BookableId(4), missing),
            BookableError::NotFound(BookableId(4))
        ));

        let broken = ApiError::Status {
            status: 500,
            url: "http://localhost:3001/bookables/4".into(),
        };
        assert!(matches!(
            not_found_or(BookableId(4), broken),
            BookableError::Api(_)
        ));
    }
}
