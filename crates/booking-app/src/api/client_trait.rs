use super::error::ApiError;
use super::rest::{RestClient, RestResource};
use async_trait::async_trait;

/// Common behavior shared by the domain clients.
///
/// Implementors provide the underlying [`RestClient`] and a way to fold
/// transport failures into their own error type; `get`, `list` and `delete`
/// come for free.
#[async_trait]
pub trait ApiClient<T: RestResource>: Send + Sync {
    type Error: From<ApiError> + Send + Sync;

    fn inner(&self) -> &RestClient<T>;

    fn map_error(e: ApiError) -> Self::Error {
        Self::Error::from(e)
    }

    #[tracing::instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn list(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list(&[]).await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}
