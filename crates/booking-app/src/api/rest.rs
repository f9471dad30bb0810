//! # REST Client
//!
//! Generic CRUD over one json-server style collection: `GET /things`,
//! `GET /things/{id}`, `POST /things`, `PATCH /things/{id}`, `PUT /things/{id}`,
//! `DELETE /things/{id}`.

use super::error::ApiError;
use super::http::{build_http_client, check_status, decode_json, get_json, parse_base_url};
use crate::model::{Bookable, BookableCreate, BookableId, BookableUpdate};
use crate::model::{Booking, BookingCreate, BookingId, BookingUpdate};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::marker::PhantomData;
use std::time::Duration;
use tracing::debug;

/// A record type served from a REST collection.
pub trait RestResource: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Collection path segment, e.g. `"bookables"`.
    const COLLECTION: &'static str;

    type Id: Display + Debug + Copy + PartialEq + Send + Sync + 'static;
    type Create: Serialize + Debug + Send + Sync + 'static;
    type Update: Serialize + Debug + Send + Sync + 'static;

    fn id(&self) -> Self::Id;
}

impl RestResource for Bookable {
    const COLLECTION: &'static str = "bookables";
    type Id = BookableId;
    type Create = BookableCreate;
    type Update = BookableUpdate;

    fn id(&self) -> BookableId {
        self.id
    }
}

impl RestResource for Booking {
    const COLLECTION: &'static str = "bookings";
    type Id = BookingId;
    type Create = BookingCreate;
    type Update = BookingUpdate;

    fn id(&self) -> BookingId {
        self.id
    }
}

pub struct RestClient<T: RestResource> {
    http: Client,
    base_url: Url,
    _resource: PhantomData<fn() -> T>,
}

impl<T: RestResource> Clone for RestClient<T> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            _resource: PhantomData,
        }
    }
}

impl<T: RestResource> RestClient<T> {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self::from_parts(
            build_http_client(timeout)?,
            parse_base_url(base_url)?,
        ))
    }

    pub fn from_parts(http: Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            _resource: PhantomData,
        }
    }

    /// Path of the collection, e.g. `/bookables`.
    pub fn collection_path() -> String {
        format!("/{}", T::COLLECTION)
    }

    /// Path of one record, e.g. `/bookables/3`.
    pub fn item_path(id: T::Id) -> String {
        format!("/{}/{}", T::COLLECTION, id)
    }

    /// Absolute URL of the collection with `query` appended, e.g.
    /// `http://localhost:3001/bookings?bookableId=1&date_gte=2020-06-21`.
    pub fn list_url(&self, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.url(&Self::collection_path())?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url.join(path).map_err(|e| ApiError::InvalidUrl {
            url: path.to_string(),
            reason: e.to_string(),
        })
    }

    pub async fn list(&self, query: &[(&str, String)]) -> Result<Vec<T>, ApiError> {
        get_json(&self.http, self.list_url(query)?).await
    }

    /// Fetches one record. A 404 is reported as `Ok(None)`.
    pub async fn get(&self, id: T::Id) -> Result<Option<T>, ApiError> {
        match get_json(&self.http, self.url(&Self::item_path(id))?).await {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn create(&self, params: &T::Create) -> Result<T, ApiError> {
        let url = self.url(&Self::collection_path())?;
        self.send(Method::POST, url, Some(params)).await
    }

    /// Partial update: only the fields present in `update` change.
    pub async fn update(&self, id: T::Id, update: &T::Update) -> Result<T, ApiError> {
        let url = self.url(&Self::item_path(id))?;
        self.send(Method::PATCH, url, Some(update)).await
    }

    /// Full replacement of the record stored under `id`.
    pub async fn replace(&self, id: T::Id, record: &T) -> Result<T, ApiError> {
        let url = self.url(&Self::item_path(id))?;
        self.send(Method::PUT, url, Some(record)).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), ApiError> {
        let url = self.url(&Self::item_path(id))?;
        debug!(%url, "DELETE");
        let response = self
            .http
            .delete(url.clone())
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;
        check_status(response)?;
        Ok(())
    }

    async fn send<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<R, ApiError> {
        debug!(%method, %url, "Sending request");
        let mut request = self.http.request(method, url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;
        decode_json(check_status(response)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(RestClient::<Bookable>::collection_path(), "/bookables");
        assert_eq!(RestClient::<Booking>::item_path(BookingId(12)), "/bookings/12");
    }

    #[test]
    fn test_list_url_encodes_query() {
        let client = RestClient::<Booking>::from_parts(
            Client::new(),
            parse_base_url("http://localhost:3001").unwrap(),
        );
        let url = client
            .list_url(&[
                ("bookableId", "1".to_string()),
                ("date_gte", "2020-06-21".to_string()),
                ("title", "Sales & Marketing".to_string()),
            ])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3001/bookings?bookableId=1&date_gte=2020-06-21&title=Sales+%26+Marketing"
        );

        let bare = client.list_url(&[]).unwrap();
        assert_eq!(bare.as_str(), "http://localhost:3001/bookings");
    }
}
