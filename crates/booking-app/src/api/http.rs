//! # HTTP Reader
//!
//! The production [`Reader`] for the fetch machine: a GET that checks the status
//! code and decodes the JSON body.

use super::error::ApiError;
use async_trait::async_trait;
use fetch_framework::Reader;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::Duration;
use tracing::debug;

/// Builds the shared HTTP client used by readers and REST clients.
pub fn build_http_client(timeout: Duration) -> Result<Client, ApiError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|source| ApiError::Transport {
            url: String::new(),
            source,
        })
}

pub fn parse_base_url(base_url: &str) -> Result<Url, ApiError> {
    let url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason: "not a base URL".to_string(),
        });
    }
    Ok(url)
}

/// Resolves `resource` against `base`.
///
/// Absolute URLs are used as they are; anything else is joined onto the base.
pub fn resolve(base: &Url, resource: &str) -> Result<Url, ApiError> {
    match Url::parse(resource) {
        Ok(url) => Ok(url),
        Err(_) => base.join(resource).map_err(|e| ApiError::InvalidUrl {
            url: resource.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Turns a non-2xx response into [`ApiError::Status`].
pub(crate) fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

/// Reads the whole body and decodes it as JSON.
pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let url = response.url().to_string();
    let bytes = response
        .bytes()
        .await
        .map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;
    serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode { url, source })
}

pub(crate) async fn get_json<T: DeserializeOwned>(http: &Client, url: Url) -> Result<T, ApiError> {
    debug!(%url, "GET");
    let response = http
        .get(url.clone())
        .send()
        .await
        .map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;
    decode_json(check_status(response)?).await
}

/// Reads JSON documents of type `T` from the bookings backend.
///
/// The resource is a path such as `/bookables` or
/// `/bookings?bookableId=1&date_gte=2020-06-21&date_lte=2020-06-27`, or an
/// absolute URL.
pub struct HttpReader<T> {
    http: Client,
    base_url: Url,
    _output: PhantomData<fn() -> T>,
}

impl<T> Clone for HttpReader<T> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            _output: PhantomData,
        }
    }
}

impl<T> HttpReader<T> {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self::from_parts(
            build_http_client(timeout)?,
            parse_base_url(base_url)?,
        ))
    }

    /// Shares an existing client, so a whole session uses one connection pool.
    pub fn from_parts(http: Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            _output: PhantomData,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl<T> Reader for HttpReader<T>
where
    T: DeserializeOwned + Clone + Debug + Send + Sync + 'static,
{
    type Resource = String;
    type Output = T;
    type Error = ApiError;

    async fn read(&self, resource: &String) -> Result<T, ApiError> {
        let url = resolve(&self.base_url, resource)?;
        get_json(&self.http, url).await
    }
}
