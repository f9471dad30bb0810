//! # Booking Client
//!
//! Wraps a `RestClient<Booking>`. Besides plain CRUD it knows how to ask the
//! backend for one bookable's bookings within a week.
use super::client_trait::ApiClient;
use super::error::ApiError;
use super::rest::RestClient;
use crate::model::{BookableId, Booking, BookingCreate, BookingId, BookingUpdate};
use crate::schedule::{short_iso, Week};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Booking not found: {0}")]
    NotFound(BookingId),

    #[error("Invalid booking: {0}")]
    Invalid(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Clone)]
pub struct BookingClient {
    inner: RestClient<Booking>,
}

impl BookingClient {
    pub fn new(inner: RestClient<Booking>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ApiClient<Booking> for BookingClient {
    type Error = BookingError;

    fn inner(&self) -> &RestClient<Booking> {
        &self.inner
    }
}

/// Query selecting one bookable's bookings between the week's first and last day.
pub fn week_query(bookable: BookableId, week: &Week) -> Vec<(&'static str, String)> {
    vec![
        ("bookableId", bookable.to_string()),
        ("date_gte", short_iso(week.start)),
        ("date_lte", short_iso(week.end)),
    ]
}

impl BookingClient {
    #[instrument(skip(self))]
    pub async fn create_booking(&self, params: BookingCreate) -> Result<Booking, BookingError> {
        params.validate().map_err(BookingError::Invalid)?;
        debug!("Sending request");
        self.inner.create(&params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_booking(
        &self,
        id: BookingId,
        update: BookingUpdate,
    ) -> Result<Booking, BookingError> {
        if let Some(session) = update.session.as_deref() {
            crate::model::booking::validate_session(session).map_err(BookingError::Invalid)?;
        }
        debug!("Sending request");
        self.inner.update(id, &update).await.map_err(|e| {
            if e.is_not_found() {
                BookingError::NotFound(id)
            } else {
                BookingError::Api(e)
            }
        })
    }

    /// Bookings of `bookable` whose date falls inside `week`.
    #[instrument(skip(self))]
    pub async fn bookings_for_week(
        &self,
        bookable: BookableId,
        week: &Week,
    ) -> Result<Vec<Booking>, BookingError> {
        debug!("Sending request");
        self.inner
            .list(&week_query(bookable, week))
            .await
            .map_err(Self::map_error)
    }

    /// The URL `bookings_for_week` reads, for handing to a fetch machine.
    pub fn week_url(&self, bookable: BookableId, week: &Week) -> Result<String, BookingError> {
        Ok(self
            .inner
            .list_url(&week_query(bookable, week))?
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::time::Duration;

    #[test]
    fn test_week_url() {
        let client = BookingClient::new(
            RestClient::new("http://localhost:3001", Duration::from_secs(1)).unwrap(),
        );
        let week = Week::containing(NaiveDate::from_ymd_opt(2020, 6, 24).unwrap());

        assert_eq!(
            client.week_url(BookableId(3), &week).unwrap(),
            "http://localhost:3001/bookings?bookableId=3&date_gte=2020-06-21&date_lte=2020-06-27"
        );
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_session() {
        let client = BookingClient::new(
            RestClient::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap(),
        );
        let params = BookingCreate {
            bookable_id: BookableId(1),
            booker_id: 1,
            session: "Midnight".into(),
            date: NaiveDate::from_ymd_opt(2020, 6, 24).unwrap(),
            title: "Late".into(),
            notes: String::new(),
        };
        assert!(matches!(
            client.create_booking(params).await,
            Err(BookingError::Invalid(_))
        ));
    }
}
