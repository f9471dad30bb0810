//! # Records
//!
//! The [`Record`] trait tells a [`StoreActor`](super::StoreActor) how to build,
//! patch and filter one kind of stored document.

use crate::model::booking::validate_session;
use crate::model::{Bookable, BookableCreate, BookableId, BookableUpdate};
use crate::model::{Booking, BookingCreate, BookingId, BookingUpdate};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A document type held by the development backend.
///
/// # Contract
/// - `from_create` and `apply_update` validate before they build or mutate; an
///   `Err` leaves the stored record untouched.
/// - `matches` is a pure predicate over query-string filters.
pub trait Record: Clone + Serialize + DeserializeOwned + Debug + Send + Sync + 'static {
    /// Collection path segment, e.g. `"bookings"`.
    const COLLECTION: &'static str;

    /// Body of `POST /{collection}` and `PUT /{collection}/{id}`.
    type Create: DeserializeOwned + Debug + Send + 'static;
    /// Body of `PATCH /{collection}/{id}`.
    type Update: DeserializeOwned + Debug + Send + 'static;
    /// Query string of `GET /{collection}`.
    type Filter: DeserializeOwned + Default + Debug + Send + 'static;

    fn key(&self) -> u32;

    fn from_create(id: u32, params: Self::Create) -> Result<Self, String>;

    fn apply_update(&mut self, update: Self::Update) -> Result<(), String>;

    fn matches(&self, filter: &Self::Filter) -> bool;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookableFilter {
    pub group: Option<String>,
}

impl Record for Bookable {
    const COLLECTION: &'static str = "bookables";
    type Create = BookableCreate;
    type Update = BookableUpdate;
    type Filter = BookableFilter;

    fn key(&self) -> u32 {
        self.id.0
    }

    fn from_create(id: u32, params: BookableCreate) -> Result<Self, String> {
        params.validate()?;
        Ok(Bookable {
            id: BookableId(id),
            group: params.group,
            title: params.title,
            notes: params.notes,
            sessions: params.sessions,
            days: params.days,
        })
    }

    fn apply_update(&mut self, update: BookableUpdate) -> Result<(), String> {
        update.validate()?;

        if let Some(group) = update.group {
            self.group = group;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
        if let Some(sessions) = update.sessions {
            self.sessions = sessions;
        }
        if let Some(days) = update.days {
            self.days = days;
        }
        Ok(())
    }

    fn matches(&self, filter: &BookableFilter) -> bool {
        filter.group.as_ref().map_or(true, |g| *g == self.group)
    }
}

/// json-server style filters: exact `bookableId` and `date`, inclusive
/// `date_gte`/`date_lte` range.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilter {
    #[serde(rename = "bookableId")]
    pub bookable_id: Option<u32>,
    pub date: Option<NaiveDate>,
    pub date_gte: Option<NaiveDate>,
    pub date_lte: Option<NaiveDate>,
}

impl Record for Booking {
    const COLLECTION: &'static str = "bookings";
    type Create = BookingCreate;
    type Update = BookingUpdate;
    type Filter = BookingFilter;

    fn key(&self) -> u32 {
        self.id.0
    }

    fn from_create(id: u32, params: BookingCreate) -> Result<Self, String> {
        params.validate()?;
        Ok(Booking {
            id: BookingId(id),
            bookable_id: params.bookable_id,
            booker_id: params.booker_id,
            session: params.session,
            date: params.date,
            title: params.title,
            notes: params.notes,
        })
    }

    fn apply_update(&mut self, update: BookingUpdate) -> Result<(), String> {
        if let Some(session) = update.session.as_deref() {
            validate_session(session)?;
        }
        if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err("title must not be empty".to_string());
        }

        if let Some(session) = update.session {
            self.session = session;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
        Ok(())
    }

    fn matches(&self, filter: &BookingFilter) -> bool {
        filter.bookable_id.map_or(true, |id| id == self.bookable_id.0)
            && filter.date.map_or(true, |d| d == self.date)
            && filter.date_gte.map_or(true, |d| self.date >= d)
            && filter.date_lte.map_or(true, |d| self.date <= d)
    }
}
