//! A reservation of a bookable for one session on one date.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::{BookableId, SESSIONS};

/// Type-safe identifier for Bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub u32);

impl From<u32> for BookingId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub bookable_id: BookableId,
    #[serde(default)]
    pub booker_id: u32,
    /// Session name, one of [`SESSIONS`].
    pub session: String,
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub notes: String,
}

/// Payload for creating a new booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreate {
    pub bookable_id: BookableId,
    #[serde(default)]
    pub booker_id: u32,
    pub session: String,
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub notes: String,
}

impl BookingCreate {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        validate_session(&self.session)
    }
}

/// Payload for updating an existing booking. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

pub(crate) fn validate_session(session: &str) -> Result<(), String> {
    if SESSIONS.contains(&session) {
        Ok(())
    } else {
        Err(format!("unknown session: {session}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_uses_camel_case_fields() {
        let json = r#"{"id":7,"bookableId":2,"bookerId":1,"session":"Lunch","date":"2020-06-24","title":"Sales"}"#;
        let booking: Booking = serde_json::from_str(json).unwrap();

        assert_eq!(booking.bookable_id, BookableId(2));
        assert_eq!(booking.date, NaiveDate::from_ymd_opt(2020, 6, 24).unwrap());

        let round = serde_json::to_value(&booking).unwrap();
        assert_eq!(round["bookableId"], 2);
        assert_eq!(round["date"], "2020-06-24");
    }

    #[test]
    fn test_create_rejects_unknown_session() {
        let create = BookingCreate {
            bookable_id: BookableId(1),
            booker_id: 0,
            session: "Brunch".into(),
            date: NaiveDate::from_ymd_opt(2020, 6, 24).unwrap(),
            title: "Catch-up".into(),
            notes: String::new(),
        };
        assert_eq!(create.validate(), Err("unknown session: Brunch".to_string()));
    }
}
