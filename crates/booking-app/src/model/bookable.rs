//! Something that can be booked: a room, a projector, a van.
//!
//! The development backend stores bookables through
//! [`Record`](crate::backend::Record), which applies the create and update
//! DTOs defined here.
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::{DAYS, SESSIONS};

/// Type-safe identifier for Bookables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookableId(pub u32);

impl From<u32> for BookableId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for BookableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookable {
    pub id: BookableId,
    pub group: String,
    pub title: String,
    #[serde(default)]
    pub notes: String,
    /// Indices into [`SESSIONS`].
    #[serde(default)]
    pub sessions: Vec<u32>,
    /// Days of the week, 0 = Sunday.
    #[serde(default)]
    pub days: Vec<u32>,
}

impl Bookable {
    /// Creates a new Bookable with no notes and no availability.
    pub fn new(id: BookableId, group: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            group: group.into(),
            title: title.into(),
            notes: String::new(),
            sessions: Vec::new(),
            days: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_fields(&self.group, &self.title, &self.days, &self.sessions)
    }

    /// Names of the sessions this bookable is available for, in session order.
    pub fn session_names(&self) -> Vec<&'static str> {
        let mut sessions = self.sessions.clone();
        sessions.sort_unstable();
        sessions.dedup();
        sessions
            .into_iter()
            .filter_map(|s| SESSIONS.get(s as usize).copied())
            .collect()
    }

    /// Names of the days this bookable is available on, Sunday first.
    pub fn day_names(&self) -> Vec<&'static str> {
        let mut days = self.days.clone();
        days.sort_unstable();
        days.dedup();
        days.into_iter()
            .filter_map(|d| DAYS.get(d as usize).copied())
            .collect()
    }
}

/// Payload for creating a new bookable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookableCreate {
    pub group: String,
    pub title: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub sessions: Vec<u32>,
    #[serde(default)]
    pub days: Vec<u32>,
}

impl BookableCreate {
    /// Checks the fields a backend would reject.
    pub fn validate(&self) -> Result<(), String> {
        validate_fields(&self.group, &self.title, &self.days, &self.sessions)
    }
}

/// Payload for updating an existing bookable. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookableUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<u32>>,
}

impl BookableUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Checks only the fields that are present.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err("title must not be empty".to_string());
        }
        if self.group.as_deref().is_some_and(|g| g.trim().is_empty()) {
            return Err("group must not be empty".to_string());
        }
        validate_slots(
            self.days.as_deref().unwrap_or_default(),
            self.sessions.as_deref().unwrap_or_default(),
        )
    }
}

fn validate_fields(group: &str, title: &str, days: &[u32], sessions: &[u32]) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("title must not be empty".to_string());
    }
    if group.trim().is_empty() {
        return Err("group must not be empty".to_string());
    }
    validate_slots(days, sessions)
}

pub(crate) fn validate_slots(days: &[u32], sessions: &[u32]) -> Result<(), String> {
    if let Some(day) = days.iter().find(|d| **d as usize >= DAYS.len()) {
        return Err(format!("unknown day: {day}"));
    }
    if let Some(session) = sessions.iter().find(|s| **s as usize >= SESSIONS.len()) {
        return Err(format!("unknown session: {session}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bookable_json_shape() {
        let json = r#"{"id":3,"group":"Rooms","title":"Lecture Hall","sessions":[4,0,2],"days":[5,1]}"#;
        let bookable: Bookable = serde_json::from_str(json).unwrap();

        assert_eq!(bookable.id, BookableId(3));
        assert_eq!(bookable.notes, "");
        assert_eq!(bookable.session_names(), vec!["Breakfast", "Lunch", "Evening"]);
        assert_eq!(bookable.day_names(), vec!["Monday", "Friday"]);
    }

    #[test]
    fn test_create_validation() {
        let mut create = BookableCreate {
            group: "Kit".into(),
            title: "Projector".into(),
            notes: String::new(),
            sessions: vec![0, 1],
            days: vec![1, 2],
        };
        assert!(create.validate().is_ok());

        create.days.push(7);
        assert_eq!(create.validate(), Err("unknown day: 7".to_string()));

        create.days.pop();
        create.title = "  ".into();
        assert!(create.validate().is_err());
    }

    #[test]
    fn test_update_skips_absent_fields() {
        let update = BookableUpdate {
            title: Some("Renamed".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"title":"Renamed"}"#);
        assert!(!update.is_empty());
        assert!(BookableUpdate::default().is_empty());
    }

    #[test]
    fn test_update_validation() {
        let blank_group = BookableUpdate {
            group: Some(" ".into()),
            ..Default::default()
        };
        assert_eq!(blank_group.validate(), Err("group must not be empty".to_string()));

        let notes_only = BookableUpdate {
            notes: Some(String::new()),
            ..Default::default()
        };
        assert!(notes_only.validate().is_ok());
    }
}
