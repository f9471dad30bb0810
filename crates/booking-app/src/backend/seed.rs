use super::error::BackendError;
use crate::model::{Bookable, Booking};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Initial contents of the development backend, in json-server's `db.json` layout:
/// `{ "bookables": [...], "bookings": [...] }`. Other top-level keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub bookables: Vec<Bookable>,
    pub bookings: Vec<Booking>,
}

impl Seed {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub async fn from_file(path: &Path) -> Result<Self, BackendError> {
        let seed_error = |message: String| BackendError::Seed {
            path: path.to_path_buf(),
            message,
        };
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| seed_error(e.to_string()))?;
        Self::from_json(&content).map_err(|e| seed_error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_ignores_unknown_collections() {
        let seed = Seed::from_json(
            r#"{
                "bookables": [{"id": 1, "group": "Rooms", "title": "Lounge", "sessions": [1], "days": [1]}],
                "users": [{"id": 1, "name": "Mark"}]
            }"#,
        )
        .unwrap();
        assert_eq!(seed.bookables.len(), 1);
        assert!(seed.bookings.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        assert!(matches!(
            Seed::from_file(&path).await,
            Err(BackendError::Seed { .. })
        ));

        tokio::fs::write(&path, "[1, 2]").await.unwrap();
        let err = Seed::from_file(&path).await.unwrap_err();
        assert!(err.to_string().contains("db.json"));
    }
}
