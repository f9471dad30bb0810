//! Editable form state for the bookable forms.
//!
//! The state is a JSON object so the same code serves any DTO; decode it with
//! [`FormState::into_record`] when the form is submitted.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Form data must be a JSON object")]
    NotAnObject,

    #[error("Field '{field}' expects an integer, got '{value}'")]
    NotAnInteger { field: String, value: String },

    #[error("Field '{field}' is not a list")]
    NotAList { field: String },

    #[error("Form is incomplete: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    state: Map<String, Value>,
}

impl FormState {
    pub fn new(initial: Map<String, Value>) -> Self {
        Self { state: initial }
    }

    /// Starts from any serializable record, e.g. the bookable being edited.
    pub fn from_record<T: Serialize>(record: &T) -> Result<Self, FormError> {
        match serde_json::to_value(record)? {
            Value::Object(state) => Ok(Self { state }),
            _ => Err(FormError::NotAnObject),
        }
    }

    /// Replaces the state when fresh data arrives; `None` keeps the current edits.
    pub fn sync(&mut self, data: Option<Map<String, Value>>) {
        if let Some(data) = data {
            self.state = data;
        }
    }

    pub fn handle_change(&mut self, name: &str, value: impl Into<Value>) {
        self.state.insert(name.to_string(), value.into());
    }

    /// Adds (`checked`) or removes the integer `value` in the list stored under `name`.
    ///
    /// The list never holds duplicates; a newly checked value goes to the end.
    pub fn handle_checked(&mut self, name: &str, value: &str, checked: bool) -> Result<(), FormError> {
        let int_value: i64 = value.trim().parse().map_err(|_| FormError::NotAnInteger {
            field: name.to_string(),
            value: value.to_string(),
        })?;

        let mut values: Vec<i64> = Vec::new();
        match self.state.get(name) {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => {
                for item in items {
                    let n = item.as_i64().ok_or_else(|| FormError::NotAList {
                        field: name.to_string(),
                    })?;
                    if !values.contains(&n) {
                        values.push(n);
                    }
                }
            }
            Some(_) => {
                return Err(FormError::NotAList {
                    field: name.to_string(),
                })
            }
        }

        values.retain(|v| *v != int_value);
        if checked {
            values.push(int_value);
        }
        self.state.insert(
            name.to_string(),
            Value::Array(values.into_iter().map(Value::from).collect()),
        );
        Ok(())
    }

    pub fn state(&self) -> &Map<String, Value> {
        &self.state
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.state.get(name)
    }

    /// Decodes the current state into a DTO.
    pub fn into_record<T: DeserializeOwned>(&self) -> Result<T, FormError> {
        Ok(serde_json::from_value(Value::Object(self.state.clone()))?)
    }
}
