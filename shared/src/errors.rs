//! Error types for the Agrifinance application

use serde_json::{Map, Value};
use thiserror::Error;

use crate::validation::get_field_display_label;

/// A single message attached to a named input field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Field-level validation failures, kept in the order they were found.
///
/// A field may carry several messages (e.g. a password that is both too
/// short and entirely numeric).
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{}", self.summary())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a failure on exactly one field
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Record the error side of a field check, if any
    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The first field that failed
    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    /// Messages recorded for one field
    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// User-facing one-liner built from the first failure
    pub fn summary(&self) -> String {
        match self.first() {
            Some(e) => format!("{}: {}", get_field_display_label(&e.field), e.message),
            None => "Invalid input".to_string(),
        }
    }

    /// `{"field": ["message", ...]}` map for the error response body
    pub fn to_details(&self) -> Value {
        let mut map = Map::new();
        for e in &self.errors {
            let entry = map
                .entry(e.field.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(messages) = entry {
                messages.push(Value::String(e.message.clone()));
            }
        }
        Value::Object(map)
    }
}
