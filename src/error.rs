use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Venue,
    Artist,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Venue => "venue",
            EntityKind::Artist => "artist",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every failing field of one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{}", summarize(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn has(&self, field: &str) -> bool {
        self.0.iter().any(|err| err.field == field)
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|err| format!("{}: {}", err.field, err.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },
    #[error("invalid submission: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl DirectoryError {
    pub fn not_found(kind: EntityKind, id: i64) -> Self {
        DirectoryError::NotFound { kind, id }
    }
}

pub type Result<T, E = DirectoryError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_list_each_field() {
        let mut errors = ValidationErrors::default();
        errors.push("name", "this field is required");
        errors.push("phone", "invalid phone number");

        assert_eq!(
            errors.to_string(),
            "name: this field is required; phone: invalid phone number"
        );
        assert_eq!(
            DirectoryError::from(errors).to_string(),
            "invalid submission: name: this field is required; phone: invalid phone number"
        );
    }
}
