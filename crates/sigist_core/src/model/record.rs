//! Persisted user/feedback record.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned record identifier.
///
/// Serialized untagged so token ids render as JSON strings and serial ids
/// as JSON numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Random unique token (UUID v4 text) generated before insert.
    Token(String),
    /// Auto-increment value assigned by the database.
    Serial(i64),
}

impl RecordId {
    /// Generates a fresh random token id.
    pub fn new_token() -> Self {
        Self::Token(uuid::Uuid::new_v4().to_string())
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(token) => f.write_str(token),
            Self::Serial(value) => write!(f, "{value}"),
        }
    }
}

/// Caller-supplied fields for a new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
}

impl RecordInput {
    /// Creates an input with no job title and no feedback.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            job_title: None,
            feedback: None,
        }
    }

    /// Sets the optional job title.
    pub fn with_job_title(mut self, job_title: impl Into<String>) -> Self {
        self.job_title = Some(job_title.into());
        self
    }

    /// Sets the optional feedback text.
    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }
}

/// Canonical persisted record returned to callers.
///
/// Optional fields are `None` when absent, never empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub job_title: Option<String>,
    pub feedback: Option<String>,
    /// RFC 3339 timestamp set once at creation.
    pub created_at: String,
}

impl Record {
    /// Builds the outward-facing record from input plus generated fields.
    pub fn from_input(id: RecordId, input: &RecordInput, created_at: impl Into<String>) -> Self {
        Self {
            id,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
            job_title: input.job_title.clone(),
            feedback: input.feedback.clone(),
            created_at: created_at.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Record, RecordId, RecordInput};

    #[test]
    fn record_id_serializes_untagged() {
        let token = serde_json::to_string(&RecordId::Token("abc".to_string())).unwrap();
        let serial = serde_json::to_string(&RecordId::Serial(7)).unwrap();
        assert_eq!(token, "\"abc\"");
        assert_eq!(serial, "7");
    }

    #[test]
    fn new_tokens_are_unique_uuids() {
        let first = RecordId::new_token();
        let second = RecordId::new_token();
        assert_ne!(first, second);
        assert!(uuid::Uuid::parse_str(&first.to_string()).is_ok());
    }

    #[test]
    fn record_uses_camel_case_and_null_for_missing_optionals() {
        let input = RecordInput::new("John", "Doe", "john@doe.com");
        let record = Record::from_input(RecordId::Serial(1), &input, "2024-01-01T00:00:00Z");
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["firstName"], "John");
        assert_eq!(value["createdAt"], "2024-01-01T00:00:00Z");
        assert!(value["jobTitle"].is_null());
        assert!(value["feedback"].is_null());
    }

    #[test]
    fn input_optionals_default_when_missing() {
        let input: RecordInput = serde_json::from_str(
            r#"{"firstName":"John","lastName":"Doe","email":"john@doe.com"}"#,
        )
        .unwrap();
        assert_eq!(input.job_title, None);
        assert_eq!(input.feedback, None);
    }
}
