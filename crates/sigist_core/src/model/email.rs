//! Email signup request and stored entry.

use serde::{Deserialize, Serialize};

/// Source name stored when a request lists no sources.
pub const DEFAULT_SOURCE: &str = "default";

/// Incoming email signup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmailRequest {
    pub email: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

impl EmailRequest {
    /// Joins sources with `,`, falling back to [`DEFAULT_SOURCE`].
    pub fn source_name(&self) -> String {
        if self.sources.is_empty() {
            DEFAULT_SOURCE.to_string()
        } else {
            self.sources.join(",")
        }
    }
}

/// One persisted row of the `emails` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailEntry {
    pub id: String,
    pub email: String,
    pub source_name: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::EmailRequest;

    #[test]
    fn empty_sources_fall_back_to_default() {
        let request = EmailRequest {
            email: "a@b.c".to_string(),
            sources: Vec::new(),
        };
        assert_eq!(request.source_name(), "default");
    }

    #[test]
    fn sources_are_comma_joined() {
        let request: EmailRequest =
            serde_json::from_str(r#"{"email":"a@b.c","sources":["web","app"]}"#).unwrap();
        assert_eq!(request.source_name(), "web,app");
    }
}
