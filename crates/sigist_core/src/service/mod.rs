//! Use-case services over the stores.
//!
//! # Responsibility
//! - Assign ids and creation timestamps before persistence.
//! - Keep HTTP layers decoupled from SQL and publisher details.

pub mod email_service;
pub mod record_service;

use chrono::{SecondsFormat, Utc};

/// Current UTC time in the RFC 3339 wire format used for `created_at`.
pub fn created_at_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
