//! Email signup use cases.

use crate::model::email::{EmailEntry, EmailRequest};
use crate::repo::email_repo::EmailStore;
use crate::repo::StoreResult;
use crate::service::created_at_now;
use log::{debug, info};
use uuid::Uuid;

/// Result of saving one email signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedEmail {
    pub entry: EmailEntry,
    /// Zero when the database reported a silent no-op.
    pub rows_affected: usize,
}

/// Email signup use cases over one store.
pub struct EmailService<S: EmailStore> {
    store: S,
}

impl<S: EmailStore> EmailService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stores a signup under a fresh UUID and the current timestamp.
    pub fn save(&self, request: &EmailRequest) -> StoreResult<SavedEmail> {
        let entry = EmailEntry {
            id: Uuid::new_v4().to_string(),
            email: request.email.clone(),
            source_name: request.source_name(),
            created_at: created_at_now(),
        };
        let rows_affected = self.store.save_email(&entry)?;

        if rows_affected == 0 {
            debug!("event=email_save module=service status=noop id={}", entry.id);
        } else {
            info!(
                "event=email_save module=service status=ok id={} source={}",
                entry.id, entry.source_name
            );
        }

        Ok(SavedEmail {
            entry,
            rows_affected,
        })
    }

    /// Returns all signups in result-set order.
    pub fn list(&self) -> StoreResult<Vec<EmailEntry>> {
        self.store.list_emails()
    }
}
