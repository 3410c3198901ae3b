//! Visitor contact messages.
//!
//! Messages are a write-only sink: they are stored and never read back by
//! the site itself.

use std::sync::Arc;

use tracing::info;

use super::Error;
use super::ports::{ContactMessageRepository, ContactPersistenceError};

/// Maximum stored length for the sender name, email and subject.
pub const CONTACT_FIELD_MAX: usize = 100;
/// Maximum stored length for the message body.
pub const CONTACT_MESSAGE_MAX: usize = 1000;

/// Validated contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    /// Optional; empty when the visitor left it blank.
    pub subject: String,
    /// Optional; empty when the visitor left it blank.
    pub message: String,
}

/// Identity assigned to a stored message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContactMessageId(i32);

impl ContactMessageId {
    /// Wrap a store-assigned identity.
    #[must_use]
    pub fn from_stored(raw: i32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn get(self) -> i32 {
        self.0
    }
}

fn map_contact_persistence_error(error: ContactPersistenceError) -> Error {
    match error {
        ContactPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("contact repository unavailable: {message}"))
        }
        ContactPersistenceError::Query { message } => {
            Error::internal(format!("contact repository error: {message}"))
        }
    }
}

/// Accepts visitor messages.
#[derive(Clone)]
pub struct ContactService {
    messages: Arc<dyn ContactMessageRepository>,
}

impl ContactService {
    #[must_use]
    pub fn new(messages: Arc<dyn ContactMessageRepository>) -> Self {
        Self { messages }
    }

    /// Store a validated message.
    pub async fn submit(&self, draft: &ContactDraft) -> Result<ContactMessageId, Error> {
        let id = self
            .messages
            .create(draft)
            .await
            .map_err(map_contact_persistence_error)?;
        info!(message_id = id.get(), "stored contact message");
        Ok(id)
    }
}
