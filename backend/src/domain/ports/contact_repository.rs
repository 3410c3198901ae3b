//! Port abstraction for the contact message sink.
use async_trait::async_trait;

use crate::domain::{ContactDraft, ContactMessageId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by contact message adapters.
    pub enum ContactPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "contact repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "contact repository query failed: {message}",
    }
}

/// Write-only storage for visitor messages.
#[async_trait]
pub trait ContactMessageRepository: Send + Sync {
    /// Store a message and return its identity.
    async fn create(
        &self,
        message: &ContactDraft,
    ) -> Result<ContactMessageId, ContactPersistenceError>;
}
