//! PostgreSQL-backed `ContactMessageRepository` implementation.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ContactMessageRepository, ContactPersistenceError};
use crate::domain::{ContactDraft, ContactMessageId};

use super::diesel_error_mapping::classify_diesel_error;
use super::models::NewContactRow;
use super::pool::{DbPool, PoolError};
use super::schema::contact;

/// Diesel-backed sink for visitor messages.
#[derive(Clone)]
pub struct DieselContactMessageRepository {
    pool: DbPool,
}

impl DieselContactMessageRepository {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ContactPersistenceError {
    ContactPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> ContactPersistenceError {
    let failure = classify_diesel_error(error);
    if failure.is_connection() {
        ContactPersistenceError::connection(failure.message())
    } else {
        ContactPersistenceError::query(failure.message())
    }
}

#[async_trait]
impl ContactMessageRepository for DieselContactMessageRepository {
    async fn create(
        &self,
        message: &ContactDraft,
    ) -> Result<ContactMessageId, ContactPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewContactRow {
            name: &message.name,
            email: &message.email,
            subject: &message.subject,
            message: &message.message,
        };
        let id: i32 = diesel::insert_into(contact::table)
            .values(&row)
            .returning(contact::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(ContactMessageId::from_stored(id))
    }
}
