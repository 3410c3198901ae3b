//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, EmailAddress, NewUser, PasswordHash, User, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{USERS_EMAIL_KEY, users};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

fn map_failure(failure: DieselFailure, email: Option<&EmailAddress>) -> UserPersistenceError {
    if let Some(email) = email
        && failure.violates_unique(USERS_EMAIL_KEY)
    {
        return UserPersistenceError::duplicate_email(email.as_ref());
    }
    if failure.is_connection() {
        UserPersistenceError::connection(failure.message())
    } else {
        UserPersistenceError::query(failure.message())
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_failure(classify_diesel_error(error), None)
}

/// Convert a database row to a domain user.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let corrupted = |err: crate::domain::UserValidationError| {
        UserPersistenceError::query(format!("corrupted user row {}: {err}", row.id))
    };
    let id = UserId::new(row.id).map_err(corrupted)?;
    let new_user = NewUser {
        email: EmailAddress::new(&row.email).map_err(corrupted)?,
        name: DisplayName::new(&row.name).map_err(corrupted)?,
        password_hash: PasswordHash::new(row.password.as_str()).map_err(corrupted)?,
    };
    Ok(User::from_new(id, new_user))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            email: user.email.as_ref(),
            password: user.password_hash.as_ref(),
            name: user.name.as_ref(),
        };
        let id: i32 = diesel::insert_into(users::table)
            .values(&row)
            .returning(users::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err), Some(&user.email)))?;

        let id = UserId::new(id)
            .map_err(|err| UserPersistenceError::query(format!("invalid assigned id: {err}")))?;
        Ok(User::from_new(id, user.clone()))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }
}
