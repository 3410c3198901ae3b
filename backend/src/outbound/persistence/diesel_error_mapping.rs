//! Shared classification of Diesel errors for the repositories.
//!
//! Each repository turns a [`DieselFailure`] into its own port error; the
//! constraint name decides which conflict variant applies.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Repository-relevant shape of a Diesel error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    UniqueViolation { constraint: Option<String> },
    ForeignKeyViolation { constraint: Option<String> },
    Connection(&'static str),
    Query(&'static str),
}

impl DieselFailure {
    /// Whether this is a unique violation of `constraint`.
    pub(crate) fn violates_unique(&self, constraint: &str) -> bool {
        matches!(self, Self::UniqueViolation { constraint: Some(name) } if name == constraint)
    }

    /// Whether this is a foreign key violation of `constraint`.
    pub(crate) fn violates_foreign_key(&self, constraint: &str) -> bool {
        matches!(self, Self::ForeignKeyViolation { constraint: Some(name) } if name == constraint)
    }

    /// Fallback message for failures without a dedicated port variant.
    pub(crate) fn message(&self) -> &'static str {
        match self {
            Self::UniqueViolation { .. } => "unique constraint violated",
            Self::ForeignKeyViolation { .. } => "foreign key constraint violated",
            Self::Connection(message) | Self::Query(message) => message,
        }
    }

    pub(crate) fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Classify a Diesel error, logging the driver detail at debug level.
pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(kind, info) => {
            let constraint = info.constraint_name().map(str::to_owned);
            match kind {
                DatabaseErrorKind::UniqueViolation => {
                    DieselFailure::UniqueViolation { constraint }
                }
                DatabaseErrorKind::ForeignKeyViolation => {
                    DieselFailure::ForeignKeyViolation { constraint }
                }
                DatabaseErrorKind::ClosedConnection => {
                    DieselFailure::Connection("database connection error")
                }
                _ => DieselFailure::Query("database error"),
            }
        }
        _ => DieselFailure::Query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn not_found_is_a_query_failure() {
        assert_eq!(
            classify_diesel_error(DieselError::NotFound),
            DieselFailure::Query("record not found")
        );
    }

    #[rstest]
    fn unique_violation_matches_only_its_constraint() {
        let failure = DieselFailure::UniqueViolation {
            constraint: Some("users_email_key".into()),
        };
        assert!(failure.violates_unique("users_email_key"));
        assert!(!failure.violates_unique("projects_title_key"));
        assert!(!failure.violates_foreign_key("users_email_key"));
    }

    #[rstest]
    fn unnamed_violation_matches_nothing() {
        let failure = DieselFailure::ForeignKeyViolation { constraint: None };
        assert!(!failure.violates_foreign_key("projects_author_id_fkey"));
        assert_eq!(failure.message(), "foreign key constraint violated");
    }

    #[rstest]
    fn connection_failures_are_flagged() {
        assert!(DieselFailure::Connection("database connection error").is_connection());
        assert!(!DieselFailure::Query("database error").is_connection());
    }
}
