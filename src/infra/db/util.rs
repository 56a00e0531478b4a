use crate::application::repos::RepoError;

/// Translate sqlx failures into the repository taxonomy. Classification
/// uses the driver's structured error kind where one exists; only the
/// statement-cancellation case has no kind and falls back to the Postgres
/// message.
pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::Duplicate {
            constraint: db.constraint().unwrap_or("unknown").to_string(),
        },
        sqlx::Error::Database(db)
            if db.is_foreign_key_violation() || db.is_check_violation() =>
        {
            RepoError::InvalidInput {
                message: db.message().to_string(),
            }
        }
        sqlx::Error::Database(db)
            if db
                .message()
                .contains("canceling statement due to user request") =>
        {
            RepoError::Timeout
        }
        sqlx::Error::PoolTimedOut => RepoError::Timeout,
        other => RepoError::from_persistence(other),
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug)]
    struct StubDbError {
        kind: ErrorKind,
        message: &'static str,
        constraint: Option<&'static str>,
    }

    impl fmt::Display for StubDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message)
        }
    }

    impl StdError for StubDbError {}

    impl DatabaseError for StubDbError {
        fn message(&self) -> &str {
            self.message
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            None
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn kind(&self) -> ErrorKind {
            // `ErrorKind` is neither `Copy` nor `Clone`, so rebuild the variant.
            match self.kind {
                ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
                ErrorKind::ForeignKeyViolation => ErrorKind::ForeignKeyViolation,
                ErrorKind::NotNullViolation => ErrorKind::NotNullViolation,
                ErrorKind::CheckViolation => ErrorKind::CheckViolation,
                _ => ErrorKind::Other,
            }
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
    }

    fn db_error(kind: ErrorKind, message: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(StubDbError {
            kind,
            message,
            constraint: Some("mylist_memberships_pkey"),
        }))
    }

    #[test]
    fn unique_violation_maps_to_duplicate_with_constraint() {
        let mapped = map_sqlx_error(db_error(ErrorKind::UniqueViolation, "duplicate key"));
        match mapped {
            RepoError::Duplicate { constraint } => {
                assert_eq!(constraint, "mylist_memberships_pkey");
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn constraint_violations_map_to_invalid_input() {
        for kind in [ErrorKind::ForeignKeyViolation, ErrorKind::CheckViolation] {
            let mapped = map_sqlx_error(db_error(kind, "violates constraint"));
            assert!(matches!(mapped, RepoError::InvalidInput { .. }));
        }
    }

    #[test]
    fn cancellation_and_pool_exhaustion_map_to_timeout() {
        let mapped = map_sqlx_error(db_error(
            ErrorKind::Other,
            "canceling statement due to user request",
        ));
        assert!(matches!(mapped, RepoError::Timeout));

        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            RepoError::Timeout
        ));
    }

    #[test]
    fn missing_row_and_unclassified_errors() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            RepoError::NotFound
        ));
        assert!(matches!(
            map_sqlx_error(db_error(ErrorKind::Other, "backend exploded")),
            RepoError::Persistence(_)
        ));
    }
}
