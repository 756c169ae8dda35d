//! Shared Diesel error mapping for repositories with basic query semantics.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
///
/// Detailed driver messages are logged at debug level; constructors receive
/// stable, client-safe messages only.
pub fn map_basic_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

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
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::domain::ports::JoinRequestRepositoryError;

    use super::*;

    #[rstest]
    fn pool_errors_map_to_connection() {
        let mapped: JoinRequestRepositoryError = map_basic_pool_error(
            PoolError::checkout("pool exhausted"),
            JoinRequestRepositoryError::connection,
        );
        assert_eq!(
            mapped,
            JoinRequestRepositoryError::connection("pool exhausted")
        );
    }

    #[rstest]
    fn closed_connection_maps_to_connection() {
        let error = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ClosedConnection,
            Box::new("gone".to_owned()),
        );
        let mapped: JoinRequestRepositoryError = map_basic_diesel_error(
            error,
            JoinRequestRepositoryError::query,
            JoinRequestRepositoryError::connection,
        );
        assert!(matches!(
            mapped,
            JoinRequestRepositoryError::Connection { .. }
        ));
    }

    #[rstest]
    fn not_found_maps_to_query() {
        let mapped: JoinRequestRepositoryError = map_basic_diesel_error(
            diesel::result::Error::NotFound,
            JoinRequestRepositoryError::query,
            JoinRequestRepositoryError::connection,
        );
        assert!(matches!(mapped, JoinRequestRepositoryError::Query { .. }));
    }
}
