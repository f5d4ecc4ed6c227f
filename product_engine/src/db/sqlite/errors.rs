use thiserror::Error;

use crate::api::errors::{AuthApiError, ProductApiError};

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Could not run database migrations: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

impl From<SqliteDatabaseError> for ProductApiError {
    fn from(e: SqliteDatabaseError) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

impl From<SqliteDatabaseError> for AuthApiError {
    fn from(e: SqliteDatabaseError) -> Self {
        Self::DatabaseError(e.to_string())
    }
}
