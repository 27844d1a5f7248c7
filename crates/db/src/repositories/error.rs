//! Error type shared by the ledger repositories.

use sea_orm::{DbErr, SqlErr};

use assetbook_core::AssetLedgerError;
use assetbook_shared::AppError;

/// Errors returned by ledger repository operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerRepoError {
    /// A domain rule rejected the call.
    #[error(transparent)]
    Ledger(#[from] AssetLedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl LedgerRepoError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Ledger(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Ledger(e) => e.http_status_code(),
            Self::Database(e) if is_transient(e) => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns true if the failure was a transaction conflict.
    ///
    /// Callers may retry idempotent operations (seeding, recalculation) once
    /// on such errors. Movement posting is never retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Ledger(_) => false,
            Self::Database(e) => is_transient(e),
        }
    }

    /// Returns the domain error, if this is one.
    #[must_use]
    pub const fn as_ledger(&self) -> Option<&AssetLedgerError> {
        match self {
            Self::Ledger(e) => Some(e),
            Self::Database(_) => None,
        }
    }
}

impl From<LedgerRepoError> for AppError {
    fn from(err: LedgerRepoError) -> Self {
        match err {
            LedgerRepoError::Ledger(e) => match e.http_status_code() {
                404 => Self::NotFound(e.to_string()),
                409 => Self::Conflict(e.to_string()),
                _ => Self::Validation(e.to_string()),
            },
            LedgerRepoError::Database(e) if is_transient(&e) => Self::Conflict(e.to_string()),
            LedgerRepoError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Unique violations, serialization failures and deadlocks.
fn is_transient(err: &DbErr) -> bool {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }
    let message = err.to_string();
    message.contains("40001")
        || message.contains("40P01")
        || message.contains("could not serialize access")
        || message.contains("deadlock detected")
}
