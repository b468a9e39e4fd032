//! Service-layer error type for the catalog server
//!
//! `ServiceError` bridges store errors (`sqlx::Error`) and the API-layer error
//! (`AppError`). Store detail is logged once when crossing into `AppError` and
//! never reaches the client.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCategory, ErrorCode};
use std::fmt;
use thiserror::Error;

/// PostgreSQL SQLSTATE codes the catalog reacts to
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

/// Thing a lookup failed to find
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Product(i64),
    Category(i64),
    Record,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Product(id) => write!(f, "product {id}"),
            Entity::Category(id) => write!(f, "category {id}"),
            Entity::Record => f.write_str("record"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Entity absent or soft-deleted
    #[error("{0} not found")]
    NotFound(Entity),

    /// Input violates a precondition
    #[error("validation failed: {0}")]
    Validation(String),

    /// Cycle or over-deep chain in stored data
    #[error("data integrity violation: {0}")]
    DataIntegrity(String),

    /// Storage rejected a duplicate active slug; retryable
    #[error("slug '{0}' is already taken")]
    SlugConflict(String),

    /// Store operation exceeded its budget
    #[error("{0} timed out")]
    Timeout(&'static str),

    #[error("store error: {0}")]
    Store(#[source] sqlx::Error),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_slug_conflict(&self) -> bool {
        matches!(self, Self::SlugConflict(_))
    }

    /// Attach the candidate slug to a uniqueness violation raised by storage
    pub fn with_slug(self, slug: &str) -> Self {
        match self {
            Self::SlugConflict(_) => Self::SlugConflict(slug.to_string()),
            other => other,
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => return ServiceError::NotFound(Entity::Record),
            // acquire_timeout shares the query budget, so contention surfaces here
            sqlx::Error::PoolTimedOut => return ServiceError::Timeout("pool_acquire"),
            _ => {}
        }
        let Some(db_err) = e.as_database_error() else {
            return ServiceError::Store(e);
        };
        let code = db_err.code().map(|c| c.into_owned());
        let constraint = db_err.constraint().map(str::to_string);
        match code.as_deref() {
            Some(UNIQUE_VIOLATION) => ServiceError::SlugConflict(constraint.unwrap_or_default()),
            Some(FOREIGN_KEY_VIOLATION) => ServiceError::Validation(format!(
                "referenced row does not exist ({})",
                constraint.as_deref().unwrap_or("foreign key")
            )),
            Some(CHECK_VIOLATION) => ServiceError::Validation(format!(
                "value out of range ({})",
                constraint.as_deref().unwrap_or("check")
            )),
            _ => ServiceError::Store(e),
        }
    }
}

/// The single place where server-side failures are logged; the client only
/// sees the code's opaque message.
impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        let app_error = match &e {
            ServiceError::NotFound(entity) => {
                let code = match entity {
                    Entity::Product(_) => ErrorCode::ProductNotFound,
                    Entity::Category(_) => ErrorCode::CategoryNotFound,
                    Entity::Record => ErrorCode::NotFound,
                };
                let err = AppError::with_message(code, format!("{entity} not found"));
                match entity {
                    Entity::Product(id) | Entity::Category(id) => err.with_detail("id", *id),
                    Entity::Record => err,
                }
            }
            ServiceError::Validation(msg) => AppError::validation(msg.clone()),
            ServiceError::SlugConflict(slug) => AppError::with_message(
                ErrorCode::ProductSlugConflict,
                "Could not assign a unique slug, retry the request",
            )
            .with_detail("slug", slug.clone()),
            ServiceError::Timeout(_) => AppError::new(ErrorCode::TimeoutError),
            ServiceError::DataIntegrity(_) => AppError::new(ErrorCode::DataIntegrityError),
            ServiceError::Store(_) => AppError::new(ErrorCode::DatabaseError),
        };

        if app_error.code.category() == ErrorCategory::System {
            if app_error.code.is_retryable() {
                tracing::warn!(code = %app_error.code, error = %e, "Store operation timed out");
            } else {
                tracing::error!(code = %app_error.code, error = %e, "Catalog request failed");
            }
        }
        app_error
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;
