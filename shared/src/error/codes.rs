//! Numeric error codes returned in every catalog API envelope
//!
//! Ranges:
//! - 0xxx: request-level failures
//! - 6xxx: catalog entities (products, categories)
//! - 9xxx: server-side failures

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: Request ====================
    Success = 0,
    Unknown = 1,
    /// Payload or query parameter failed a rule
    ValidationFailed = 2,
    NotFound = 3,
    /// Path or query value could not be decoded at all
    InvalidRequest = 5,

    // ==================== 6xxx: Catalog ====================
    ProductNotFound = 6001,
    /// No unique slug could be reserved for the product
    ProductSlugConflict = 6004,
    CategoryNotFound = 6101,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    DatabaseError = 9002,
    /// A store call or the whole request ran past its budget
    TimeoutError = 9004,
    /// Stored hierarchy is cyclic or nested past the depth limit
    DataIntegrityError = 9403,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Whether the caller may retry the same request unchanged
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::ProductSlugConflict | ErrorCode::TimeoutError
        )
    }

    /// Default client-facing message
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "OK",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductSlugConflict => "Product slug is already taken",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::DataIntegrityError => "Stored catalog data is inconsistent",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Raised when decoding a code number the catalog does not define
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown catalog error code {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::Unknown,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            5 => ErrorCode::InvalidRequest,
            6001 => ErrorCode::ProductNotFound,
            6004 => ErrorCode::ProductSlugConflict,
            6101 => ErrorCode::CategoryNotFound,
            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::DatabaseError,
            9004 => ErrorCode::TimeoutError,
            9403 => ErrorCode::DataIntegrityError,
            _ => return Err(InvalidErrorCode(value)),
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
