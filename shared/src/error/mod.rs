//! Error codes, `AppError` and the response envelope shared by the catalog
//! server and its clients
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::ProductNotFound, "product 42 not found")
//!     .with_detail("id", 42);
//! let response = ApiResponse::<()>::from(err);
//! assert_eq!(response.code, 6001);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError};
