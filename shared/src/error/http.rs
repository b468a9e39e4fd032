//! HTTP status for each error code

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::ValidationFailed | Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::ProductNotFound | Self::CategoryNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::ProductSlugConflict => StatusCode::CONFLICT,
            // transient, the client may retry
            Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::DataIntegrityError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert_eq!(ErrorCode::ValidationFailed.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidRequest.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::ProductNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::CategoryNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::ProductSlugConflict.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_server_errors() {
        assert_eq!(ErrorCode::TimeoutError.http_status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            ErrorCode::DataIntegrityError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
