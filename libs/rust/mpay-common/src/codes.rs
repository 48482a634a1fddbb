//! Translation tables from gRPC status codes to HTTP statuses and API error codes.
//!
//! Both tables are total over [`tonic::Code`]. Codes that have no entry
//! fall back to [`UNKNOWN_ERROR`] and [`DEFAULT_HTTP_STATUS`] respectively.

use reqwest::StatusCode;
use tonic::Code;

/// API error code returned for gRPC codes missing from the table.
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// HTTP status returned for gRPC codes missing from the table.
pub const DEFAULT_HTTP_STATUS: u16 = 500;

/// Non-standard "Client Closed Request" status used for cancelled calls.
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Resolve the stable, client-facing error code for a gRPC code.
///
/// # Examples
///
/// ```
/// use mpay_common::codes::{api_error_code, UNKNOWN_ERROR};
/// use tonic::Code;
///
/// assert_eq!(api_error_code(Code::NotFound), "NOT_FOUND");
/// assert_eq!(api_error_code(Code::Ok), UNKNOWN_ERROR);
/// ```
#[must_use]
pub const fn api_error_code(code: Code) -> &'static str {
    match code {
        Code::Cancelled => "CLIENT_CLOSED_REQUEST",
        Code::Unknown | Code::Internal | Code::DataLoss => "INTERNAL_SERVER_ERROR",
        Code::InvalidArgument | Code::FailedPrecondition | Code::OutOfRange => "BAD_REQUEST",
        Code::DeadlineExceeded => "GATEWAY_TIMEOUT",
        Code::NotFound => "NOT_FOUND",
        Code::AlreadyExists | Code::Aborted => "CONFLICT",
        Code::PermissionDenied => "FORBIDDEN",
        Code::ResourceExhausted => "TOO_MANY_REQUESTS",
        Code::Unimplemented => "NOT_IMPLEMENTED",
        Code::Unavailable => "SERVICE_UNAVAILABLE",
        Code::Unauthenticated => "UNAUTHENTICATED",
        _ => UNKNOWN_ERROR,
    }
}

/// Resolve the HTTP status for a gRPC code.
///
/// `Code::Ok` is not an error and has no entry, so it resolves to
/// [`DEFAULT_HTTP_STATUS`].
#[must_use]
pub const fn http_status(code: Code) -> u16 {
    match code {
        Code::Cancelled => CLIENT_CLOSED_REQUEST,
        Code::Unknown | Code::Internal | Code::DataLoss => 500,
        Code::InvalidArgument | Code::FailedPrecondition | Code::OutOfRange => 400,
        Code::DeadlineExceeded => 504,
        Code::NotFound => 404,
        Code::AlreadyExists | Code::Aborted => 409,
        Code::PermissionDenied => 403,
        Code::ResourceExhausted => 429,
        Code::Unimplemented => 501,
        Code::Unavailable => 503,
        Code::Unauthenticated => 401,
        _ => DEFAULT_HTTP_STATUS,
    }
}

/// Same as [`http_status`], typed for use with the HTTP stack.
#[must_use]
pub fn http_status_code(code: Code) -> StatusCode {
    StatusCode::from_u16(http_status(code)).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Every code the tables are defined over, in wire order.
pub const ALL_CODES: [Code; 17] = [
    Code::Ok,
    Code::Cancelled,
    Code::Unknown,
    Code::InvalidArgument,
    Code::DeadlineExceeded,
    Code::NotFound,
    Code::AlreadyExists,
    Code::PermissionDenied,
    Code::ResourceExhausted,
    Code::FailedPrecondition,
    Code::Aborted,
    Code::OutOfRange,
    Code::Unimplemented,
    Code::Internal,
    Code::Unavailable,
    Code::DataLoss,
    Code::Unauthenticated,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_codes() {
        assert_eq!(api_error_code(Code::Cancelled), "CLIENT_CLOSED_REQUEST");
        assert_eq!(api_error_code(Code::InvalidArgument), "BAD_REQUEST");
        assert_eq!(api_error_code(Code::DeadlineExceeded), "GATEWAY_TIMEOUT");
        assert_eq!(api_error_code(Code::AlreadyExists), "CONFLICT");
        assert_eq!(api_error_code(Code::ResourceExhausted), "TOO_MANY_REQUESTS");
        assert_eq!(api_error_code(Code::Internal), "INTERNAL_SERVER_ERROR");
        assert_eq!(api_error_code(Code::Unauthenticated), "UNAUTHENTICATED");
    }

    #[test]
    fn test_http_statuses() {
        assert_eq!(http_status(Code::Cancelled), 499);
        assert_eq!(http_status(Code::InvalidArgument), 400);
        assert_eq!(http_status(Code::Unauthenticated), 401);
        assert_eq!(http_status(Code::PermissionDenied), 403);
        assert_eq!(http_status(Code::NotFound), 404);
        assert_eq!(http_status(Code::AlreadyExists), 409);
        assert_eq!(http_status(Code::ResourceExhausted), 429);
        assert_eq!(http_status(Code::Internal), 500);
        assert_eq!(http_status(Code::Unimplemented), 501);
        assert_eq!(http_status(Code::Unavailable), 503);
        assert_eq!(http_status(Code::DeadlineExceeded), 504);
    }

    #[test]
    fn test_unmapped_code_defaults() {
        assert_eq!(api_error_code(Code::Ok), UNKNOWN_ERROR);
        assert_eq!(http_status(Code::Ok), DEFAULT_HTTP_STATUS);
    }

    #[test]
    fn test_client_closed_request_is_a_valid_status() {
        assert_eq!(http_status_code(Code::Cancelled).as_u16(), 499);
        assert_eq!(http_status_code(Code::NotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_every_error_code_is_mapped() {
        for code in ALL_CODES.into_iter().filter(|c| *c != Code::Ok) {
            assert_ne!(api_error_code(code), UNKNOWN_ERROR, "{code:?} has no API code");
        }
    }
}
