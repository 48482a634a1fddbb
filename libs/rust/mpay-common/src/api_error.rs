//! Client-facing API error.
//!
//! An [`ApiError`] is built once at the failure site, carries the gRPC code
//! that classifies the failure, and is serialized at the transport boundary
//! into a fixed four-key JSON body:
//!
//! ```json
//! { "code": "NOT_FOUND", "message": "...", "details": [...], "error": "..." }
//! ```
//!
//! `details` is omitted when empty. `error` holds the wrapped cause's text
//! when a cause is present and repeats `message` otherwise.

use crate::codes;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::borrow::Cow;
use thiserror::Error;
use tonic::{Code, Status};

/// Boxed cause attached to an [`ApiError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error value passed back to API clients.
///
/// The gRPC code and the wrapped cause are never serialized directly; the
/// derived [`api_error_code`](Self::api_error_code) is what clients see.
#[derive(Error, Debug)]
#[error("{api_error_code}: {message}")]
pub struct ApiError {
    grpc_code: Code,
    api_error_code: &'static str,
    message: String,
    details: Vec<Value>,
    #[source]
    source: Option<BoxError>,
}

/// Wire shape of an [`ApiError`]. Field order is the serialized key order.
#[derive(Serialize)]
struct ApiErrorBody<'a> {
    code: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    details: &'a [Value],
    error: Cow<'a, str>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_empty(details: &&[Value]) -> bool {
    details.is_empty()
}

impl ApiError {
    /// Create an API error, resolving its string code from `code` immediately.
    ///
    /// # Examples
    ///
    /// ```
    /// use mpay_common::ApiError;
    /// use tonic::Code;
    ///
    /// let err = ApiError::new(Code::NotFound, "x", Vec::new(), None);
    /// assert_eq!(err.to_json(), r#"{"code":"NOT_FOUND","message":"x","error":"x"}"#);
    /// ```
    #[must_use]
    pub fn new(
        code: Code,
        message: impl Into<String>,
        details: Vec<Value>,
        source: Option<BoxError>,
    ) -> Self {
        Self {
            grpc_code: code,
            api_error_code: codes::api_error_code(code),
            message: message.into(),
            details,
            source,
        }
    }

    /// `InvalidArgument` / `BAD_REQUEST` / 400.
    #[must_use]
    pub fn invalid_argument(
        message: impl Into<String>,
        details: Vec<Value>,
        source: Option<BoxError>,
    ) -> Self {
        Self::new(Code::InvalidArgument, message, details, source)
    }

    /// `Unauthenticated` / `UNAUTHENTICATED` / 401.
    #[must_use]
    pub fn unauthenticated(
        message: impl Into<String>,
        details: Vec<Value>,
        source: Option<BoxError>,
    ) -> Self {
        Self::new(Code::Unauthenticated, message, details, source)
    }

    /// `PermissionDenied` / `FORBIDDEN` / 403.
    #[must_use]
    pub fn permission_denied(
        message: impl Into<String>,
        details: Vec<Value>,
        source: Option<BoxError>,
    ) -> Self {
        Self::new(Code::PermissionDenied, message, details, source)
    }

    /// `NotFound` / `NOT_FOUND` / 404.
    #[must_use]
    pub fn not_found(
        message: impl Into<String>,
        details: Vec<Value>,
        source: Option<BoxError>,
    ) -> Self {
        Self::new(Code::NotFound, message, details, source)
    }

    /// `AlreadyExists` / `CONFLICT` / 409.
    #[must_use]
    pub fn already_exists(
        message: impl Into<String>,
        details: Vec<Value>,
        source: Option<BoxError>,
    ) -> Self {
        Self::new(Code::AlreadyExists, message, details, source)
    }

    /// `Internal` / `INTERNAL_SERVER_ERROR` / 500.
    #[must_use]
    pub fn internal(
        message: impl Into<String>,
        details: Vec<Value>,
        source: Option<BoxError>,
    ) -> Self {
        Self::new(Code::Internal, message, details, source)
    }

    /// `Unimplemented` / `NOT_IMPLEMENTED` / 501.
    #[must_use]
    pub fn unimplemented(
        message: impl Into<String>,
        details: Vec<Value>,
        source: Option<BoxError>,
    ) -> Self {
        Self::new(Code::Unimplemented, message, details, source)
    }

    /// gRPC code this error was created with.
    #[must_use]
    pub const fn grpc_code(&self) -> Code {
        self.grpc_code
    }

    /// Stable string code exposed to clients.
    #[must_use]
    pub const fn api_error_code(&self) -> &'static str {
        self.api_error_code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Auxiliary details, in insertion order.
    #[must_use]
    pub fn details(&self) -> &[Value] {
        &self.details
    }

    /// HTTP status the error maps to.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        codes::http_status(self.grpc_code)
    }

    /// Code and message for layers that set a transport-level status.
    ///
    /// Details and the wrapped cause are deliberately left out.
    #[must_use]
    pub fn status_for_transport(&self) -> (Code, &str) {
        (self.grpc_code, &self.message)
    }

    /// gRPC status carrying this error's code and message.
    #[must_use]
    pub fn grpc_status(&self) -> Status {
        Status::new(self.grpc_code, self.message.clone())
    }

    /// Text of the `error` field: the cause's message, or `message` without one.
    #[must_use]
    pub fn error_text(&self) -> Cow<'_, str> {
        self.source.as_ref().map_or_else(
            || Cow::Borrowed(self.message.as_str()),
            |source| Cow::Owned(source.to_string()),
        )
    }

    fn body(&self) -> ApiErrorBody<'_> {
        ApiErrorBody {
            code: self.api_error_code,
            message: &self.message,
            details: &self.details,
            error: self.error_text(),
        }
    }

    /// Serialize to the JSON wire body.
    #[must_use]
    pub fn to_json(&self) -> String {
        // Strings and `Value`s always serialize.
        serde_json::to_string(&self.body()).unwrap_or_default()
    }

    /// Serialize to the JSON wire body as bytes.
    #[must_use]
    pub fn to_json_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(&self.body()).unwrap_or_default()
    }
}

impl Serialize for ApiError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.body().serialize(serializer)
    }
}

impl From<ApiError> for Status {
    fn from(err: ApiError) -> Self {
        Self::new(err.grpc_code, err.message)
    }
}

impl From<Status> for ApiError {
    /// Wrap a status received from a downstream gRPC call.
    ///
    /// The status message becomes the API message; the status itself is not
    /// kept as a cause so its debug rendering never reaches the wire.
    fn from(status: Status) -> Self {
        Self::new(status.code(), status.message(), Vec::new(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_not_found_without_details_or_cause() {
        let err = ApiError::not_found("x", Vec::new(), None);
        assert_eq!(
            err.to_json(),
            r#"{"code":"NOT_FOUND","message":"x","error":"x"}"#
        );
    }

    #[test]
    fn test_invalid_argument_with_details() {
        let err = ApiError::invalid_argument("bad field", vec![json!("f1")], None);
        assert_eq!(
            err.to_json(),
            r#"{"code":"BAD_REQUEST","message":"bad field","details":["f1"],"error":"bad field"}"#
        );
    }

    #[test]
    fn test_cause_fills_error_field() {
        let cause = std::io::Error::other("connection reset");
        let err = ApiError::internal("storage failure", Vec::new(), Some(Box::new(cause)));

        let body: Value = serde_json::from_slice(&err.to_json_bytes()).unwrap();
        assert_eq!(body["message"], "storage failure");
        assert_eq!(body["error"], "connection reset");
        assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");
    }

    #[test]
    fn test_source_is_exposed_through_error_trait() {
        use std::error::Error as _;

        let cause = std::io::Error::other("disk full");
        let err = ApiError::internal("write failed", Vec::new(), Some(Box::new(cause)));
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("disk full"));

        let err = ApiError::internal("write failed", Vec::new(), None);
        assert!(err.source().is_none());
    }

    #[test]
    fn test_factories_bind_codes() {
        let cases = [
            (ApiError::invalid_argument("m", Vec::new(), None), Code::InvalidArgument, "BAD_REQUEST", 400),
            (ApiError::unauthenticated("m", Vec::new(), None), Code::Unauthenticated, "UNAUTHENTICATED", 401),
            (ApiError::permission_denied("m", Vec::new(), None), Code::PermissionDenied, "FORBIDDEN", 403),
            (ApiError::not_found("m", Vec::new(), None), Code::NotFound, "NOT_FOUND", 404),
            (ApiError::already_exists("m", Vec::new(), None), Code::AlreadyExists, "CONFLICT", 409),
            (ApiError::internal("m", Vec::new(), None), Code::Internal, "INTERNAL_SERVER_ERROR", 500),
            (ApiError::unimplemented("m", Vec::new(), None), Code::Unimplemented, "NOT_IMPLEMENTED", 501),
        ];

        for (err, code, api_code, status) in cases {
            assert_eq!(err.grpc_code(), code);
            assert_eq!(err.api_error_code(), api_code);
            assert_eq!(err.http_status(), status);
        }
    }

    #[test]
    fn test_unmapped_code_is_unknown_error() {
        let err = ApiError::new(Code::Ok, "odd", Vec::new(), None);
        assert_eq!(err.api_error_code(), codes::UNKNOWN_ERROR);
        assert_eq!(err.http_status(), codes::DEFAULT_HTTP_STATUS);
    }

    #[test]
    fn test_status_for_transport_hides_cause() {
        let cause = std::io::Error::other("secret backend detail");
        let err = ApiError::permission_denied("no access", vec![json!({"role": "viewer"})], Some(Box::new(cause)));

        assert_eq!(err.status_for_transport(), (Code::PermissionDenied, "no access"));

        let status = err.grpc_status();
        assert_eq!(status.code(), Code::PermissionDenied);
        assert_eq!(status.message(), "no access");

        let status: Status = err.into();
        assert_eq!(status.message(), "no access");
    }

    #[test]
    fn test_from_status() {
        let err = ApiError::from(Status::unavailable("eds is down"));
        assert_eq!(err.api_error_code(), "SERVICE_UNAVAILABLE");
        assert_eq!(err.message(), "eds is down");
        assert_eq!(err.error_text(), "eds is down");
    }

    #[test]
    fn test_display() {
        let err = ApiError::not_found("order 42", Vec::new(), None);
        assert_eq!(err.to_string(), "NOT_FOUND: order 42");
    }

    #[test]
    fn test_serialize_impl_matches_to_json() {
        let err = ApiError::already_exists("dup", vec![json!(1), json!("two")], None);
        assert_eq!(serde_json::to_string(&err).unwrap(), err.to_json());
    }
}
