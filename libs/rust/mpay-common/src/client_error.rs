//! Error payload as seen by a remote caller.

use crate::error::CommonResult;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Error body decoded from a peer's failed response.
///
/// This is a passive decode target. It has no link to
/// [`ApiError`](crate::ApiError) and keeps no cause information.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("remote error {code}: {message}")]
pub struct ClientError {
    /// Numeric error code reported by the peer
    pub code: i64,
    /// Human-readable message
    pub message: String,
    /// Structured details, in the order the peer sent them
    #[serde(default, deserialize_with = "null_as_empty")]
    pub details: Vec<Map<String, Value>>,
}

/// Peers that never set details send `"details": null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<_>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ClientError {
    /// Decode an error body.
    ///
    /// # Errors
    ///
    /// Returns [`CommonError::Serialization`](crate::CommonError::Serialization)
    /// if the body is not a valid error payload.
    pub fn from_slice(body: &[u8]) -> CommonResult<Self> {
        Ok(serde_json::from_slice(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CommonError;

    #[test]
    fn test_decode_full_payload() {
        let body = br#"{"code":404,"message":"order not found","details":[{"field":"id","value":42}]}"#;
        let err = ClientError::from_slice(body).unwrap();

        assert_eq!(err.code, 404);
        assert_eq!(err.message, "order not found");
        assert_eq!(err.details.len(), 1);
        assert_eq!(err.details[0]["field"], "id");
        assert_eq!(err.details[0]["value"], 42);
    }

    #[test]
    fn test_details_default_to_empty() {
        let err = ClientError::from_slice(br#"{"code":500,"message":"boom"}"#).unwrap();
        assert!(err.details.is_empty());
    }

    #[test]
    fn test_null_details_decode_as_empty() {
        let err = ClientError::from_slice(br#"{"code":500,"message":"boom","details":null}"#).unwrap();
        assert_eq!(err.code, 500);
        assert_eq!(err.message, "boom");
        assert!(err.details.is_empty());
    }

    #[test]
    fn test_invalid_payload_is_rejected() {
        let result = ClientError::from_slice(b"<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(CommonError::Serialization(_))));
    }

    #[test]
    fn test_display() {
        let err = ClientError {
            code: 403,
            message: "forbidden".to_string(),
            details: Vec::new(),
        };
        assert_eq!(err.to_string(), "remote error 403: forbidden");
    }
}
