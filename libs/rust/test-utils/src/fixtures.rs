//! Test fixtures with sample data.

/// Error body in the shape produced by `ApiError` with details.
pub const API_ERROR_BODY: &str =
    r#"{"code":"BAD_REQUEST","message":"bad field","details":["f1"],"error":"bad field"}"#;

/// Error body as returned by a remote service.
pub const CLIENT_ERROR_BODY: &str =
    r#"{"code":404,"message":"document not found","details":[{"document_id":"d-17"}]}"#;

/// Sample EDS configuration file.
pub const EDS_CONFIG_YAML: &str = r"
base: http://eds.internal:8080/api
timeout: 5s
enableLog: true
host: eds.internal
token: s3cr3t-token
";

/// Sample EDS configuration without optional keys.
pub const EDS_CONFIG_MINIMAL_YAML: &str = r"
base: http://eds.internal:8080
host: eds.internal
token: s3cr3t-token
";
