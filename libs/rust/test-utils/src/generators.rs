//! Shared proptest generators.

use proptest::prelude::*;
use serde_json::{Map, Value, json};
use std::time::Duration;
use tonic::Code;

/// Generate gRPC codes that represent failures.
pub fn error_code_strategy() -> impl Strategy<Value = Code> {
    (1i32..=16).prop_map(Code::from_i32)
}

/// Generate any gRPC code, including `Ok`.
pub fn any_code_strategy() -> impl Strategy<Value = Code> {
    (0i32..=16).prop_map(Code::from_i32)
}

/// Generate human-readable error messages.
pub fn message_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,:'-]{1,100}"
}

/// Generate scalar JSON values.
pub fn scalar_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z0-9_]{0,20}".prop_map(Value::String),
        Just(Value::Null),
    ]
}

/// Generate a single detail entry: a scalar or a small object.
pub fn detail_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        scalar_value_strategy(),
        detail_map_strategy().prop_map(Value::Object),
    ]
}

/// Generate ordered detail lists, possibly empty.
pub fn details_strategy() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(detail_strategy(), 0..5)
}

/// Generate a detail object as sent by remote services.
pub fn detail_map_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-z][a-z_]{0,10}", scalar_value_strategy(), 0..4)
        .prop_map(|m| m.into_iter().collect())
}

/// Generate log field keys.
pub fn field_key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}

/// Generate request timeouts (1s to 5 minutes).
pub fn timeout_strategy() -> impl Strategy<Value = Duration> {
    (1u64..300).prop_map(Duration::from_secs)
}

/// Generate valid log level names, in mixed case.
pub fn log_level_name_strategy() -> impl Strategy<Value = String> {
    (
        prop_oneof![
            Just("debug"),
            Just("info"),
            Just("warn"),
            Just("error"),
            Just("fatal"),
            Just("panic"),
        ],
        any::<bool>(),
    )
        .prop_map(|(name, upper)| if upper { name.to_uppercase() } else { name.to_string() })
}
