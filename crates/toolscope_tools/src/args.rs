//! JSON argument and result helpers.
//!
//! Arguments and results are opaque JSON strings owned by each tool. These
//! helpers only pick the right [`ToolError`] variant: a decode failure is the
//! caller's fault, an encode failure is the tool's.

use crate::error::ToolError;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Decodes tool arguments.
///
/// # Errors
///
/// Returns [`ToolError::InvalidArguments`] if `args` is not valid JSON for `T`.
pub fn decode_args<T: DeserializeOwned>(args: &str) -> Result<T, ToolError> {
    serde_json::from_str(args).map_err(|err| ToolError::invalid_arguments(err.to_string()))
}

/// Encodes a tool result as a JSON string.
///
/// # Errors
///
/// Returns [`ToolError::Serialization`] if `value` cannot be serialized.
pub fn encode_output<T: Serialize + ?Sized>(value: &T) -> Result<String, ToolError> {
    Ok(serde_json::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Query {
        location: String,
        #[serde(default)]
        topn: usize,
    }

    #[test]
    fn decode_valid_args() {
        let query: Query = decode_args(r#"{"location":"Beijing"}"#).unwrap();
        assert_eq!(query.location, "Beijing");
        assert_eq!(query.topn, 0);
    }

    #[test]
    fn decode_malformed_json_is_argument_error() {
        let err = decode_args::<Query>("{not json").unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)), "got: {err:?}");
    }

    #[test]
    fn decode_missing_field_is_argument_error() {
        let err = decode_args::<Query>("{}").unwrap_err();
        assert!(err.is_argument_error());
        assert!(err.to_string().contains("location"), "got: {err}");
    }

    #[test]
    fn encode_keeps_field_order() {
        let out = encode_output(&serde_json::json!({"b": 1, "a": 2})).unwrap();
        assert_eq!(out, r#"{"b":1,"a":2}"#);
    }
}
