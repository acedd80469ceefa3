//! Small helpers shared by the JSON-RPC handler

use serde::de::DeserializeOwned;
use serde_json::{from_value, Value};

use crate::mcp::protocol::{error_codes, Response};

/// Extract a required field from JSON-RPC params, or build the matching error response.
pub fn get_required_arg<T: DeserializeOwned>(
    params: &Value,
    key: &str,
    req_id: &Value,
) -> Result<T, Response> {
    from_value(params.get(key).cloned().unwrap_or(Value::Null)).map_err(|_| {
        Response::error(
            req_id.clone(),
            error_codes::INVALID_PARAMS,
            format!("Missing or invalid required argument: '{}'", key),
        )
    })
}
