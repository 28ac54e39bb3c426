use serde_json::Value;

use crate::error::Error;
use crate::schema::Schema;

/// Convert a reflected, resolved value tree into the canonical Schema form,
/// reporting the JSON path of the failing node on malformed input.
pub fn schema_from_value(value: &Value) -> Result<Schema, Error> {
    serde_path_to_error::deserialize::<_, Schema>(value).map_err(|err| {
        let path = err.path().to_string();
        Error::InvalidInput(format!("at JSON path {path}: {}", err.into_inner()))
    })
}

/// Parse an input document, keeping serde's line/column context.
pub fn value_from_str(src: &str) -> Result<Value, Error> {
    serde_json::from_str(src).map_err(|e| Error::InvalidInput(e.to_string()))
}
