//! JSON I/O handling for CLI
//!
//! - Input: single JSON document via stdin
//! - Output: single JSON object per line via stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Read a JSON document from stdin
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_request(&input)
}

pub(super) fn parse_request(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }
    Ok(serde_json::from_str(input)?)
}

/// Success envelope
pub fn ok_response(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

/// Error envelope; `field` is included only when known
pub fn error_response(code: &str, message: &str, field: Option<&str>) -> Value {
    let mut response = json!({
        "status": "error",
        "code": code,
        "message": message
    });
    if let (Some(field), Some(obj)) = (field, response.as_object_mut()) {
        obj.insert("field".to_string(), json!(field));
    }
    response
}

/// Write one JSON value to stdout
pub fn write_json(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_rejects_empty_input() {
        assert!(parse_request("  \n").is_err());
        assert!(parse_request("{\"filters\": [").is_err());
        assert_eq!(parse_request("{}").unwrap(), json!({}));
    }

    #[test]
    fn test_error_response_field_is_optional() {
        let without = error_response("ILLEGAL_OPERATOR", "bad", None);
        assert!(without.get("field").is_none());

        let with = error_response("ILLEGAL_ARGUMENT", "bad", Some("age"));
        assert_eq!(with["field"], "age");
        assert_eq!(with["status"], "error");
    }
}
