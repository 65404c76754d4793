// Inbound directive payloads
//
// {"type":"move","direction":<string>,"duration":<int>,"speed":<int>}
// {"type":"rotate","rotation":<string>,"duration":<int>,"speed":<int>}
// {"type":"command","command":<string>}

use serde::Serialize;
use serde_json::{Map, Value};

/// Why a directive payload was rejected
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    #[error("Payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Payload is not a JSON object")]
    NotAnObject,

    #[error("Missing expected parameter '{0}'")]
    MissingField(&'static str),

    #[error("Parameter '{field}' is not {expected}: {value}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
        value: Value,
    },
}

/// A parsed directive, symbols still unresolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Directive {
    Move {
        direction: String,
        duration: u32,
        speed: i32,
    },
    Rotate {
        rotation: String,
        duration: u32,
        speed: i32,
    },
    Command {
        command: String,
    },
}

impl Directive {
    /// Parse raw payload bytes
    ///
    /// Returns `Ok(None)` for a well-formed payload with a type nobody handles.
    pub fn from_slice(payload: &[u8]) -> Result<Option<Self>, DirectiveError> {
        let value: Value = serde_json::from_slice(payload)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Option<Self>, DirectiveError> {
        let fields = value.as_object().ok_or(DirectiveError::NotAnObject)?;

        let directive = match text_field(fields, "type")?.as_str() {
            "move" => Directive::Move {
                direction: text_field(fields, "direction")?,
                duration: duration_field(fields)?,
                speed: speed_field(fields)?,
            },
            "rotate" => Directive::Rotate {
                rotation: text_field(fields, "rotation")?,
                duration: duration_field(fields)?,
                speed: speed_field(fields)?,
            },
            "command" => Directive::Command {
                command: text_field(fields, "command")?,
            },
            _ => return Ok(None),
        };
        Ok(Some(directive))
    }
}

fn field<'a>(
    fields: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a Value, DirectiveError> {
    fields.get(name).ok_or(DirectiveError::MissingField(name))
}

fn text_field(fields: &Map<String, Value>, name: &'static str) -> Result<String, DirectiveError> {
    match field(fields, name)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(DirectiveError::InvalidField {
            field: name,
            expected: "a string",
            value: other.clone(),
        }),
    }
}

/// Integers, finite floats (truncated toward zero) and integer strings are accepted
fn integer_field(fields: &Map<String, Value>, name: &'static str) -> Result<i64, DirectiveError> {
    let value = field(fields, name)?;
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| DirectiveError::InvalidField {
        field: name,
        expected: "an integer",
        value: value.clone(),
    })
}

fn duration_field(fields: &Map<String, Value>) -> Result<u32, DirectiveError> {
    let duration = integer_field(fields, "duration")?;
    u32::try_from(duration).map_err(|_| DirectiveError::InvalidField {
        field: "duration",
        expected: "a non-negative number of seconds",
        value: Value::from(duration),
    })
}

fn speed_field(fields: &Map<String, Value>) -> Result<i32, DirectiveError> {
    let speed = integer_field(fields, "speed")?;
    i32::try_from(speed).map_err(|_| DirectiveError::InvalidField {
        field: "speed",
        expected: "a speed percentage",
        value: Value::from(speed),
    })
}
