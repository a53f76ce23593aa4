//! Raw scalar values and declared-type coercion.
//!
//! # Responsibility
//! - Define the raw value shape carried by storage rows and request
//!   parameter maps.
//! - Normalize raw values to an attribute's declared type at set-time.
//!
//! # Invariants
//! - `Value::Null` always passes through coercion untouched, so callers
//!   can distinguish "explicitly cleared" from a wrong-typed zero value.
//! - An inconvertible value fails with `EntityError::TypeCoercion`; the
//!   coercion path never substitutes a default.

use crate::entity::{EntityError, EntityResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Raw scalar carried by storage rows and request parameter maps.
///
/// Untagged serialization keeps the wire shape identical to plain JSON
/// scalars, which is what the response-serialization collaborator emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absence sentinel; stored as-is, declared type or not.
    Null,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value}"),
        }
    }
}

impl Value {
    /// Returns whether this value is the absence sentinel.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Renders the scalar as plain text. `Null` renders empty, so the
    /// result is safe to feed into slug derivation.
    pub fn render_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Unpacks a coerced value into an integer field slot.
    ///
    /// # Errors
    /// - `EntityError::TypeCoercion` when the value is neither `Null`
    ///   nor `Integer`.
    pub fn into_integer_field(self, name: &str) -> EntityResult<Option<i64>> {
        match self {
            Self::Null => Ok(None),
            Self::Integer(value) => Ok(Some(value)),
            other => Err(mismatch(name, AttrType::Integer, other)),
        }
    }

    /// Unpacks a coerced value into a float field slot.
    pub fn into_float_field(self, name: &str) -> EntityResult<Option<f64>> {
        match self {
            Self::Null => Ok(None),
            Self::Float(value) => Ok(Some(value)),
            other => Err(mismatch(name, AttrType::Float, other)),
        }
    }

    /// Unpacks a coerced value into a boolean field slot.
    pub fn into_boolean_field(self, name: &str) -> EntityResult<Option<bool>> {
        match self {
            Self::Null => Ok(None),
            Self::Boolean(value) => Ok(Some(value)),
            other => Err(mismatch(name, AttrType::Boolean, other)),
        }
    }

    /// Unpacks a coerced value into a text field slot.
    pub fn into_text_field(self, name: &str) -> EntityResult<Option<String>> {
        match self {
            Self::Null => Ok(None),
            Self::Text(value) => Ok(Some(value)),
            other => Err(mismatch(name, AttrType::Text, other)),
        }
    }
}

/// Declared scalar type tag for one registered attribute.
///
/// `Untyped` is an explicit marker rather than a missing table entry, so
/// the coercion dispatch below stays total and exhaustively matchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrType {
    /// No declared type; values pass through uncoerced.
    Untyped,
    Integer,
    Float,
    Boolean,
    Text,
}

impl Display for AttrType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Untyped => "untyped",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Text => "text",
        };
        write!(f, "{label}")
    }
}

/// Coerces a raw value to the declared type of attribute `name`.
///
/// # Invariants
/// - `Value::Null` and `AttrType::Untyped` both pass the value through
///   unchanged.
///
/// # Errors
/// - `EntityError::TypeCoercion` when the value cannot represent the
///   declared type.
pub fn coerce(name: &str, declared: AttrType, value: Value) -> EntityResult<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    match declared {
        AttrType::Untyped => Ok(value),
        AttrType::Integer => coerce_integer(name, value),
        AttrType::Float => coerce_float(name, value),
        AttrType::Boolean => coerce_boolean(name, value),
        AttrType::Text => Ok(Value::Text(value.render_text())),
    }
}

fn coerce_integer(name: &str, value: Value) -> EntityResult<Value> {
    match value {
        Value::Integer(_) => Ok(value),
        Value::Boolean(flag) => Ok(Value::Integer(i64::from(flag))),
        Value::Float(number) if number.fract() == 0.0 && in_i64_range(number) => {
            Ok(Value::Integer(number as i64))
        }
        Value::Text(ref text) => match text.trim().parse::<i64>() {
            Ok(parsed) => Ok(Value::Integer(parsed)),
            Err(_) => Err(mismatch(name, AttrType::Integer, value)),
        },
        other => Err(mismatch(name, AttrType::Integer, other)),
    }
}

fn coerce_float(name: &str, value: Value) -> EntityResult<Value> {
    match value {
        Value::Float(_) => Ok(value),
        Value::Integer(number) => Ok(Value::Float(number as f64)),
        Value::Text(ref text) => match text.trim().parse::<f64>() {
            Ok(parsed) => Ok(Value::Float(parsed)),
            Err(_) => Err(mismatch(name, AttrType::Float, value)),
        },
        other => Err(mismatch(name, AttrType::Float, other)),
    }
}

fn coerce_boolean(name: &str, value: Value) -> EntityResult<Value> {
    match value {
        Value::Boolean(_) => Ok(value),
        Value::Integer(0) => Ok(Value::Boolean(false)),
        Value::Integer(1) => Ok(Value::Boolean(true)),
        Value::Text(ref text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Value::Boolean(true)),
            "false" | "0" => Ok(Value::Boolean(false)),
            _ => Err(mismatch(name, AttrType::Boolean, value)),
        },
        other => Err(mismatch(name, AttrType::Boolean, other)),
    }
}

fn in_i64_range(number: f64) -> bool {
    number >= i64::MIN as f64 && number <= i64::MAX as f64
}

fn mismatch(name: &str, declared: AttrType, value: Value) -> EntityError {
    EntityError::TypeCoercion {
        name: name.to_string(),
        declared,
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::{coerce, AttrType, Value};
    use crate::entity::EntityError;

    #[test]
    fn null_is_never_coerced() {
        for declared in [
            AttrType::Untyped,
            AttrType::Integer,
            AttrType::Float,
            AttrType::Boolean,
            AttrType::Text,
        ] {
            let coerced = coerce("field", declared, Value::Null).expect("null must pass through");
            assert_eq!(coerced, Value::Null);
        }
    }

    #[test]
    fn untyped_passes_values_through_unchanged() {
        let coerced = coerce("field", AttrType::Untyped, Value::Integer(42))
            .expect("untyped must pass through");
        assert_eq!(coerced, Value::Integer(42));
    }

    #[test]
    fn integer_coercion_parses_numeric_text() {
        let coerced = coerce("id", AttrType::Integer, Value::Text(" 4 ".to_string()))
            .expect("numeric text should coerce");
        assert_eq!(coerced, Value::Integer(4));
    }

    #[test]
    fn integer_coercion_rejects_non_numeric_text() {
        let err = coerce("id", AttrType::Integer, Value::Text("four".to_string()))
            .expect_err("non-numeric text must fail");
        match err {
            EntityError::TypeCoercion {
                name,
                declared,
                value,
            } => {
                assert_eq!(name, "id");
                assert_eq!(declared, AttrType::Integer);
                assert_eq!(value, Value::Text("four".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn integer_coercion_rejects_fractional_float() {
        coerce("id", AttrType::Integer, Value::Float(4.5)).expect_err("fractional must fail");
        let coerced =
            coerce("id", AttrType::Integer, Value::Float(4.0)).expect("integral float coerces");
        assert_eq!(coerced, Value::Integer(4));
    }

    #[test]
    fn boolean_coercion_accepts_common_spellings() {
        for (raw, expected) in [
            (Value::Text("true".to_string()), true),
            (Value::Text("FALSE".to_string()), false),
            (Value::Text("1".to_string()), true),
            (Value::Integer(0), false),
            (Value::Integer(1), true),
        ] {
            let coerced = coerce("flag", AttrType::Boolean, raw).expect("should coerce");
            assert_eq!(coerced, Value::Boolean(expected));
        }
    }

    #[test]
    fn boolean_coercion_rejects_other_integers() {
        coerce("flag", AttrType::Boolean, Value::Integer(2)).expect_err("2 is not a boolean");
    }

    #[test]
    fn text_coercion_renders_scalars() {
        let coerced =
            coerce("title", AttrType::Text, Value::Integer(42)).expect("integer renders as text");
        assert_eq!(coerced, Value::Text("42".to_string()));
    }

    #[test]
    fn untagged_serialization_matches_plain_json_scalars() {
        assert_eq!(serde_json::to_value(Value::Null).unwrap(), serde_json::Value::Null);
        assert_eq!(serde_json::to_value(Value::Integer(7)).unwrap(), serde_json::json!(7));
        assert_eq!(serde_json::to_value(Value::Boolean(true)).unwrap(), serde_json::json!(true));
        assert_eq!(
            serde_json::to_value(Value::Text("hi".to_string())).unwrap(),
            serde_json::json!("hi")
        );
    }
}
