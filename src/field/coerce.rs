//! Value coercions applied by fields.
//!
//! Every coercion receives a non-null raw value; `null` handling happens in
//! [`Field::to_value`](crate::Field::to_value) and in the serializer before a
//! coercion is ever invoked.

use std::fmt;
use std::sync::Arc;

use chrono::format::ParseErrorKind;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{Number, Value};

use crate::error::{Result, SerializeError};

/// Input pattern used by date fields when none is configured.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Input pattern used by datetime fields when none is configured.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const ISO_DATE: &str = "%Y-%m-%d";
const ISO_DATETIME: &str = "%Y-%m-%dT%H:%M:%S";

/// A custom raw-to-converted value transform.
///
/// Closures of the shape `Fn(Value) -> Result<Value>` implement this trait,
/// so most custom fields never need a named type:
///
/// ```
/// use barq::Field;
/// use serde_json::{json, Value};
///
/// let add_five = Field::custom(|raw: Value| {
///     Ok(json!(raw.as_i64().unwrap_or_default() + 5))
/// });
/// assert_eq!(add_five.to_value(json!(10)).unwrap(), json!(15));
/// ```
pub trait Coercion: Send + Sync {
    fn coerce(&self, raw: Value) -> Result<Value>;
}

impl<F> Coercion for F
where
    F: Fn(Value) -> Result<Value> + Send + Sync,
{
    fn coerce(&self, raw: Value) -> Result<Value> {
        self(raw)
    }
}

/// The coercion carried by a field.
#[derive(Clone)]
pub enum Coerce {
    /// Pass-through, no conversion.
    Identity,
    Str,
    Int,
    Float,
    Bool,
    /// Parse with `format`, emit `YYYY-MM-DD`.
    Date { format: String },
    /// Parse with `format`, emit `YYYY-MM-DDTHH:MM:SS`.
    DateTime { format: String },
    Custom(Arc<dyn Coercion>),
}

impl Coerce {
    pub fn is_identity(&self) -> bool {
        matches!(self, Coerce::Identity)
    }

    /// Apply the coercion to a non-null raw value.
    pub fn apply(&self, raw: Value) -> Result<Value> {
        match self {
            Coerce::Identity => Ok(raw),
            Coerce::Str => Ok(to_str(raw)),
            Coerce::Int => to_int(raw),
            Coerce::Float => to_float(raw),
            Coerce::Bool => Ok(Value::Bool(truthy(&raw))),
            Coerce::Date { format } => to_date(raw, format),
            Coerce::DateTime { format } => to_datetime(raw, format),
            Coerce::Custom(coercion) => coercion.coerce(raw),
        }
    }
}

impl fmt::Debug for Coerce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coerce::Identity => f.write_str("Identity"),
            Coerce::Str => f.write_str("Str"),
            Coerce::Int => f.write_str("Int"),
            Coerce::Float => f.write_str("Float"),
            Coerce::Bool => f.write_str("Bool"),
            Coerce::Date { format } => f.debug_struct("Date").field("format", format).finish(),
            Coerce::DateTime { format } => {
                f.debug_struct("DateTime").field("format", format).finish()
            }
            Coerce::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn to_str(raw: Value) -> Value {
    match raw {
        Value::String(s) => Value::String(s),
        Value::Number(n) => Value::String(n.to_string()),
        Value::Bool(b) => Value::String(b.to_string()),
        // Compact JSON text for containers; null never reaches this point.
        other => Value::String(other.to_string()),
    }
}

fn to_int(raw: Value) -> Result<Value> {
    match raw {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::Number(n)),
        Value::Number(n) => match n.as_f64() {
            Some(f) => truncate(f),
            None => Err(SerializeError::Type(format!("cannot convert {} to int", n))),
        },
        Value::Bool(b) => Ok(Value::from(i64::from(b))),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .map(Value::from)
                .or_else(|_| trimmed.parse::<u64>().map(Value::from))
                .map_err(|_| SerializeError::Type(format!("invalid literal for int: {:?}", s)))
        }
        other => Err(SerializeError::Type(format!(
            "cannot convert {} to int",
            type_name(&other)
        ))),
    }
}

fn truncate(f: f64) -> Result<Value> {
    let t = f.trunc();
    // i64::MAX is not representable as f64; the upper bound is exclusive.
    if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
        Ok(Value::from(t as i64))
    } else {
        Err(SerializeError::Type(format!("cannot convert {} to int", f)))
    }
}

fn to_float(raw: Value) -> Result<Value> {
    let f = match raw {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| SerializeError::Type(format!("cannot convert {} to float", n)))?,
        Value::Bool(b) => {
            if b {
                1.0
            } else {
                0.0
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| SerializeError::Type(format!("could not convert string to float: {:?}", s)))?,
        other => {
            return Err(SerializeError::Type(format!(
                "cannot convert {} to float",
                type_name(&other)
            )))
        }
    };

    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| SerializeError::Type(format!("{} is not a finite float", f)))
}

fn truthy(raw: &Value) -> bool {
    match raw {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn expect_str<'a>(raw: &'a Value, target: &str) -> Result<&'a str> {
    raw.as_str().ok_or_else(|| {
        SerializeError::Type(format!(
            "expected a string to parse as {}, found {}",
            target,
            type_name(raw)
        ))
    })
}

fn to_date(raw: Value, format: &str) -> Result<Value> {
    let s = expect_str(&raw, "date")?;
    NaiveDate::parse_from_str(s, format)
        .map(|date| Value::String(date.format(ISO_DATE).to_string()))
        .map_err(|e| {
            SerializeError::Type(format!(
                "cannot parse {:?} as a date with format {:?}: {}",
                s, format, e
            ))
        })
}

/// Patterns without a time part parse as midnight of the parsed date.
fn to_datetime(raw: Value, format: &str) -> Result<Value> {
    let s = expect_str(&raw, "datetime")?;
    NaiveDateTime::parse_from_str(s, format)
        .or_else(|e| match e.kind() {
            ParseErrorKind::NotEnough => NaiveDate::parse_from_str(s, format)
                .map(|date| date.and_time(NaiveTime::MIN))
                .map_err(|_| e),
            _ => Err(e),
        })
        .map(|dt| Value::String(dt.format(ISO_DATETIME).to_string()))
        .map_err(|e| {
            SerializeError::Type(format!(
                "cannot parse {:?} as a datetime with format {:?}: {}",
                s, format, e
            ))
        })
}
