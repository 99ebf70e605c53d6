//! Conversions between [`Value`] and `serde_json::Value`.

use crate::num::decimal::Decimal;
use crate::num::number::Number;
use crate::value::{Map, Value};
use crate::{Error, Result};

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(number_from_json(&n)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect::<Map>(),
            ),
        }
    }
}

/// Goes through the number's text so integers of any width stay exact.
fn number_from_json(n: &serde_json::Number) -> Number {
    n.to_string()
        .parse::<Number>()
        .unwrap_or_else(|_| Number::from_f64(n.as_f64().unwrap_or(f64::NAN)))
}

fn number_to_json(number: &Number) -> Result<serde_json::Number> {
    if number.as_decimal().is_some_and(Decimal::is_integer) {
        if let Ok(v) = number.as_i64() {
            return Ok(v.into());
        }
        if let Ok(v) = number.as_u64() {
            return Ok(v.into());
        }
    }
    let float = number.as_f64()?;
    serde_json::Number::from_f64(float).ok_or(Error::UnexpectedType {
        expected: "finite number",
        found: "number",
    })
}

/// Fails on `NaN` and the infinities, which JSON cannot carry. Integers past
/// `u64` and long fractions become the nearest `f64`.
impl TryFrom<&Value> for serde_json::Value {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        Ok(match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(number) => serde_json::Value::Number(number_to_json(number)?),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(serde_json::Value::try_from)
                    .collect::<Result<_>>()?,
            ),
            Value::Object(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(key.clone(), serde_json::Value::try_from(value)?);
                }
                serde_json::Value::Object(out)
            }
        })
    }
}

impl TryFrom<Value> for serde_json::Value {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        serde_json::Value::try_from(&value)
    }
}
