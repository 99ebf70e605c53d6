use std::{
    fmt,
    ops::{Index, IndexMut},
};

use indexmap::IndexMap;

use crate::num::decimal::Decimal;
use crate::num::number::Number;
use crate::{EncodeOptions, Error, Result};

/// Object members in insertion order.
pub type Map = IndexMap<String, Value>;

static NULL: Value = Value::Null;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Integer view of a finite number; fractions truncate.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(|n| n.as_i64().ok())
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_number().and_then(|n| n.as_u64().ok())
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().and_then(|n| n.as_f64().ok())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(obj) => obj.get(key),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self {
            Value::Object(obj) => obj.get_mut(key),
            _ => None,
        }
    }

    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(arr) => arr.get(index),
            _ => None,
        }
    }

    /// Follows a dotted path such as `"servers.0.host"`. Numeric segments
    /// index arrays; an empty path returns `self`.
    pub fn pointer_path(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.').try_fold(self, |current, segment| match current {
            Value::Object(obj) => obj.get(segment),
            Value::Array(arr) => segment.parse::<usize>().ok().and_then(|i| arr.get(i)),
            _ => None,
        })
    }

    fn member(&self, key: &str) -> Result<&Value> {
        match self {
            Value::Object(obj) => obj
                .get(key)
                .ok_or_else(|| Error::MissingKey(key.to_string())),
            other => Err(Error::UnexpectedType {
                expected: "object",
                found: other.type_name(),
            }),
        }
    }

    pub fn get_str(&self, key: &str) -> Result<&str> {
        let value = self.member(key)?;
        value.as_str().ok_or(Error::UnexpectedType {
            expected: "string",
            found: value.type_name(),
        })
    }

    pub fn get_bool(&self, key: &str) -> Result<bool> {
        let value = self.member(key)?;
        value.as_bool().ok_or(Error::UnexpectedType {
            expected: "boolean",
            found: value.type_name(),
        })
    }

    pub fn get_i64(&self, key: &str) -> Result<i64> {
        let number = self.get_number(key)?;
        Ok(number.as_i64()?)
    }

    pub fn get_f64(&self, key: &str) -> Result<f64> {
        let number = self.get_number(key)?;
        Ok(number.as_f64()?)
    }

    pub fn get_number(&self, key: &str) -> Result<&Number> {
        let value = self.member(key)?;
        value.as_number().ok_or(Error::UnexpectedType {
            expected: "number",
            found: value.type_name(),
        })
    }

    pub fn get_array(&self, key: &str) -> Result<&Vec<Value>> {
        let value = self.member(key)?;
        value.as_array().ok_or(Error::UnexpectedType {
            expected: "array",
            found: value.type_name(),
        })
    }

    pub fn get_object(&self, key: &str) -> Result<&Map> {
        let value = self.member(key)?;
        value.as_object().ok_or(Error::UnexpectedType {
            expected: "object",
            found: value.type_name(),
        })
    }

    /// Mutable slot at a dotted path, creating missing objects on the way.
    ///
    /// `Null` slots along the path become empty objects; any other
    /// non-object value fails with [`Error::UnexpectedType`].
    ///
    /// ```
    /// use json5_stream::Value;
    ///
    /// let mut config = Value::Null;
    /// *config.path_mut_or_insert("server.port")? = Value::from(8080);
    /// assert_eq!(config.pointer_path("server.port"), Some(&Value::from(8080)));
    /// # Ok::<(), json5_stream::Error>(())
    /// ```
    pub fn path_mut_or_insert(&mut self, path: &str) -> Result<&mut Value> {
        let mut current = self;
        for segment in path.split('.') {
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            current = match current {
                Value::Object(obj) => obj.entry(segment.to_string()).or_insert(Value::Null),
                other => {
                    return Err(Error::UnexpectedType {
                        expected: "object",
                        found: other.type_name(),
                    })
                }
            };
        }
        Ok(current)
    }

    pub fn take(&mut self) -> Value {
        std::mem::replace(self, Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

/// Compact JSON5 text.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::encode::value_to_string(self, &EncodeOptions::json5()))
    }
}

impl Index<usize> for Value {
    type Output = Value;

    /// Missing elements read as `Null`.
    fn index(&self, index: usize) -> &Self::Output {
        self.get_index(index).unwrap_or(&NULL)
    }
}

impl IndexMut<usize> for Value {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match self {
            Value::Array(arr) => {
                let len = arr.len();
                arr.get_mut(index).unwrap_or_else(|| {
                    panic!("index {index} out of bounds for array of length {len}")
                })
            }
            _ => panic!(
                "cannot index into non-array value of type {}",
                self.type_name()
            ),
        }
    }
}

impl Index<&str> for Value {
    type Output = Value;

    /// Missing members read as `Null`.
    fn index(&self, key: &str) -> &Self::Output {
        self.get(key).unwrap_or(&NULL)
    }
}

impl IndexMut<&str> for Value {
    /// Inserts `Null` for a missing key; a `Null` value becomes an object first.
    fn index_mut(&mut self, key: &str) -> &mut Self::Output {
        if self.is_null() {
            *self = Value::Object(Map::new());
        }
        match self {
            Value::Object(obj) => obj.entry(key.to_string()).or_insert(Value::Null),
            _ => panic!(
                "cannot index into non-object value of type {}",
                self.type_name()
            ),
        }
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<String> for Value {
    fn eq(&self, other: &String) -> bool {
        self.as_str() == Some(other.as_str())
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Number(Number::Finite(d))
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Array(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::*;
    use crate::error::{NonFinite, NumberError};

    fn sample() -> Value {
        crate::parse("{name: 'cason', ports: [80, 443], tls: {on: true, ratio: 0.5}, bad: NaN}")
            .unwrap()
    }

    #[rstest::rstest]
    fn test_accessors_and_take() {
        let mut value = sample();
        assert!(value.is_object());
        assert_eq!(value.type_name(), "object");
        assert_eq!(value.get("name").and_then(Value::as_str), Some("cason"));
        assert_eq!(value["ports"][1].as_i64(), Some(443));
        assert!(value["missing"].is_null());
        assert!(value["ports"][9].is_null());

        value
            .as_object_mut()
            .unwrap()
            .insert("extra".to_string(), Value::from("hi"));
        assert_eq!(value["extra"], "hi");

        let mut taken = Value::from("take");
        let prior = taken.take();
        assert!(taken.is_null());
        assert_eq!(prior, "take");
    }

    #[rstest::rstest]
    #[case("name", Some(Value::from("cason")))]
    #[case("ports.0", Some(Value::from(80)))]
    #[case("tls.on", Some(Value::Bool(true)))]
    #[case("ports.x", None)]
    #[case("name.deeper", None)]
    #[case("nope", None)]
    fn test_pointer_path(#[case] path: &str, #[case] expected: Option<Value>) {
        assert_eq!(sample().pointer_path(path).cloned(), expected);
    }

    #[rstest::rstest]
    fn test_typed_getters() {
        let value = sample();
        assert_eq!(value.get_str("name").unwrap(), "cason");
        assert!(value.get_object("tls").unwrap().contains_key("on"));
        assert_eq!(value.get_array("ports").unwrap().len(), 2);
        assert!(value["tls"].get_bool("on").unwrap());
        assert_eq!(value["tls"].get_f64("ratio").unwrap(), 0.5);
        assert_eq!(
            value.get_str("ports"),
            Err(Error::UnexpectedType {
                expected: "string",
                found: "array"
            })
        );
        assert_eq!(
            value.get_i64("absent"),
            Err(Error::MissingKey("absent".to_string()))
        );
        assert_eq!(
            value.get_str("absent").unwrap_err().to_string(),
            "missing key `absent`"
        );
        assert_eq!(
            value["ports"].get_bool("x"),
            Err(Error::UnexpectedType {
                expected: "object",
                found: "array"
            })
        );
        assert_eq!(
            value.get_i64("bad"),
            Err(Error::Number(NumberError::NotARealNumber(NonFinite::NaN)))
        );
    }

    #[rstest::rstest]
    fn test_path_mut_or_insert_builds_objects() {
        let mut value = Value::Null;
        *value.path_mut_or_insert("a.b.c").unwrap() = Value::from(1);
        *value.path_mut_or_insert("a.d").unwrap() = Value::from(2);
        assert_eq!(value.to_string(), "{a:{b:{c:1},d:2}}");

        let mut value = Value::from(vec![1, 2]);
        assert!(value.path_mut_or_insert("a").is_err());
    }

    #[rstest::rstest]
    fn test_index_mut() {
        let mut value = Value::Null;
        value["key"] = Value::Bool(false);
        assert_eq!(value["key"], false);

        let mut arr = Value::from(vec![Value::Null]);
        arr[0] = Value::from(3);
        assert_eq!(arr[0].as_u64(), Some(3));

        let err = catch_unwind(AssertUnwindSafe(|| {
            arr[5] = Value::Null;
        }));
        assert!(err.is_err());
    }

    #[rstest::rstest]
    fn test_from_conversions() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), "x");
        let collected: Value = vec![1, 2, 3].into_iter().collect();
        assert_eq!(collected.as_array().map(Vec::len), Some(3));
        let map: Map = [("k".to_string(), Value::from(1))].into_iter().collect();
        assert_eq!(Value::from(map)["k"].as_i64(), Some(1));
    }
}
