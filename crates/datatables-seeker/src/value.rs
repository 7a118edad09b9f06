//! Runtime value types for field comparison.
//!
//! Rows are plain JSON documents. The [`Value`] enum is a borrowed, scalar view
//! of one field of such a row, produced by [`lookup`] and [`json_accessor`].

use std::cmp::Ordering;

use serde_json::Value as Json;

/// Scalar view of a row field, borrowed from the source row.
///
/// Arrays, objects and `null` all collapse to [`Value::None`]: only scalars
/// take part in matching and ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Numeric value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Field not present, null, or not a scalar.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text form used by the string operators.
    ///
    /// Numbers and booleans are matched against their display form so that a
    /// search for `"42"` finds a numeric `42`.
    pub fn as_text(&self) -> Option<std::borrow::Cow<'a, str>> {
        match self {
            Value::String(s) => Some(std::borrow::Cow::Borrowed(s)),
            Value::Number(n) => Some(std::borrow::Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(std::borrow::Cow::Owned(b.to_string())),
            Value::None => None,
        }
    }
}

impl<'a> From<&'a Json> for Value<'a> {
    fn from(json: &'a Json) -> Self {
        match json {
            Json::String(s) => Value::String(s),
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
                (Some(i), _, _) => Value::Number(Number::I64(i)),
                (None, Some(u), _) => Value::Number(Number::U64(u)),
                (None, None, Some(f)) => Value::Number(Number::F64(f)),
                _ => Value::None,
            },
            Json::Null | Json::Array(_) | Json::Object(_) => Value::None,
        }
    }
}

/// Resolves a dotted property path inside a JSON row.
///
/// Object keys are followed by name; numeric segments index into arrays.
/// An empty path resolves to the row itself.
///
/// ```
/// use serde_json::json;
/// use datatables_seeker::lookup;
///
/// let row = json!({"author": {"name": "Ada"}, "tags": ["a", "b"]});
/// assert_eq!(lookup(&row, "author.name"), Some(&json!("Ada")));
/// assert_eq!(lookup(&row, "tags.1"), Some(&json!("b")));
/// assert_eq!(lookup(&row, "author.email"), None);
/// ```
pub fn lookup<'a>(row: &'a Json, path: &str) -> Option<&'a Json> {
    if path.is_empty() {
        return Some(row);
    }
    path.split('.').try_fold(row, |node, segment| match node {
        Json::Object(map) => map.get(segment),
        Json::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Accessor for JSON rows, suitable for [`Query::filter`](crate::Query::filter).
pub fn json_accessor<'a>(row: &'a Json, field: &str) -> Value<'a> {
    lookup(row, field).map(Value::from).unwrap_or(Value::None)
}

/// Numeric value supporting all common numeric types.
///
/// Comparisons between different variants fall back to `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed types.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::I64(n as i64)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::I64(n)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::U64(n as u64)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::U64(n)
    }
}

impl From<usize> for Number {
    fn from(n: usize) -> Self {
        Number::U64(n as u64)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_from_json_scalars() {
        assert_eq!(Value::from(&json!("x")), Value::String("x"));
        assert_eq!(Value::from(&json!(7)), Value::Number(Number::I64(7)));
        assert_eq!(
            Value::from(&json!(u64::MAX)),
            Value::Number(Number::U64(u64::MAX))
        );
        assert_eq!(Value::from(&json!(1.5)), Value::Number(Number::F64(1.5)));
        assert_eq!(Value::from(&json!(true)), Value::Bool(true));
    }

    #[test]
    fn value_from_json_non_scalars_is_none() {
        assert!(Value::from(&json!(null)).is_none());
        assert!(Value::from(&json!([1, 2])).is_none());
        assert!(Value::from(&json!({"a": 1})).is_none());
    }

    #[test]
    fn lookup_nested_paths() {
        let row = json!({"a": {"b": {"c": 3}}, "list": [{"x": "first"}]});
        assert_eq!(lookup(&row, "a.b.c"), Some(&json!(3)));
        assert_eq!(lookup(&row, "list.0.x"), Some(&json!("first")));
        assert_eq!(lookup(&row, "list.9.x"), None);
        assert_eq!(lookup(&row, "a.b.c.d"), None);
        assert_eq!(lookup(&row, ""), Some(&row));
    }

    #[test]
    fn accessor_missing_field_is_none() {
        let row = json!({"name": "Ada"});
        assert_eq!(json_accessor(&row, "name"), Value::String("Ada"));
        assert_eq!(json_accessor(&row, "email"), Value::None);
    }

    #[test]
    fn text_form_of_scalars() {
        assert_eq!(Value::Number(Number::I64(42)).as_text().as_deref(), Some("42"));
        assert_eq!(Value::Bool(false).as_text().as_deref(), Some("false"));
        assert_eq!(Value::None.as_text(), None);
    }

    #[test]
    fn number_comparisons_mixed_types() {
        assert_eq!(
            Number::I64(5).compare(Number::U64(10)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::I64(5).compare(Number::F64(5.0)),
            Some(Ordering::Equal)
        );
        assert_eq!(Number::F64(f64::NAN).compare(Number::F64(1.0)), None);
    }
}
