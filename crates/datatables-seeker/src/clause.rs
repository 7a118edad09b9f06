//! Clause types for query predicates.
//!
//! A [`Clause`] represents a single filter predicate: a field path,
//! an operator, and a comparison value.

use regex::Regex;

use crate::op::Op;
use crate::value::{Number, Value};

/// A single filter predicate.
#[derive(Debug, Clone)]
pub struct Clause {
    /// The field path to compare.
    pub field: String,
    /// The comparison operator.
    pub op: Op,
    /// The value to compare against.
    pub value: ClauseValue,
}

impl Clause {
    /// Creates a new clause.
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<ClauseValue>) -> Self {
        Clause {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Evaluates this clause against a field value.
    ///
    /// A missing field never matches, not even `Ne`.
    pub fn matches(&self, field_value: &Value<'_>) -> bool {
        if field_value.is_none() {
            return false;
        }

        match &self.value {
            ClauseValue::Regex(regex) => field_value
                .as_text()
                .map(|text| regex.is_match(&text))
                .unwrap_or(false),

            ClauseValue::String(pattern) if self.op.is_text_op() => field_value
                .as_text()
                .map(|text| self.match_text(&text, pattern))
                .unwrap_or(false),

            ClauseValue::String(pattern) => match field_value {
                Value::String(s) => self.match_equality(*s == pattern.as_str()),
                _ => false,
            },

            ClauseValue::Number(clause_num) => match field_value {
                Value::Number(field_num) => field_num
                    .compare(*clause_num)
                    .map(|ordering| self.op.eval_ordering(ordering))
                    .unwrap_or(false),
                _ => false,
            },

            ClauseValue::Bool(clause_bool) => match field_value {
                Value::Bool(field_bool) => self.match_equality(field_bool == clause_bool),
                _ => false,
            },
        }
    }

    fn match_text(&self, field: &str, pattern: &str) -> bool {
        match self.op {
            Op::StartsWith => field.starts_with(pattern),
            Op::EndsWith => field.ends_with(pattern),
            Op::Contains => field.contains(pattern),
            Op::IContains => field.to_lowercase().contains(&pattern.to_lowercase()),
            _ => false,
        }
    }

    fn match_equality(&self, equal: bool) -> bool {
        match self.op {
            Op::Eq => equal,
            Op::Ne => !equal,
            _ => false,
        }
    }
}

/// Owned value stored in a clause.
#[derive(Debug, Clone)]
pub enum ClauseValue {
    /// String value.
    String(String),
    /// Numeric value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Compiled regular expression.
    Regex(Regex),
}

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::String(s)
    }
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::String(s.to_string())
    }
}

impl From<Number> for ClauseValue {
    fn from(n: Number) -> Self {
        ClauseValue::Number(n)
    }
}

impl From<bool> for ClauseValue {
    fn from(b: bool) -> Self {
        ClauseValue::Bool(b)
    }
}

impl From<Regex> for ClauseValue {
    fn from(r: Regex) -> Self {
        ClauseValue::Regex(r)
    }
}

impl From<i64> for ClauseValue {
    fn from(n: i64) -> Self {
        ClauseValue::Number(Number::I64(n))
    }
}

impl From<u64> for ClauseValue {
    fn from(n: u64) -> Self {
        ClauseValue::Number(Number::U64(n))
    }
}

impl From<f64> for ClauseValue {
    fn from(n: f64) -> Self {
        ClauseValue::Number(Number::F64(n))
    }
}
