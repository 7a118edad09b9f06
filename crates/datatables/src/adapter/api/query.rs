use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A value in an API query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Str(s) => f.write_str(s),
            QueryValue::Int(i) => write!(f, "{}", i),
        }
    }
}

impl Serialize for QueryValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            QueryValue::Str(s) => serializer.serialize_str(s),
            QueryValue::Int(i) => serializer.serialize_i64(*i),
        }
    }
}

/// Query parameters for a REST-style list endpoint.
///
/// Keys keep insertion order; setting an existing key replaces its value in
/// place. Filters are `field=value`, ordering is `order[field]=dir`, paging
/// is `itemsPerPage` and a 1-based `page`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    params: IndexMap<String, QueryValue>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_filter(&mut self, field: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.insert(field.into(), QueryValue::Str(value.into()));
        self
    }

    pub fn add_order_by(&mut self, field: &str, direction: impl Into<String>) -> &mut Self {
        self.params
            .insert(format!("order[{}]", field), QueryValue::Str(direction.into()));
        self
    }

    pub fn set_items_per_page(&mut self, items: i64) -> &mut Self {
        self.params
            .insert("itemsPerPage".to_string(), QueryValue::Int(items));
        self
    }

    pub fn set_page(&mut self, page: i64) -> &mut Self {
        self.params.insert("page".to_string(), QueryValue::Int(page));
        self
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params.get(key)
    }

    /// The value of a string parameter.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.params.get(key)? {
            QueryValue::Str(s) => Some(s),
            QueryValue::Int(_) => None,
        }
    }

    pub fn items_per_page(&self) -> Option<i64> {
        self.int_param("itemsPerPage")
    }

    pub fn page(&self) -> Option<i64> {
        self.int_param("page")
    }

    fn int_param(&self, key: &str) -> Option<i64> {
        match self.params.get(key)? {
            QueryValue::Int(i) => Some(*i),
            QueryValue::Str(_) => None,
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.params.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parameters as string pairs, in insertion order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }

    /// Urlencoded form, e.g. `name=foo&order%5Bname%5D=asc&itemsPerPage=10`.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.params {
            serializer.append_pair(key, &value.to_string());
        }
        serializer.finish()
    }
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.params.len()))?;
        for (key, value) in &self.params {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
