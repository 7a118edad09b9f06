//! Raw request parameters.
//!
//! Grid widgets send their state either as a JSON body or as a urlencoded
//! form/query string using bracket notation (`order[0][column]=1`). Both end
//! up as a [`ParameterBag`]: a JSON object whose nested values mirror the
//! bracket structure.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use tracing::debug;

use crate::error::{DataTableError, Result};

/// Deepest bracket nesting accepted from a urlencoded key.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Request parameters as a nested JSON object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterBag(Map<String, Json>);

impl ParameterBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON object. `null` is an empty bag; anything else is an
    /// error.
    pub fn from_json(value: Json) -> Result<Self> {
        match value {
            Json::Object(map) => Ok(Self(map)),
            Json::Null => Ok(Self::default()),
            other => Err(DataTableError::configuration(format!(
                "request parameters must be an object, got {}",
                other
            ))),
        }
    }

    /// Parses a urlencoded string. `a[b][c]=1` nests, `a[]=1` appends.
    /// A later duplicate key overwrites the earlier one. Pairs nested deeper
    /// than [`MAX_NESTING_DEPTH`] are dropped.
    pub fn from_query_str(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut root = Json::Object(Map::new());
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let segments = split_key(&key);
            if segments.len() > MAX_NESTING_DEPTH {
                debug!(depth = segments.len(), "dropping over-nested request parameter");
                continue;
            }
            insert_path(&mut root, &segments, value.into_owned());
        }
        match root {
            Json::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Json> {
        self.0.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Json>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Json> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Json> {
        self.0
    }
}

impl From<Map<String, Json>> for ParameterBag {
    fn from(map: Map<String, Json>) -> Self {
        Self(map)
    }
}

fn split_key(key: &str) -> Vec<String> {
    let open = match key.find('[') {
        Some(open) if open > 0 => open,
        _ => return vec![key.to_string()],
    };
    let mut segments = vec![key[..open].to_string()];
    let mut rest = &key[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        match inner.find(']') {
            Some(close) => {
                segments.push(inner[..close].to_string());
                rest = &inner[close + 1..];
            }
            None => return vec![key.to_string()],
        }
    }
    segments
}

fn insert_path(target: &mut Json, segments: &[String], value: String) {
    let Some((head, rest)) = segments.split_first() else {
        *target = Json::String(value);
        return;
    };

    if head.is_empty() {
        if !target.is_array() {
            *target = Json::Array(Vec::new());
        }
        if let Json::Array(items) = target {
            items.push(Json::Null);
            if let Some(slot) = items.last_mut() {
                insert_path(slot, rest, value);
            }
        }
        return;
    }

    if !target.is_object() {
        *target = Json::Object(Map::new());
    }
    if let Json::Object(map) = target {
        let slot = map.entry(head.clone()).or_insert(Json::Null);
        insert_path(slot, rest, value);
    }
}

/// Entries of an array (keyed by position) or an object (keyed by name).
pub(crate) fn keyed_entries(value: &Json) -> Vec<(String, &Json)> {
    match value {
        Json::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| (i.to_string(), item))
            .collect(),
        Json::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        _ => Vec::new(),
    }
}

/// Items of a positional list. Objects whose keys are all integers count as
/// lists, ordered by key.
pub(crate) fn list_entries(value: &Json) -> Option<Vec<&Json>> {
    match value {
        Json::Array(items) => Some(items.iter().collect()),
        Json::Object(map) => {
            let mut indexed = map
                .iter()
                .map(|(k, v)| k.parse::<usize>().ok().map(|i| (i, v)))
                .collect::<Option<Vec<_>>>()?;
            indexed.sort_by_key(|(i, _)| *i);
            Some(indexed.into_iter().map(|(_, v)| v).collect())
        }
        _ => None,
    }
}

/// Integer from a number or a numeric string.
pub(crate) fn as_int(value: &Json) -> Option<i64> {
    match value {
        Json::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Json::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    }
}

/// String from a string or number scalar.
pub(crate) fn as_string(value: &Json) -> Option<String> {
    match value {
        Json::String(s) => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
