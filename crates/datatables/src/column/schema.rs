//! Option schemas for columns built from loose JSON bags.
//!
//! Each column kind has one schema: the common keys every column accepts plus
//! the keys its [`ColumnType`] declares. Schemas are computed on first use and
//! memoized process-wide, keyed by kind. Two threads racing on first use may
//! both compute the schema; the first insert wins and both get the same `Arc`.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde_json::{Map, Value as Json};

use super::ColumnType;
use crate::error::{DataTableError, Result};

static SCHEMAS: Lazy<RwLock<HashMap<&'static str, Arc<OptionSchema>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// JSON type accepted for an option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionKind {
    String,
    Bool,
    Object,
    Array,
    /// Anything, including objects and arrays.
    Any,
}

impl OptionKind {
    fn accepts(self, value: &Json) -> bool {
        match self {
            OptionKind::String => value.is_string(),
            OptionKind::Bool => value.is_boolean(),
            OptionKind::Object => value.is_object(),
            OptionKind::Array => value.is_array(),
            OptionKind::Any => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OptionKind::String => "string",
            OptionKind::Bool => "bool",
            OptionKind::Object => "object",
            OptionKind::Array => "array",
            OptionKind::Any => "any",
        }
    }
}

/// Allowed keys, their types and the required subset for one column kind.
#[derive(Clone, Debug, Default)]
pub struct OptionSchema {
    options: IndexMap<&'static str, OptionKind>,
    required: Vec<&'static str>,
}

impl OptionSchema {
    /// The keys shared by every column kind.
    pub fn base() -> Self {
        let mut schema = Self::default();
        schema
            .define("label", OptionKind::String)
            .define("data", OptionKind::Any)
            .define("field", OptionKind::String)
            .define("propertyPath", OptionKind::String)
            .define("visible", OptionKind::Bool)
            .define("orderable", OptionKind::Bool)
            .define("orderField", OptionKind::String)
            .define("searchable", OptionKind::Bool)
            .define("globalSearchable", OptionKind::Bool)
            .define("filterType", OptionKind::String)
            .define("filterField", OptionKind::String)
            .define("filterOptions", OptionKind::Object)
            .define("filter", OptionKind::Object)
            .define("className", OptionKind::String)
            .define("render", OptionKind::String);
        schema
    }

    /// Declares a key. Redefining a key replaces its type.
    pub fn define(&mut self, key: &'static str, kind: OptionKind) -> &mut Self {
        self.options.insert(key, kind);
        self
    }

    /// Marks a declared key as required.
    pub fn require(&mut self, key: &'static str) -> &mut Self {
        if !self.required.contains(&key) {
            self.required.push(key);
        }
        self
    }

    pub fn kind_of(&self, key: &str) -> Option<OptionKind> {
        self.options.get(key).copied()
    }

    pub fn is_required(&self, key: &str) -> bool {
        self.required.iter().any(|required| *required == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.options.keys().copied()
    }

    /// Checks a bag in a single pass. `null` is accepted for any optional key.
    pub fn validate(&self, column_kind: &str, options: &Map<String, Json>) -> Result<()> {
        for (key, value) in options {
            let expected = self.kind_of(key).ok_or_else(|| {
                DataTableError::configuration(format!(
                    "unknown option '{}' for {} column",
                    key, column_kind
                ))
            })?;
            if value.is_null() && !self.is_required(key) {
                continue;
            }
            if !expected.accepts(value) {
                return Err(DataTableError::configuration(format!(
                    "option '{}' for {} column must be of type {}",
                    key,
                    column_kind,
                    expected.as_str()
                )));
            }
        }
        for key in &self.required {
            if options.get(*key).map_or(true, Json::is_null) {
                return Err(DataTableError::configuration(format!(
                    "missing required option '{}' for {} column",
                    key, column_kind
                )));
            }
        }
        Ok(())
    }
}

/// Returns the memoized schema for a column type's kind.
pub fn schema_for(column_type: &dyn ColumnType) -> Arc<OptionSchema> {
    let kind = column_type.kind();
    if let Some(schema) = SCHEMAS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(kind)
    {
        return Arc::clone(schema);
    }

    let mut schema = OptionSchema::base();
    column_type.configure_schema(&mut schema);
    let schema = Arc::new(schema);

    let mut cache = SCHEMAS.write().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(cache.entry(kind).or_insert(schema))
}
