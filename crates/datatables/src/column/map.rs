use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value as Json};

use super::{display_value, kind_options, ColumnType, OptionKind, OptionSchema};
use crate::error::Result;

/// Replaces values through a lookup table.
///
/// The stringified value is looked up in `map`; a miss yields `default` when
/// set, otherwise the value itself.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapColumn {
    map: Map<String, Json>,
    default: Option<Json>,
}

impl MapColumn {
    pub fn new(map: Map<String, Json>) -> Self {
        Self { map, default: None }
    }

    pub fn default_value(mut self, value: impl Into<Json>) -> Self {
        self.default = Some(value.into());
        self
    }
}

impl ColumnType for MapColumn {
    fn kind(&self) -> &'static str {
        "map"
    }

    fn configure_schema(&self, schema: &mut OptionSchema) {
        schema
            .define("map", OptionKind::Object)
            .define("default", OptionKind::Any)
            .require("map");
    }

    fn with_options(&self, options: &Map<String, Json>) -> Result<Arc<dyn ColumnType>> {
        Ok(Arc::new(kind_options::<MapColumn>(self.kind(), options)?))
    }

    fn normalize(&self, value: Json) -> Json {
        if let Some(mapped) = self.map.get(&display_value(&value)) {
            return mapped.clone();
        }
        self.default.clone().unwrap_or(value)
    }
}
