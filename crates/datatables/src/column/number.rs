use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Number, Value as Json};

use super::{kind_options, ColumnType, OptionKind, OptionSchema};
use crate::error::Result;

/// Numeric cells. Numeric strings are parsed; with `raw` they are kept as
/// the backend sent them.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberColumn {
    raw: bool,
}

impl NumberColumn {
    pub fn raw() -> Self {
        Self { raw: true }
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(int) = text.parse::<i64>() {
        return Some(Number::from(int));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}

impl ColumnType for NumberColumn {
    fn kind(&self) -> &'static str {
        "number"
    }

    fn configure_schema(&self, schema: &mut OptionSchema) {
        schema.define("raw", OptionKind::Bool);
    }

    fn with_options(&self, options: &Map<String, Json>) -> Result<Arc<dyn ColumnType>> {
        Ok(Arc::new(kind_options::<NumberColumn>(self.kind(), options)?))
    }

    fn normalize(&self, value: Json) -> Json {
        match value {
            Json::String(text) if !self.raw => match parse_number(&text) {
                Some(number) => Json::Number(number),
                None => Json::String(text),
            },
            Json::Bool(b) => Json::from(u8::from(b)),
            other => other,
        }
    }
}
