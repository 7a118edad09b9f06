use std::sync::Arc;

use minijinja::HtmlEscape;
use serde::Deserialize;
use serde_json::{Map, Value as Json};

use super::{display_value, kind_options, ColumnType, OptionKind, OptionSchema};
use crate::error::Result;

/// Plain text cells. Values are HTML-escaped unless `raw` is set.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextColumn {
    raw: bool,
}

impl TextColumn {
    /// A text column that outputs values unescaped.
    pub fn raw() -> Self {
        Self { raw: true }
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }
}

impl ColumnType for TextColumn {
    fn kind(&self) -> &'static str {
        "text"
    }

    fn configure_schema(&self, schema: &mut OptionSchema) {
        schema.define("raw", OptionKind::Bool);
    }

    fn with_options(&self, options: &Map<String, Json>) -> Result<Arc<dyn ColumnType>> {
        Ok(Arc::new(kind_options::<TextColumn>(self.kind(), options)?))
    }

    fn normalize(&self, value: Json) -> Json {
        let text = display_value(&value);
        if self.raw {
            Json::String(text)
        } else {
            Json::String(HtmlEscape(&text).to_string())
        }
    }
}
