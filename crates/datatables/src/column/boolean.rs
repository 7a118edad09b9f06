use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value as Json};

use super::{kind_options, ColumnType, OptionKind, OptionSchema};
use crate::error::Result;

/// Maps truthy, falsy and null values to fixed strings.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoolColumn {
    true_value: String,
    false_value: String,
    null_value: String,
}

impl Default for BoolColumn {
    fn default() -> Self {
        Self {
            true_value: "true".to_string(),
            false_value: "false".to_string(),
            null_value: "null".to_string(),
        }
    }
}

impl BoolColumn {
    pub fn new(true_value: impl Into<String>, false_value: impl Into<String>) -> Self {
        Self {
            true_value: true_value.into(),
            false_value: false_value.into(),
            ..Self::default()
        }
    }

    pub fn null_value(mut self, value: impl Into<String>) -> Self {
        self.null_value = value.into();
        self
    }
}

/// Loose truthiness: `0`, `""`, `"0"`, `false` and empty arrays are false.
fn is_truthy(value: &Json) -> bool {
    match value {
        Json::Null => false,
        Json::Bool(b) => *b,
        Json::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Json::String(s) => !(s.is_empty() || s == "0"),
        Json::Array(items) => !items.is_empty(),
        Json::Object(_) => true,
    }
}

impl ColumnType for BoolColumn {
    fn kind(&self) -> &'static str {
        "bool"
    }

    fn configure_schema(&self, schema: &mut OptionSchema) {
        schema
            .define("trueValue", OptionKind::String)
            .define("falseValue", OptionKind::String)
            .define("nullValue", OptionKind::String);
    }

    fn with_options(&self, options: &Map<String, Json>) -> Result<Arc<dyn ColumnType>> {
        Ok(Arc::new(kind_options::<BoolColumn>(self.kind(), options)?))
    }

    fn normalize(&self, value: Json) -> Json {
        let text = if value.is_null() {
            &self.null_value
        } else if is_truthy(&value) {
            &self.true_value
        } else {
            &self.false_value
        };
        Json::String(text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_truthiness() {
        let column = BoolColumn::new("Yes", "No").null_value("-");
        assert_eq!(column.normalize(json!(true)), json!("Yes"));
        assert_eq!(column.normalize(json!(1)), json!("Yes"));
        assert_eq!(column.normalize(json!("on")), json!("Yes"));
        assert_eq!(column.normalize(json!(false)), json!("No"));
        assert_eq!(column.normalize(json!("0")), json!("No"));
        assert_eq!(column.normalize(json!(0.0)), json!("No"));
        assert_eq!(column.normalize(Json::Null), json!("-"));
    }

    #[test]
    fn defaults() {
        let column = BoolColumn::default();
        assert_eq!(column.normalize(json!(true)), json!("true"));
        assert_eq!(column.normalize(Json::Null), json!("null"));
    }
}
