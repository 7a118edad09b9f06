use std::fmt::Write;
use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{Map, Value as Json};

use super::{kind_options, ColumnType, OptionKind, OptionSchema};
use crate::error::{DataTableError, Result};

const DEFAULT_FORMAT: &str = "%+";

/// Formats timestamps. Inputs are RFC 3339 strings, `YYYY-MM-DD HH:MM:SS`,
/// plain dates, unix seconds, or strings in `create_from_format`. Offsets are
/// converted to UTC. Unparseable input is passed through unchanged.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateTimeColumn {
    format: String,
    null_value: String,
    create_from_format: Option<String>,
}

impl Default for DateTimeColumn {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
            null_value: String::new(),
            create_from_format: None,
        }
    }
}

impl DateTimeColumn {
    /// Output format in `strftime` syntax.
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::default()
        }
    }

    pub fn null_value(mut self, value: impl Into<String>) -> Self {
        self.null_value = value.into();
        self
    }

    /// Input format tried before the built-in ones.
    pub fn create_from_format(mut self, format: impl Into<String>) -> Self {
        self.create_from_format = Some(format.into());
        self
    }

    fn parse(&self, value: &Json) -> Option<DateTime<Utc>> {
        match value {
            Json::Number(n) => n.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
            Json::String(text) => self.parse_str(text.trim()),
            _ => None,
        }
    }

    fn parse_str(&self, text: &str) -> Option<DateTime<Utc>> {
        if let Some(format) = &self.create_from_format {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return Some(Utc.from_utc_datetime(&naive));
            }
        }
        if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
            return Some(parsed.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
            return Some(Utc.from_utc_datetime(&naive));
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
    }
}

fn check_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(DataTableError::configuration(format!(
            "invalid date format '{}'",
            format
        )));
    }
    Ok(())
}

impl ColumnType for DateTimeColumn {
    fn kind(&self) -> &'static str {
        "datetime"
    }

    fn configure_schema(&self, schema: &mut OptionSchema) {
        schema
            .define("format", OptionKind::String)
            .define("nullValue", OptionKind::String)
            .define("createFromFormat", OptionKind::String);
    }

    fn with_options(&self, options: &Map<String, Json>) -> Result<Arc<dyn ColumnType>> {
        Ok(Arc::new(kind_options::<DateTimeColumn>(self.kind(), options)?))
    }

    fn validate(&self) -> Result<()> {
        check_format(&self.format)?;
        if let Some(format) = &self.create_from_format {
            check_format(format)?;
        }
        Ok(())
    }

    fn normalize(&self, value: Json) -> Json {
        if value.is_null() {
            return Json::String(self.null_value.clone());
        }
        let Some(parsed) = self.parse(&value) else {
            return value;
        };
        let mut out = String::new();
        match write!(out, "{}", parsed.format(&self.format)) {
            Ok(()) => Json::String(out),
            Err(_) => value,
        }
    }
}
