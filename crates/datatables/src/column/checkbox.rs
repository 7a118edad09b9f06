use std::sync::Arc;

use minijinja::context;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use serde_json::{Map, Value as Json};

use super::{
    display_value, kind_options, CellTemplate, Column, ColumnOptions, ColumnType, OptionKind,
    OptionSchema,
};
use crate::error::Result;

const CHECK_ROW: &str = r##"<div class="px-2 form-check form-check-sm form-check-custom form-check-solid"><input class="form-check-input datatable-check-row" type="checkbox" value="{{ value }}"></div>"##;
const CHECK_ALL: &str = r##"<div class="px-2 form-check form-check-sm form-check-custom form-check-solid"><input class="form-check-input datatable-check-all" type="checkbox" data-kt-check="true" data-kt-check-target="#{{ datatable_id }} .datatable-check-row"></div>"##;

/// Row-selection checkboxes.
///
/// Each cell renders `template` with the row's value; the header label
/// renders a check-all box bound to the table's HTML id. Not orderable or
/// searchable unless set explicitly.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CheckboxColumn {
    template: String,
    #[serde(skip)]
    compiled: OnceCell<CellTemplate>,
}

impl Default for CheckboxColumn {
    fn default() -> Self {
        Self::new(CHECK_ROW)
    }
}

impl CheckboxColumn {
    /// Cell template with `{{ value }}` in context.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            compiled: OnceCell::new(),
        }
    }

    fn compiled(&self) -> Result<&CellTemplate> {
        self.compiled
            .get_or_try_init(|| CellTemplate::html(self.template.as_str()))
    }
}

impl ColumnType for CheckboxColumn {
    fn kind(&self) -> &'static str {
        "checkbox"
    }

    fn configure_defaults(&self, options: &mut ColumnOptions) {
        options.orderable.get_or_insert(false);
        options.searchable.get_or_insert(false);
    }

    fn configure_schema(&self, schema: &mut OptionSchema) {
        schema.define("template", OptionKind::String);
    }

    fn with_options(&self, options: &Map<String, Json>) -> Result<Arc<dyn ColumnType>> {
        Ok(Arc::new(kind_options::<CheckboxColumn>(self.kind(), options)?))
    }

    fn validate(&self) -> Result<()> {
        self.compiled().map(|_| ())
    }

    fn normalize(&self, value: Json) -> Json {
        value
    }

    fn render(&self, _column: &Column, value: Json, _row: &Json) -> Result<Json> {
        let rendered = self
            .compiled()?
            .render(context! { value => display_value(&value) })?;
        Ok(Json::String(rendered))
    }

    fn label(&self, column: &Column, table_html_id: &str) -> Result<Option<String>> {
        let source = column.label().unwrap_or(CHECK_ALL);
        let rendered = CellTemplate::new(source)?.render(context! { datatable_id => table_html_id })?;
        Ok(Some(rendered))
    }
}
