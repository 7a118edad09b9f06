use std::sync::Arc;

use serde_json::{Map, Value as Json};

use super::schema::schema_for;
use super::{
    column_type_for, ActionColumn, BoolColumn, CellTemplate, CheckboxColumn, Column,
    ColumnOptions, ColumnType, Data, DateTimeColumn, MapColumn, NumberColumn, Render, TextColumn,
};
use crate::adapter::api::Query;
use crate::error::{DataTableError, Result};
use crate::filter::{Filter, FilterSpec};

/// Typed, fluent column configuration.
///
/// Nothing is validated until the builder is handed to
/// [`DataTable::add`](crate::DataTable::add), which assigns the index.
#[derive(Clone, Debug)]
pub struct ColumnBuilder {
    options: ColumnOptions,
    column_type: Arc<dyn ColumnType>,
}

impl ColumnBuilder {
    pub fn new(column_type: impl ColumnType + 'static) -> Self {
        Self::from_type(Arc::new(column_type))
    }

    pub fn from_type(column_type: Arc<dyn ColumnType>) -> Self {
        Self {
            options: ColumnOptions::default(),
            column_type,
        }
    }

    pub fn text() -> Self {
        Self::new(TextColumn::default())
    }

    pub fn number() -> Self {
        Self::new(NumberColumn::default())
    }

    pub fn bool() -> Self {
        Self::new(BoolColumn::default())
    }

    pub fn datetime() -> Self {
        Self::new(DateTimeColumn::default())
    }

    pub fn map(map: Map<String, Json>) -> Self {
        Self::new(MapColumn::new(map))
    }

    pub fn checkbox() -> Self {
        Self::new(CheckboxColumn::default())
    }

    pub fn action(column: ActionColumn) -> Self {
        Self::new(column)
    }

    /// Builds from a loose JSON option bag for a built-in kind.
    ///
    /// The bag is checked against the kind's memoized [`OptionSchema`](super::OptionSchema)
    /// before anything is read from it.
    pub fn from_options(kind: &str, options: &Map<String, Json>) -> Result<Self> {
        let prototype = column_type_for(kind).ok_or_else(|| {
            DataTableError::configuration(format!("unknown column type '{}'", kind))
        })?;
        schema_for(prototype.as_ref()).validate(kind, options)?;

        let mut builder = Self::from_type(prototype.with_options(options)?);
        let target = &mut builder.options;
        for (key, value) in options {
            if value.is_null() {
                continue;
            }
            let text = value.as_str().map(str::to_string);
            match key.as_str() {
                "label" => target.label = text,
                "data" => target.data = Some(Data::Constant(value.clone())),
                "field" => target.field = text,
                "propertyPath" => target.property_path = text,
                "visible" => target.visible = value.as_bool(),
                "orderable" => target.orderable = value.as_bool(),
                "orderField" => target.order_field = text,
                "searchable" => target.searchable = value.as_bool(),
                "globalSearchable" => target.global_searchable = value.as_bool(),
                "filterType" => target.filter_type = text,
                "filterField" => target.filter_field = text,
                "filterOptions" => {
                    target.filter_options = value.as_object().cloned().unwrap_or_default()
                }
                "filter" => {
                    let spec: FilterSpec = serde_json::from_value(value.clone()).map_err(|err| {
                        DataTableError::configuration(format!("invalid filter: {}", err))
                    })?;
                    target.filter = Some(spec.build()?);
                }
                "className" => target.class_name = text,
                "render" => target.render = text.map(Render::Template),
                _ => {}
            }
        }
        Ok(builder)
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.options.label = Some(label.into());
        self
    }

    /// Constant used when the extracted value is null.
    pub fn data(mut self, value: impl Into<Json>) -> Self {
        self.options.data = Some(Data::Constant(value.into()));
        self
    }

    /// Derives the value from `(row, extracted value)`.
    pub fn data_fn<F>(mut self, data: F) -> Self
    where
        F: Fn(&Json, &Json) -> Json + Send + Sync + 'static,
    {
        self.options.data = Some(Data::Function(Arc::new(data)));
        self
    }

    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.options.field = Some(field.into());
        self
    }

    pub fn property_path(mut self, path: impl Into<String>) -> Self {
        self.options.property_path = Some(path.into());
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.options.visible = Some(visible);
        self
    }

    pub fn orderable(mut self, orderable: bool) -> Self {
        self.options.orderable = Some(orderable);
        self
    }

    pub fn order_field(mut self, field: impl Into<String>) -> Self {
        self.options.order_field = Some(field.into());
        self
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.options.searchable = Some(searchable);
        self
    }

    pub fn global_searchable(mut self, searchable: bool) -> Self {
        self.options.global_searchable = Some(searchable);
        self
    }

    pub fn filter_type(mut self, filter_type: impl Into<String>) -> Self {
        self.options.filter_type = Some(filter_type.into());
        self
    }

    pub fn filter_field(mut self, field: impl Into<String>) -> Self {
        self.options.filter_field = Some(field.into());
        self
    }

    pub fn filter_options(mut self, options: Map<String, Json>) -> Self {
        self.options.filter_options = options;
        self
    }

    pub fn filter(mut self, filter: impl Filter + 'static) -> Self {
        self.options.filter = Some(Arc::new(filter));
        self
    }

    pub fn filter_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut Query, &str) + Send + Sync + 'static,
    {
        self.options.filter_callback = Some(Arc::new(callback));
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.options.class_name = Some(class_name.into());
        self
    }

    /// MiniJinja template with `value` and `row` in context.
    pub fn render(mut self, template: impl Into<String>) -> Self {
        self.options.render = Some(Render::Template(template.into()));
        self
    }

    pub fn render_fn<F>(mut self, render: F) -> Self
    where
        F: Fn(&Json, &Json) -> Json + Send + Sync + 'static,
    {
        self.options.render = Some(Render::Function(Arc::new(render)));
        self
    }

    pub fn options(&self) -> &ColumnOptions {
        &self.options
    }

    pub fn kind(&self) -> &'static str {
        self.column_type.kind()
    }

    pub(crate) fn build(mut self, name: &str, index: usize) -> Result<Column> {
        self.column_type.validate().map_err(|err| match err {
            DataTableError::Configuration(msg) => {
                DataTableError::configuration(format!("column '{}': {}", name, msg))
            }
            other => other,
        })?;
        self.column_type.configure_defaults(&mut self.options);

        let template = match &self.options.render {
            Some(Render::Template(source)) => Some(CellTemplate::new(source.as_str()).map_err(|err| {
                DataTableError::configuration(format!("column '{}': {}", name, err))
            })?),
            _ => None,
        };

        Ok(Column {
            name: name.to_string(),
            index,
            options: self.options,
            column_type: self.column_type,
            template,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(value: Json) -> Map<String, Json> {
        match value {
            Json::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn from_options_reads_common_keys() {
        let builder = ColumnBuilder::from_options(
            "text",
            &bag(json!({
                "label": "Name",
                "field": "u.name",
                "orderable": false,
                "className": "text-end",
                "filterOptions": {"placeholder": "Search"},
                "filter": {"type": "choice", "choices": ["a"]},
            })),
        )
        .unwrap();
        let column = builder.build("name", 2).unwrap();
        assert_eq!(column.index(), 2);
        assert_eq!(column.label(), Some("Name"));
        assert_eq!(column.field(), Some("u.name"));
        assert!(!column.is_orderable());
        assert_eq!(column.class_name(), Some("text-end"));
        assert_eq!(column.filter_options()["placeholder"], json!("Search"));
        assert!(column.accepts_search("a"));
        assert!(!column.accepts_search("b"));
    }

    #[test]
    fn from_options_reads_kind_keys() {
        let builder = ColumnBuilder::from_options(
            "bool",
            &bag(json!({"trueValue": "yes", "falseValue": "no"})),
        )
        .unwrap();
        let column = builder.build("active", 0).unwrap();
        assert_eq!(column.transform(json!(true), &json!({})).unwrap(), json!("yes"));
        assert_eq!(column.transform(json!(0), &json!({})).unwrap(), json!("no"));
    }

    #[test]
    fn from_options_rejects_bad_bags() {
        let err = ColumnBuilder::from_options("text", &bag(json!({"trueValue": "x"}))).unwrap_err();
        assert!(matches!(err, DataTableError::Configuration(_)));

        let err = ColumnBuilder::from_options("nope", &Map::new()).unwrap_err();
        assert!(err.to_string().contains("unknown column type 'nope'"));

        let err = ColumnBuilder::from_options("text", &bag(json!({"filter": {"type": "pattern", "pattern": "("}})))
            .unwrap_err();
        assert!(matches!(err, DataTableError::Configuration(_)));
    }

    #[test]
    fn bad_render_template_fails_at_build() {
        let err = ColumnBuilder::text().render("{{ value").build("c", 0).unwrap_err();
        assert!(matches!(err, DataTableError::Configuration(_)));
        assert!(err.to_string().contains("column 'c'"));
    }

    #[test]
    fn kind_defaults_apply_only_to_unset_options() {
        let column = ColumnBuilder::checkbox().build("check", 0).unwrap();
        assert!(!column.is_orderable());
        assert!(!column.is_searchable());

        let column = ColumnBuilder::checkbox().orderable(true).build("check", 0).unwrap();
        assert!(column.is_orderable());
    }
}
