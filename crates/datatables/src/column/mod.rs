//! Column model.
//!
//! A [`Column`] describes how one attribute of a row is searched, ordered and
//! rendered. Columns are built from a [`ColumnBuilder`] when they are added to
//! a table, get their index at that point, and are read-only afterwards. The
//! only later mutation is the adapter-derived default field, applied once
//! when an API-style adapter is attached.
//!
//! Kind-specific behavior lives behind the [`ColumnType`] trait: each kind
//! normalizes raw backend values, may override rendering, and declares the
//! extra options it accepts when built from a JSON bag.
//!
//! ```ignore
//! table.add("email", ColumnBuilder::text().label("E-mail").orderable(true))?;
//! table.add("active", ColumnBuilder::new(BoolColumn::new("yes", "no")))?;
//! ```

mod action;
mod boolean;
mod builder;
mod checkbox;
mod datetime;
mod map;
mod number;
pub mod schema;
mod set;
mod template;
mod text;

use std::fmt;
use std::sync::Arc;

use minijinja::context;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as Json};

use crate::adapter::api::Query;
use crate::error::{DataTableError, Result};
use crate::filter::{FilterDebug, SharedFilter};

pub use action::{ActionColumn, ActionColumnItem, ActionItems, ActionLayout};
pub use boolean::BoolColumn;
pub use builder::ColumnBuilder;
pub use checkbox::CheckboxColumn;
pub use datetime::DateTimeColumn;
pub use map::MapColumn;
pub use number::NumberColumn;
pub use schema::{OptionKind, OptionSchema};
pub use set::ColumnSet;
pub use template::CellTemplate;
pub use text::TextColumn;

/// Derives a cell value from `(row, value)`.
pub type DataFn = Arc<dyn Fn(&Json, &Json) -> Json + Send + Sync>;

/// Post-processes a normalized value given `(value, row)`.
pub type RenderFn = Arc<dyn Fn(&Json, &Json) -> Json + Send + Sync>;

/// Adds custom filtering to an API query for a search term.
pub type FilterCallback = Arc<dyn Fn(&mut Query, &str) + Send + Sync>;

/// Where a column's raw value comes from.
#[derive(Clone)]
pub enum Data {
    /// Used whenever the extracted value is null.
    Constant(Json),
    /// Computes the value from the whole row and the extracted value.
    Function(DataFn),
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Data::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Data::Function(_) => f.write_str("Function(<fn>)"),
        }
    }
}

/// Final cell formatting.
#[derive(Clone)]
pub enum Render {
    /// MiniJinja source with `value` and `row` in context.
    Template(String),
    Function(RenderFn),
}

impl fmt::Debug for Render {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Render::Template(source) => f.debug_tuple("Template").field(source).finish(),
            Render::Function(_) => f.write_str("Function(<fn>)"),
        }
    }
}

/// Options shared by every column kind.
///
/// Tri-state flags are `None` until set; the accessors on [`Column`] compute
/// the effective value.
#[derive(Clone, Default)]
pub struct ColumnOptions {
    pub label: Option<String>,
    pub data: Option<Data>,
    pub field: Option<String>,
    pub property_path: Option<String>,
    pub visible: Option<bool>,
    pub orderable: Option<bool>,
    pub order_field: Option<String>,
    pub searchable: Option<bool>,
    pub global_searchable: Option<bool>,
    pub filter_type: Option<String>,
    pub filter_field: Option<String>,
    pub filter_options: Map<String, Json>,
    pub filter: Option<SharedFilter>,
    pub filter_callback: Option<FilterCallback>,
    pub class_name: Option<String>,
    pub render: Option<Render>,
}

impl fmt::Debug for ColumnOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnOptions")
            .field("label", &self.label)
            .field("data", &self.data)
            .field("field", &self.field)
            .field("property_path", &self.property_path)
            .field("visible", &self.visible)
            .field("orderable", &self.orderable)
            .field("order_field", &self.order_field)
            .field("searchable", &self.searchable)
            .field("global_searchable", &self.global_searchable)
            .field("filter_type", &self.filter_type)
            .field("filter_field", &self.filter_field)
            .field("filter_options", &self.filter_options)
            .field("filter", &self.filter.as_ref().map(|_| FilterDebug))
            .field(
                "filter_callback",
                &self.filter_callback.as_ref().map(|_| "<fn>"),
            )
            .field("class_name", &self.class_name)
            .field("render", &self.render)
            .finish()
    }
}

/// Kind-specific column behavior.
pub trait ColumnType: Send + Sync + fmt::Debug {
    /// Stable kind name, also the key for [`schema::schema_for`].
    fn kind(&self) -> &'static str;

    /// Fills defaults this kind imposes. Only `None` options should change.
    fn configure_defaults(&self, _options: &mut ColumnOptions) {}

    /// Declares the extra JSON options this kind accepts.
    fn configure_schema(&self, _schema: &mut OptionSchema) {}

    /// Builds a configured instance from a validated JSON bag.
    fn with_options(&self, options: &Map<String, Json>) -> Result<Arc<dyn ColumnType>>;

    /// Rejects inconsistent kind configuration at registration.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Coerces a raw backend value into a wire-safe one.
    fn normalize(&self, value: Json) -> Json;

    fn render(&self, column: &Column, value: Json, row: &Json) -> Result<Json> {
        column.apply_render(value, row)
    }

    /// Header label override, given the table's HTML id.
    fn label(&self, _column: &Column, _table_html_id: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Returns an unconfigured instance of a built-in kind.
pub fn column_type_for(kind: &str) -> Option<Arc<dyn ColumnType>> {
    let column_type: Arc<dyn ColumnType> = match kind {
        "text" => Arc::new(TextColumn::default()),
        "number" => Arc::new(NumberColumn::default()),
        "bool" => Arc::new(BoolColumn::default()),
        "datetime" => Arc::new(DateTimeColumn::default()),
        "map" => Arc::new(MapColumn::default()),
        "checkbox" => Arc::new(CheckboxColumn::default()),
        "action" => Arc::new(ActionColumn::default()),
        _ => return None,
    };
    Some(column_type)
}

/// Deserializes a kind's own options out of a full bag, skipping nulls.
pub(crate) fn kind_options<T: DeserializeOwned>(
    kind: &str,
    options: &Map<String, Json>,
) -> Result<T> {
    let present: Map<String, Json> = options
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    serde_json::from_value(Json::Object(present)).map_err(|err| {
        DataTableError::configuration(format!("invalid options for {} column: {}", kind, err))
    })
}

/// A registered column.
#[derive(Clone, Debug)]
pub struct Column {
    name: String,
    index: usize,
    options: ColumnOptions,
    column_type: Arc<dyn ColumnType>,
    template: Option<CellTemplate>,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> &'static str {
        self.column_type.kind()
    }

    pub fn options(&self) -> &ColumnOptions {
        &self.options
    }

    pub fn column_type(&self) -> &Arc<dyn ColumnType> {
        &self.column_type
    }

    pub fn label(&self) -> Option<&str> {
        self.options.label.as_deref()
    }

    /// Header label: the kind's override, the explicit label, or
    /// `"{table}.columns.{name}"` as a translation key.
    pub fn header_label(&self, table_name: &str, table_html_id: &str) -> Result<String> {
        if let Some(label) = self.column_type.label(self, table_html_id)? {
            return Ok(label);
        }
        Ok(self
            .options
            .label
            .clone()
            .unwrap_or_else(|| format!("{}.columns.{}", table_name, self.name)))
    }

    pub fn field(&self) -> Option<&str> {
        self.options.field.as_deref()
    }

    pub fn property_path(&self) -> Option<&str> {
        self.options.property_path.as_deref()
    }

    pub fn order_field(&self) -> Option<&str> {
        self.options.order_field.as_deref().or_else(|| self.field())
    }

    pub fn filter_field(&self) -> Option<&str> {
        self.options.filter_field.as_deref().or_else(|| self.field())
    }

    pub fn is_visible(&self) -> bool {
        self.options.visible.unwrap_or(true)
    }

    pub fn is_orderable(&self) -> bool {
        self.options
            .orderable
            .unwrap_or_else(|| self.order_field().map_or(false, |f| !f.is_empty()))
    }

    pub fn is_searchable(&self) -> bool {
        self.options
            .searchable
            .unwrap_or_else(|| self.field().map_or(false, |f| !f.is_empty()))
    }

    pub fn is_global_searchable(&self) -> bool {
        self.options
            .global_searchable
            .unwrap_or_else(|| self.is_searchable())
    }

    pub fn filter(&self) -> Option<&SharedFilter> {
        self.options.filter.as_ref()
    }

    /// Whether `term` passes the attached filter. No filter accepts everything.
    pub fn accepts_search(&self, term: &str) -> bool {
        self.filter().map_or(true, |filter| filter.is_valid_value(term))
    }

    pub fn filter_type(&self) -> Option<&str> {
        self.options.filter_type.as_deref()
    }

    pub fn filter_options(&self) -> &Map<String, Json> {
        &self.options.filter_options
    }

    /// Runs the filter callback, if any. Returns whether one ran.
    pub fn apply_filter_callback(&self, query: &mut Query, term: &str) -> bool {
        match &self.options.filter_callback {
            Some(callback) => {
                callback(query, term);
                true
            }
            None => false,
        }
    }

    pub fn class_name(&self) -> Option<&str> {
        self.options.class_name.as_deref()
    }

    /// Turns an extracted value into the wire cell value: data, then
    /// normalize, then render.
    pub fn transform(&self, value: Json, row: &Json) -> Result<Json> {
        let value = match &self.options.data {
            Some(Data::Function(data)) => data(row, &value),
            Some(Data::Constant(constant)) if value.is_null() => constant.clone(),
            _ => value,
        };
        let value = self.column_type.normalize(value);
        self.column_type.render(self, value, row)
    }

    /// The generic render step: template, function, or identity.
    pub fn apply_render(&self, value: Json, row: &Json) -> Result<Json> {
        if let Some(template) = &self.template {
            let rendered = template.render(context! { value => value, row => row })?;
            return Ok(Json::String(rendered));
        }
        match &self.options.render {
            Some(Render::Function(render)) => Ok(render(&value, row)),
            _ => Ok(value),
        }
    }

    pub(crate) fn apply_default_field(&mut self) {
        if self.options.field.is_none() {
            self.options.field = Some(self.name.clone());
        }
    }
}

/// Renders a JSON scalar the way it appears inside text: strings bare,
/// null empty.
pub(crate) fn display_value(value: &Json) -> String {
    match value {
        Json::Null => String::new(),
        Json::String(s) => s.clone(),
        other => other.to_string(),
    }
}
